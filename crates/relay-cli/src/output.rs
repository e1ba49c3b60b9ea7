//! Human-readable rendering of selections and relay lists.

use console::style;
use relay_catalog::{BridgeRelay, RelayCatalog, ShadowsocksEndpoint};
use relay_selector::SelectedRelay;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Relay counts for one city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySummary {
    /// City code
    pub code: String,
    /// City name
    pub name: String,
    /// Active WireGuard relays
    pub active: usize,
    /// All WireGuard relays
    pub total: usize,
}

/// Relay counts for one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySummary {
    /// Country code
    pub code: String,
    /// Country name
    pub name: String,
    /// Cities sorted by code
    pub cities: Vec<CitySummary>,
}

/// Group the catalog's WireGuard relays by country and city
#[must_use]
pub fn location_summary(catalog: &RelayCatalog) -> Vec<CountrySummary> {
    let mut countries: BTreeMap<String, CountrySummary> = BTreeMap::new();

    for relay in catalog.wireguard_relays() {
        let Some(location) = catalog.resolve_location(relay) else {
            continue;
        };

        let country = countries
            .entry(location.country_code.clone())
            .or_insert_with(|| CountrySummary {
                code: location.country_code.clone(),
                name: location.country.clone(),
                cities: Vec::new(),
            });

        let city = match country
            .cities
            .iter()
            .position(|city| city.code == location.city_code)
        {
            Some(index) => &mut country.cities[index],
            None => {
                country.cities.push(CitySummary {
                    code: location.city_code.clone(),
                    name: location.city.clone(),
                    active: 0,
                    total: 0,
                });
                let last = country.cities.len() - 1;
                &mut country.cities[last]
            }
        };

        city.total += 1;
        if relay.active {
            city.active += 1;
        }
    }

    let mut summary: Vec<CountrySummary> = countries.into_values().collect();
    for country in &mut summary {
        country.cities.sort_by(|a, b| a.code.cmp(&b.code));
    }
    summary
}

/// Render a selection
#[must_use]
pub fn format_selection(selected: &SelectedRelay) -> String {
    let relay = &selected.relay;
    let endpoint = &selected.endpoint;
    let ownership = if relay.owned { "owned" } else { "rented" };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({}, {})",
        style("Relay:").bold(),
        style(&relay.hostname).green(),
        selected.location.city,
        selected.location.country
    );
    let _ = writeln!(out, "{} {} ({})", style("Provider:").bold(), relay.provider, ownership);
    let _ = writeln!(
        out,
        "{} {} ({:?})",
        style("Endpoint:").bold(),
        endpoint.ipv4_relay,
        endpoint.protocol
    );
    if let Some(ipv6) = endpoint.ipv6_relay {
        let _ = writeln!(out, "{} {}", style("IPv6:").bold(), ipv6);
    }
    let _ = writeln!(out, "{} {}", style("Gateway:").bold(), endpoint.ipv4_gateway);
    let _ = writeln!(out, "{} {}", style("Public key:").bold(), endpoint.public_key);
    if relay.daita {
        let _ = writeln!(out, "{} yes", style("DAITA:").bold());
    }
    out
}

/// Render a bridge choice
#[must_use]
pub fn format_bridge(relay: &BridgeRelay, endpoint: Option<&ShadowsocksEndpoint>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({})",
        style("Bridge:").bold(),
        style(&relay.hostname).green(),
        relay.location
    );
    let _ = writeln!(out, "{} {}", style("Address:").bold(), relay.ipv4_addr_in);
    match endpoint {
        Some(endpoint) => {
            let _ = writeln!(
                out,
                "{} {}:{} {} ({})",
                style("Shadowsocks:").bold(),
                relay.ipv4_addr_in,
                endpoint.port,
                endpoint.protocol,
                endpoint.cipher
            );
        }
        None => {
            let _ = writeln!(out, "{} no TCP endpoint", style("Shadowsocks:").bold());
        }
    }
    out
}

/// Render the location summary
#[must_use]
pub fn format_locations(summary: &[CountrySummary]) -> String {
    let mut out = String::new();
    for country in summary {
        let _ = writeln!(out, "{} ({})", style(&country.name).bold(), country.code);
        for city in &country.cities {
            let _ = writeln!(
                out,
                "  {:<24} {}-{:<6} {}/{} active",
                city.name, country.code, city.code, city.active, city.total
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use relay_catalog::{PublicKey, ServerLocation, ServerRelay};
    use relay_selector::{RelayConstraints, evaluate};

    fn relay(hostname: &str, location: &str, active: bool) -> ServerRelay {
        ServerRelay {
            hostname: hostname.to_string(),
            active,
            owned: true,
            location: location.to_string(),
            provider: "31173".to_string(),
            weight: 100,
            ipv4_addr_in: "185.213.154.68".parse().unwrap(),
            ipv6_addr_in: None,
            public_key: PublicKey::from_bytes([3; 32]),
            include_in_country: true,
            daita: true,
        }
    }

    fn catalog() -> RelayCatalog {
        let mut catalog = RelayCatalog::default();
        for (id, country, city) in [
            ("se-sto", "Sweden", "Stockholm"),
            ("se-got", "Sweden", "Gothenburg"),
            ("es-mad", "Spain", "Madrid"),
        ] {
            catalog.locations.insert(
                id.to_string(),
                ServerLocation {
                    country: country.to_string(),
                    city: city.to_string(),
                    latitude: 0.0,
                    longitude: 0.0,
                },
            );
        }
        catalog.wireguard.port_ranges = vec![relay_catalog::PortRange::single(51820)];
        catalog.wireguard.relays = vec![
            relay("se6-wireguard", "se-sto", true),
            relay("se9-wireguard", "se-got", true),
            relay("se10-wireguard", "se-got", false),
            relay("es1-wireguard", "es-mad", true),
            relay("xx1-wireguard", "xx-nowhere", true),
        ];
        catalog
    }

    #[test]
    fn test_location_summary() {
        let summary = location_summary(&catalog());

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].code, "es");
        assert_eq!(summary[1].code, "se");

        let sweden = &summary[1];
        assert_eq!(sweden.cities[0].code, "got");
        assert_eq!(sweden.cities[0].active, 1);
        assert_eq!(sweden.cities[0].total, 2);
        assert_eq!(sweden.cities[1].code, "sto");
    }

    #[test]
    fn test_format_locations() {
        let text = format_locations(&location_summary(&catalog()));
        assert!(text.contains("Gothenburg"));
        assert!(text.contains("1/2 active"));
    }

    #[test]
    fn test_format_selection() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let constraints = RelayConstraints::new()
            .with_location(relay_selector::RelayLocation::country("es"));
        let selected = evaluate(&catalog, &constraints, 0, &mut rng).unwrap();

        let text = format_selection(&selected);
        assert!(text.contains("es1-wireguard"));
        assert!(text.contains("185.213.154.68:51820"));
        assert!(text.contains("Madrid"));
    }
}
