//! Relay catalog fixtures
//!
//! Builds catalogs in code so tests can describe exactly the relays they need.
//!
//! # Example
//!
//! ```no_run
//! use relay_integration_tests::fixtures::{CatalogBuilder, RelaySpec};
//!
//! let catalog = CatalogBuilder::new()
//!     .location("se-got", "Sweden", "Gothenburg", 57.70887, 11.97456)
//!     .relay(RelaySpec::new("se9-wireguard", "se-got").weight(1000))
//!     .build();
//! ```

use relay_catalog::{
    BridgeRelay, PortRange, PublicKey, RelayCatalog, ServerLocation, ServerRelay,
    ShadowsocksEndpoint,
};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Description of one WireGuard relay
#[derive(Debug, Clone)]
pub struct RelaySpec {
    hostname: String,
    location: String,
    active: bool,
    owned: bool,
    provider: String,
    weight: u64,
    include_in_country: bool,
    daita: bool,
}

impl RelaySpec {
    /// An active, owned relay with weight 100
    pub fn new(hostname: &str, location: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            location: location.to_string(),
            active: true,
            owned: true,
            provider: "31173".to_string(),
            weight: 100,
            include_in_country: true,
            daita: false,
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.provider = provider.to_string();
        self
    }

    pub fn weight(mut self, weight: u64) -> Self {
        self.weight = weight;
        self
    }

    pub fn include_in_country(mut self, include: bool) -> Self {
        self.include_in_country = include;
        self
    }

    pub fn daita(mut self, daita: bool) -> Self {
        self.daita = daita;
        self
    }
}

/// Incremental catalog construction
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: RelayCatalog,
}

impl CatalogBuilder {
    /// Empty catalog with a single-port pool of 51820
    pub fn new() -> Self {
        let mut catalog = RelayCatalog::default();
        catalog.wireguard.ipv4_gateway = Ipv4Addr::new(10, 64, 0, 1);
        catalog.wireguard.ipv6_gateway = Some(Ipv6Addr::new(0xfc00, 0xbbbb, 0xbbbb, 0xbb01, 0, 0, 0, 1));
        catalog.wireguard.port_ranges = vec![PortRange::single(51820)];
        Self { catalog }
    }

    pub fn location(
        mut self,
        id: &str,
        country: &str,
        city: &str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        self.catalog.locations.insert(
            id.to_string(),
            ServerLocation {
                country: country.to_string(),
                city: city.to_string(),
                latitude,
                longitude,
            },
        );
        self
    }

    pub fn port_ranges(mut self, ranges: Vec<PortRange>) -> Self {
        self.catalog.wireguard.port_ranges = ranges;
        self
    }

    pub fn relay(mut self, spec: RelaySpec) -> Self {
        let index = self.catalog.wireguard.relays.len();
        let octet = u8::try_from(index % 250).unwrap_or(0) + 1;

        self.catalog.wireguard.relays.push(ServerRelay {
            hostname: spec.hostname,
            active: spec.active,
            owned: spec.owned,
            location: spec.location,
            provider: spec.provider,
            weight: spec.weight,
            ipv4_addr_in: Ipv4Addr::new(185, 213, 154, octet),
            ipv6_addr_in: Some(Ipv6Addr::new(0x2a03, 0x1b20, 0x5, 0xf011, 0, 0, 0, u16::from(octet))),
            public_key: PublicKey::from_bytes([octet; 32]),
            include_in_country: spec.include_in_country,
            daita: spec.daita,
        });
        self
    }

    pub fn bridge(mut self, hostname: &str, location: &str, active: bool) -> Self {
        let octet = u8::try_from(self.catalog.bridge.relays.len() % 250).unwrap_or(0) + 1;

        self.catalog.bridge.relays.push(BridgeRelay {
            hostname: hostname.to_string(),
            active,
            owned: true,
            location: location.to_string(),
            provider: "M247".to_string(),
            weight: 100,
            ipv4_addr_in: Ipv4Addr::new(193, 138, 218, octet),
            include_in_country: true,
        });
        self
    }

    pub fn shadowsocks(mut self, protocol: &str, port: u16) -> Self {
        self.catalog.bridge.shadowsocks.push(ShadowsocksEndpoint {
            protocol: protocol.to_string(),
            port,
            cipher: "aes-256-gcm".to_string(),
            password: "mullvad".to_string(),
        });
        self
    }

    pub fn build(self) -> RelayCatalog {
        self.catalog
    }
}

/// A small European catalog with one relay per interesting case
pub fn sample_catalog() -> RelayCatalog {
    CatalogBuilder::new()
        .location("se-got", "Sweden", "Gothenburg", 57.70887, 11.97456)
        .location("se-sto", "Sweden", "Stockholm", 59.3289, 18.0649)
        .location("de-ber", "Germany", "Berlin", 52.520008, 13.404954)
        .location("gb-lon", "United Kingdom", "London", 51.514, -0.093)
        .port_ranges(vec![
            PortRange::single(53),
            PortRange::new(4000, 33433),
            PortRange::new(33565, 51820),
            PortRange::new(52000, 60000),
        ])
        .relay(RelaySpec::new("se9-wireguard", "se-got").weight(1000).daita(true))
        .relay(RelaySpec::new("se10-wireguard", "se-got").weight(50).owned(false).provider("M247"))
        .relay(RelaySpec::new("se6-wireguard", "se-sto").provider("DataPacket"))
        .relay(RelaySpec::new("se7-wireguard", "se-sto").active(false))
        .relay(RelaySpec::new("de1-wireguard", "de-ber").owned(false).provider("xtom"))
        .relay(RelaySpec::new("gb4-wireguard", "gb-lon").include_in_country(false))
        .bridge("se-sto-br-001", "se-sto", true)
        .bridge("de-ber-br-001", "de-ber", true)
        .bridge("gb-lon-br-001", "gb-lon", false)
        .shadowsocks("tcp", 443)
        .shadowsocks("udp", 1234)
        .build()
}

/// A larger catalog spread over `countries * cities_per_country` locations
pub fn synthetic_catalog(countries: usize, cities_per_country: usize, relays_per_city: usize) -> RelayCatalog {
    let mut builder = CatalogBuilder::new().port_ranges(vec![
        PortRange::single(53),
        PortRange::new(4000, 33433),
        PortRange::new(52000, 60000),
    ]);

    for country in 0..countries {
        for city in 0..cities_per_country {
            let id = format!("c{country}-t{city}");
            // Spread locations over Europe's rough bounding box
            let latitude = 36.0 + (country * 7 + city) as f64 % 34.0;
            let longitude = -9.0 + (country * 11 + city * 3) as f64 % 40.0;
            builder = builder.location(&id, &format!("Country {country}"), &format!("City {city}"), latitude, longitude);

            for relay in 0..relays_per_city {
                let hostname = format!("c{country}t{city}-{relay}-wireguard");
                let spec = RelaySpec::new(&hostname, &id)
                    .weight((relay as u64 % 5) * 100)
                    .owned(relay % 2 == 0)
                    .provider(if relay % 3 == 0 { "31173" } else { "M247" })
                    .daita(relay % 4 == 0);
                builder = builder.relay(spec);
            }

            builder = builder.bridge(&format!("c{country}-t{city}-br"), &id, true);
        }
    }

    builder.shadowsocks("tcp", 443).build()
}
