//! Property-based tests for relay selection
//!
//! Uses proptest to verify invariants across generated catalogs and constraints.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use relay_catalog::{PortRange, RelayCatalog};
use relay_integration_tests::fixtures::{CatalogBuilder, RelaySpec};
use relay_selector::{
    Constraint, DEFAULT_PORT, Ownership, Providers, RelayConstraints, RelayLocation,
    SelectionError, evaluate, relay_matches,
};

const LOCATIONS: [(&str, &str, &str, f64, f64); 5] = [
    ("se-got", "Sweden", "Gothenburg", 57.70887, 11.97456),
    ("se-sto", "Sweden", "Stockholm", 59.3289, 18.0649),
    ("de-ber", "Germany", "Berlin", 52.520008, 13.404954),
    ("de-fra", "Germany", "Frankfurt", 50.110924, 8.682127),
    ("es-mad", "Spain", "Madrid", 40.416775, -3.70379),
];

const PROVIDERS: [&str; 3] = ["31173", "M247", "xtom"];

/// One generated relay: (location index, active, owned, provider index, weight, in country, daita)
type RelayParams = (usize, bool, bool, usize, u64, bool, bool);

fn relay_params() -> impl Strategy<Value = RelayParams> {
    (
        0..LOCATIONS.len(),
        any::<bool>(),
        any::<bool>(),
        0..PROVIDERS.len(),
        0u64..1000,
        any::<bool>(),
        any::<bool>(),
    )
}

fn build_catalog(relays: &[RelayParams]) -> RelayCatalog {
    let mut builder = CatalogBuilder::new().port_ranges(vec![
        PortRange::single(53),
        PortRange::new(4000, 33433),
        PortRange::new(52000, 60000),
    ]);
    for (id, country, city, latitude, longitude) in LOCATIONS {
        builder = builder.location(id, country, city, latitude, longitude);
    }

    for (index, &(location, active, owned, provider, weight, in_country, daita)) in
        relays.iter().enumerate()
    {
        let (id, ..) = LOCATIONS[location];
        let hostname = format!("{}{}-wireguard", &id[..2], index);
        builder = builder.relay(
            RelaySpec::new(&hostname, id)
                .active(active)
                .owned(owned)
                .provider(PROVIDERS[provider])
                .weight(weight)
                .include_in_country(in_country)
                .daita(daita),
        );
        builder = builder.bridge(&format!("{id}-br-{index:03}"), id, active);
    }

    builder.shadowsocks("tcp", 443).build()
}

fn location_constraint() -> impl Strategy<Value = Constraint<RelayLocation>> {
    prop_oneof![
        Just(Constraint::Any),
        prop::sample::select(vec!["se", "de", "es", "gb"])
            .prop_map(|country| Constraint::Only(RelayLocation::country(country))),
        (0..LOCATIONS.len()).prop_map(|index| {
            let (id, ..) = LOCATIONS[index];
            Constraint::Only(RelayLocation::city(&id[..2], &id[3..]))
        }),
    ]
}

fn constraints() -> impl Strategy<Value = RelayConstraints> {
    (
        location_constraint(),
        prop_oneof![
            Just(Constraint::Any),
            Just(Constraint::Only(Ownership::MullvadOwned)),
            Just(Constraint::Only(Ownership::Rented)),
        ],
        prop::option::of(prop::sample::subsequence(PROVIDERS.to_vec(), 1..=2)),
        any::<bool>(),
    )
        .prop_map(|(location, ownership, providers, daita)| RelayConstraints {
            location,
            ownership,
            providers: providers
                .and_then(|names| Providers::new(names).ok())
                .into(),
            daita,
            ..RelayConstraints::new()
        })
}

// ============================================================================
// Matching Properties
// ============================================================================

mod matching_properties {
    use super::*;

    proptest! {
        /// A selected relay satisfies every constraint
        #[test]
        fn selection_respects_constraints(
            relays in prop::collection::vec(relay_params(), 0..24),
            constraints in constraints(),
            failed_attempts in 0u32..16,
            seed in any::<u64>(),
        ) {
            let catalog = build_catalog(&relays);
            let mut rng = StdRng::seed_from_u64(seed);

            if let Ok(selected) = evaluate(&catalog, &constraints, failed_attempts, &mut rng) {
                prop_assert!(selected.relay.active);
                prop_assert!(relay_matches(&constraints, &selected.relay, &selected.location));
                prop_assert_eq!(*selected.endpoint.ipv4_relay.ip(), selected.relay.ipv4_addr_in);
                prop_assert_eq!(selected.endpoint.public_key, selected.relay.public_key);
            }
        }

        /// Selection fails exactly when no relay matches
        #[test]
        fn no_match_iff_no_candidates(
            relays in prop::collection::vec(relay_params(), 0..24),
            constraints in constraints(),
            seed in any::<u64>(),
        ) {
            let catalog = build_catalog(&relays);
            let mut rng = StdRng::seed_from_u64(seed);

            let any_match = catalog.wireguard_relays().iter().any(|relay| {
                catalog
                    .resolve_location(relay)
                    .is_some_and(|location| relay_matches(&constraints, relay, &location))
            });

            match evaluate(&catalog, &constraints, 0, &mut rng) {
                Ok(_) => prop_assert!(any_match),
                Err(SelectionError::NoMatchingRelay) => prop_assert!(!any_match),
            }
        }

        /// Country selection never picks relays excluded from it
        #[test]
        fn country_selection_skips_excluded(
            relays in prop::collection::vec(relay_params(), 1..24),
            seed in any::<u64>(),
        ) {
            let catalog = build_catalog(&relays);
            let mut rng = StdRng::seed_from_u64(seed);

            for (id, ..) in LOCATIONS {
                let constraints = RelayConstraints::new()
                    .with_location(RelayLocation::country(&id[..2]));
                if let Ok(selected) = evaluate(&catalog, &constraints, 0, &mut rng) {
                    prop_assert!(selected.relay.include_in_country);
                }
            }
        }
    }
}

// ============================================================================
// Port Policy Properties
// ============================================================================

mod port_properties {
    use super::*;

    proptest! {
        /// Without a port constraint the port follows the four-attempt cycle
        #[test]
        fn port_cycle(
            relays in prop::collection::vec(relay_params(), 1..12),
            failed_attempts in any::<u32>(),
            seed in any::<u64>(),
        ) {
            let catalog = build_catalog(&relays);
            let mut rng = StdRng::seed_from_u64(seed);

            if let Ok(selected) = evaluate(&catalog, &RelayConstraints::new(), failed_attempts, &mut rng) {
                let port = selected.endpoint.ipv4_relay.port();
                if failed_attempts % 4 >= 2 {
                    prop_assert_eq!(port, DEFAULT_PORT);
                } else {
                    prop_assert!(catalog.port_ranges().iter().any(|range| range.contains(port)));
                }
            }
        }

        /// An explicit port is used on every attempt
        #[test]
        fn explicit_port_wins(
            relays in prop::collection::vec(relay_params(), 1..12),
            port in 1u16..=u16::MAX,
            failed_attempts in any::<u32>(),
            seed in any::<u64>(),
        ) {
            let catalog = build_catalog(&relays);
            let mut rng = StdRng::seed_from_u64(seed);
            let constraints = RelayConstraints::new().with_port(port);

            if let Ok(selected) = evaluate(&catalog, &constraints, failed_attempts, &mut rng) {
                prop_assert_eq!(selected.endpoint.ipv4_relay.port(), port);
                if let Some(ipv6) = selected.endpoint.ipv6_relay {
                    prop_assert_eq!(ipv6.port(), port);
                }
            }
        }
    }
}

// ============================================================================
// Determinism Properties
// ============================================================================

mod determinism_properties {
    use super::*;

    proptest! {
        /// The same seed gives the same selection
        #[test]
        fn seeded_selection_is_reproducible(
            relays in prop::collection::vec(relay_params(), 0..24),
            constraints in constraints(),
            failed_attempts in 0u32..16,
            seed in any::<u64>(),
        ) {
            let catalog = build_catalog(&relays);

            let first = evaluate(&catalog, &constraints, failed_attempts, &mut StdRng::seed_from_u64(seed));
            let second = evaluate(&catalog, &constraints, failed_attempts, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(first, second);
        }
    }
}

// ============================================================================
// Bridge Properties
// ============================================================================

mod bridge_properties {
    use super::*;
    use relay_selector::RelaySelector;

    proptest! {
        /// A chosen bridge is always active
        #[test]
        fn closest_bridge_is_active(
            relays in prop::collection::vec(relay_params(), 0..24),
            constraints in constraints(),
            seed in any::<u64>(),
        ) {
            let catalog = build_catalog(&relays);
            let selector = RelaySelector::new(&catalog);
            let mut rng = StdRng::seed_from_u64(seed);

            let any_active = catalog.bridge.relays.iter().any(|bridge| bridge.active);
            match selector.closest_shadowsocks_relay(&constraints, &mut rng) {
                Some(bridge) => prop_assert!(bridge.active),
                None => prop_assert!(!any_active),
            }
        }
    }
}

// ============================================================================
// Constraint Text Properties
// ============================================================================

mod constraint_text_properties {
    use super::*;

    proptest! {
        /// Displayed locations parse back to the same constraint
        #[test]
        fn location_text_roundtrip(
            country in "[a-z]{2}",
            city in "[a-z]{3}",
            hostname in "[a-z]{2}[0-9]{1,3}-wireguard",
        ) {
            for location in [
                RelayLocation::country(country.clone()),
                RelayLocation::city(country.clone(), city.clone()),
                RelayLocation::hostname(country.clone(), city.clone(), hostname.clone()),
            ] {
                let parsed: RelayLocation = location.to_string().parse().unwrap();
                prop_assert_eq!(parsed, location);
            }
        }

        /// Location text never panics the parser
        #[test]
        fn location_parse_total(text in "\\PC{0,32}") {
            let _ = text.parse::<Constraint<RelayLocation>>();
        }
    }
}
