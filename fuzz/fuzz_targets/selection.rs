//! Fuzz test for relay selection
//!
//! Builds small catalogs from fuzzer input and checks that selection never
//! panics and only returns relays satisfying the constraints.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;
use relay_catalog::{PortRange, PublicKey, RelayCatalog, ServerLocation, ServerRelay};
use relay_selector::{Ownership, RelayConstraints, RelayLocation, evaluate, relay_matches};
use std::net::Ipv4Addr;

const LOCATION_IDS: [&str; 4] = ["se-got", "se-sto", "de-ber", "xx"];

#[derive(Debug, Arbitrary)]
struct FuzzRelay {
    location: u8,
    active: bool,
    owned: bool,
    weight: u64,
    include_in_country: bool,
    daita: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    relays: Vec<FuzzRelay>,
    port_ranges: Vec<(u16, u16)>,
    location: Option<u8>,
    ownership: Option<bool>,
    port: Option<u16>,
    daita: bool,
    failed_attempts: u32,
    seed: u64,
}

fuzz_target!(|input: FuzzInput| {
    let mut catalog = RelayCatalog::default();
    for id in &LOCATION_IDS[..3] {
        catalog.locations.insert(
            (*id).to_string(),
            ServerLocation {
                country: id[..2].to_string(),
                city: id[3..].to_string(),
                latitude: 50.0,
                longitude: 10.0,
            },
        );
    }
    catalog.wireguard.port_ranges = input
        .port_ranges
        .iter()
        .map(|&(start, end)| PortRange::new(start, end))
        .collect();

    for (index, relay) in input.relays.iter().take(64).enumerate() {
        catalog.wireguard.relays.push(ServerRelay {
            hostname: format!("relay{index}"),
            active: relay.active,
            owned: relay.owned,
            location: LOCATION_IDS[usize::from(relay.location) % LOCATION_IDS.len()].to_string(),
            provider: "31173".to_string(),
            weight: relay.weight,
            ipv4_addr_in: Ipv4Addr::LOCALHOST,
            ipv6_addr_in: None,
            public_key: PublicKey::from_bytes([0; 32]),
            include_in_country: relay.include_in_country,
            daita: relay.daita,
        });
    }

    let mut constraints = RelayConstraints::new().with_daita(input.daita);
    if let Some(location) = input.location {
        let id = LOCATION_IDS[usize::from(location) % 3];
        constraints = constraints.with_location(if location % 2 == 0 {
            RelayLocation::country(&id[..2])
        } else {
            RelayLocation::city(&id[..2], &id[3..])
        });
    }
    if let Some(owned) = input.ownership {
        constraints = constraints.with_ownership(if owned {
            Ownership::MullvadOwned
        } else {
            Ownership::Rented
        });
    }
    if let Some(port) = input.port {
        constraints = constraints.with_port(port);
    }

    let mut rng = StdRng::seed_from_u64(input.seed);
    if let Ok(selected) = evaluate(&catalog, &constraints, input.failed_attempts, &mut rng) {
        assert!(relay_matches(&constraints, &selected.relay, &selected.location));
        if let Some(port) = input.port {
            assert_eq!(selected.endpoint.ipv4_relay.port(), port);
        }
    }
});
