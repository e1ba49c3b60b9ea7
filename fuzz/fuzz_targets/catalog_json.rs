//! Fuzz test for relay list parsing
//!
//! Tests that arbitrary input doesn't cause panics when parsed as a relay
//! list, and that whatever parses can be validated and selected from.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;
use relay_catalog::RelayCatalog;
use relay_selector::{RelayConstraints, RelaySelector};

fuzz_target!(|data: &[u8]| {
    let Ok(catalog) = RelayCatalog::from_json_slice(data) else {
        return;
    };

    let _ = catalog.validate();

    let selector = RelaySelector::new(&catalog);
    let mut rng = StdRng::seed_from_u64(0);
    for attempt in 0..4 {
        let _ = selector.evaluate(&RelayConstraints::new(), attempt, &mut rng);
    }
    let _ = selector.closest_shadowsocks_relay(&RelayConstraints::new(), &mut rng);
});
