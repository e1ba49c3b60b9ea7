//! Fuzz test for textual constraint parsing
//!
//! Tests that arbitrary strings don't cause panics when parsed as location,
//! ownership, provider or port constraints.

#![no_main]

use libfuzzer_sys::fuzz_target;
use relay_selector::{Constraint, Ownership, Providers, RelayLocation};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(location) = s.parse::<Constraint<RelayLocation>>() {
            // Displayed locations parse back to themselves
            let reparsed = location.to_string().parse::<Constraint<RelayLocation>>();
            assert_eq!(reparsed.ok(), Some(location));
        }

        let _ = s.parse::<Constraint<Ownership>>();
        let _ = s.parse::<Constraint<Providers>>();
        let _ = s.parse::<Constraint<u16>>();
    }
});
