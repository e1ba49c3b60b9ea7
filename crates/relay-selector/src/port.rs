//! Tunnel port policy.
//!
//! Without an explicit port the policy cycles with period four over the
//! number of failed connection attempts: two attempts on a random port from
//! the catalog pool, then two on port 53.

use rand::Rng;
use relay_catalog::PortRange;

use crate::constraints::Constraint;

/// Port used after repeated failures
pub const DEFAULT_PORT: u16 = 53;

/// Length of the port policy cycle, in attempts
pub const PORT_POLICY_PERIOD: u32 = 4;

/// How the port for an attempt is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStrategy {
    /// Uniform draw over all pool ports
    Random,
    /// [`DEFAULT_PORT`]
    Default,
}

/// Strategy for the attempt following `failed_attempts` failures
#[must_use]
pub const fn port_strategy(failed_attempts: u32) -> PortStrategy {
    match failed_attempts % PORT_POLICY_PERIOD {
        2 | 3 => PortStrategy::Default,
        _ => PortStrategy::Random,
    }
}

/// Draw a port uniformly over the union of `ranges`.
///
/// Every port is equally likely regardless of the width of its range.
/// Inverted ranges contribute nothing. Returns `None` for an empty pool.
pub fn random_port<R: Rng + ?Sized>(ranges: &[PortRange], rng: &mut R) -> Option<u16> {
    let total = relay_catalog::port_count(ranges);
    if total == 0 {
        return None;
    }

    let mut index = rng.gen_range(0..total);
    for range in ranges.iter().filter(|range| range.is_valid()) {
        let len = u64::from(range.len());
        if index < len {
            // index < len <= 65536, and start + index <= end
            return Some(range.start + index as u16);
        }
        index -= len;
    }

    None
}

/// Choose the tunnel port for an attempt.
///
/// An explicit port constraint always wins. Returns `None` only when the
/// policy asks for a random port and the pool is empty.
pub fn select_port<R: Rng + ?Sized>(
    constraint: &Constraint<u16>,
    ranges: &[PortRange],
    failed_attempts: u32,
    rng: &mut R,
) -> Option<u16> {
    if let Constraint::Only(port) = constraint {
        return Some(*port);
    }

    match port_strategy(failed_attempts) {
        PortStrategy::Default => Some(DEFAULT_PORT),
        PortStrategy::Random => random_port(ranges, rng),
    }
}
