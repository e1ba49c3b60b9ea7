//! Constraint matching over catalog relays.

use relay_catalog::{Location, RelayCatalog, RelayEntry};

use crate::constraints::RelayConstraints;

/// A relay that satisfies the constraints, with its resolved location
#[derive(Debug, Clone)]
pub struct Candidate<'a, T> {
    /// The catalog entry
    pub relay: &'a T,
    /// Its resolved location
    pub location: Location,
}

/// Whether an already located relay satisfies every constraint.
///
/// The port constraint is not a relay property and is ignored here.
pub fn relay_matches<T: RelayEntry + ?Sized>(
    constraints: &RelayConstraints,
    relay: &T,
    location: &Location,
) -> bool {
    relay.is_active()
        && constraints
            .location
            .matches_with(|required| required.matches(relay, location))
        && constraints
            .ownership
            .matches_with(|ownership| ownership.matches(relay.is_owned()))
        && constraints
            .providers
            .matches_with(|providers| providers.contains(relay.provider()))
        && (!constraints.daita || relay.is_daita_capable())
}

/// Relays from `relays` that satisfy `constraints`, in catalog order.
///
/// Relays whose location id is unknown to the catalog, or has no country
/// and city code, never match.
pub fn matching_relays<'a, T: RelayEntry>(
    catalog: &RelayCatalog,
    relays: &'a [T],
    constraints: &RelayConstraints,
) -> Vec<Candidate<'a, T>> {
    let mut unresolved = 0usize;

    let candidates: Vec<_> = relays
        .iter()
        .filter_map(|relay| {
            let Some(location) = catalog.resolve_location(relay) else {
                unresolved += 1;
                return None;
            };
            relay_matches(constraints, relay, &location).then_some(Candidate { relay, location })
        })
        .collect();

    if unresolved > 0 {
        tracing::debug!("Skipped {} relay(s) with unresolvable location", unresolved);
    }
    tracing::debug!(
        "{} of {} relays match constraints ({})",
        candidates.len(),
        relays.len(),
        constraints
    );

    candidates
}
