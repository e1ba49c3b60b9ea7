//! Shadowsocks bridge selection.

use rand::Rng;
use rand::seq::SliceRandom;
use relay_catalog::{BridgeRelay, ShadowsocksEndpoint};

use crate::constraints::RelayConstraints;
use crate::geo::{GeoCoordinate, haversine_distance, midpoint};
use crate::matcher::matching_relays;
use crate::selector::RelaySelector;
use crate::weighted::pick_weighted;

/// Bridges farther than this from the midpoint of the matches are not considered
pub const MAX_BRIDGE_DISTANCE_KM: f64 = 1500.0;

/// At most this many of the closest bridges take part in the final draw
pub const MAX_BRIDGE_CANDIDATES: usize = 5;

struct BridgeWithDistance<'a> {
    relay: &'a BridgeRelay,
    distance: f64,
}

impl<'a> RelaySelector<'a> {
    /// A random Shadowsocks endpoint running over TCP
    pub fn shadowsocks_tcp_bridge<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<&'a ShadowsocksEndpoint> {
        let tcp: Vec<&ShadowsocksEndpoint> = self
            .catalog()
            .bridge
            .shadowsocks
            .iter()
            .filter(|endpoint| endpoint.is_tcp())
            .collect();

        tcp.choose(rng).copied()
    }

    /// A random active bridge relay
    pub fn shadowsocks_relay<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'a BridgeRelay> {
        let active: Vec<&BridgeRelay> = self
            .catalog()
            .bridge
            .relays
            .iter()
            .filter(|relay| relay.active)
            .collect();

        active.choose(rng).copied()
    }

    /// The bridge relay closest to the relays the user asked for.
    ///
    /// Bridges matching the location, ownership and provider constraints are
    /// ranked by distance to their geographic midpoint. Of those within
    /// [`MAX_BRIDGE_DISTANCE_KM`], the [`MAX_BRIDGE_CANDIDATES`] closest are
    /// drawn from with weights favouring shorter distances. When no bridge
    /// matches, any active bridge is returned.
    pub fn closest_shadowsocks_relay<R: Rng + ?Sized>(
        &self,
        constraints: &RelayConstraints,
        rng: &mut R,
    ) -> Option<&'a BridgeRelay> {
        // Bridges carry no DAITA capability; only location and hosting filters apply
        let bridge_constraints = RelayConstraints {
            daita: false,
            ..constraints.clone()
        };
        let matches = matching_relays(
            self.catalog(),
            &self.catalog().bridge.relays,
            &bridge_constraints,
        );

        if matches.is_empty() {
            tracing::debug!("No bridge matches constraints, picking any active bridge");
            return self.shadowsocks_relay(rng);
        }

        let points: Vec<GeoCoordinate> = matches
            .iter()
            .map(|candidate| GeoCoordinate::from(&candidate.location))
            .collect();
        let center = midpoint(&points)?;

        let mut ranked: Vec<BridgeWithDistance<'a>> = matches
            .iter()
            .map(|candidate| BridgeWithDistance {
                relay: candidate.relay,
                distance: haversine_distance(center, GeoCoordinate::from(&candidate.location)),
            })
            .collect();
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked.retain(|bridge| bridge.distance <= MAX_BRIDGE_DISTANCE_KM);
        ranked.truncate(MAX_BRIDGE_CANDIDATES);

        let greatest = ranked
            .iter()
            .map(|bridge| bridge.distance)
            .fold(0.0, f64::max);

        if let Some(bridge) = pick_weighted(
            &ranked,
            |bridge| (1.0 + greatest - bridge.distance) as u64,
            rng,
        ) {
            return Some(bridge.relay);
        }

        tracing::debug!(
            "No bridge within {} km of the midpoint, picking a random match",
            MAX_BRIDGE_DISTANCE_KM
        );
        matches.choose(rng).map(|candidate| candidate.relay)
    }
}
