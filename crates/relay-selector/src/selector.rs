//! WireGuard relay selection.

use rand::Rng;
use relay_catalog::{Location, PublicKey, RelayCatalog, ServerRelay};
use serde::Serialize;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

use crate::constraints::RelayConstraints;
use crate::error::SelectionError;
use crate::matcher::{Candidate, matching_relays};
use crate::port::{port_strategy, select_port};
use crate::weighted::pick_weighted;

/// Transport protocol of the tunnel endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    /// UDP (WireGuard)
    Udp,
    /// TCP
    Tcp,
}

/// Where and how to reach the selected relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireguardEndpoint {
    /// IPv4 relay address and port
    pub ipv4_relay: SocketAddrV4,
    /// IPv6 relay address and port, when the relay has an IPv6 address
    pub ipv6_relay: Option<SocketAddrV6>,
    /// Transport protocol
    pub protocol: TransportProtocol,
    /// In-tunnel IPv4 gateway
    pub ipv4_gateway: Ipv4Addr,
    /// In-tunnel IPv6 gateway
    pub ipv6_gateway: Option<Ipv6Addr>,
    /// Relay public key
    pub public_key: PublicKey,
}

/// Result of a successful selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRelay {
    /// The chosen relay
    pub relay: ServerRelay,
    /// Its resolved location
    pub location: Location,
    /// Endpoint to configure the tunnel with
    pub endpoint: WireguardEndpoint,
}

/// Selects relays from one catalog snapshot.
///
/// Holds no state besides the borrowed catalog; all randomness comes from
/// the RNG passed to each call.
#[derive(Debug, Clone, Copy)]
pub struct RelaySelector<'a> {
    catalog: &'a RelayCatalog,
}

impl<'a> RelaySelector<'a> {
    /// Create a selector over `catalog`
    #[must_use]
    pub const fn new(catalog: &'a RelayCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog being selected from
    #[must_use]
    pub const fn catalog(&self) -> &'a RelayCatalog {
        self.catalog
    }

    /// Active WireGuard relays satisfying `constraints`, in catalog order
    #[must_use]
    pub fn candidates(&self, constraints: &RelayConstraints) -> Vec<Candidate<'a, ServerRelay>> {
        matching_relays(self.catalog, self.catalog.wireguard_relays(), constraints)
    }

    /// Pick a relay and endpoint for the next connection attempt.
    ///
    /// The relay is drawn by weight among the matching relays. The port comes
    /// from the port constraint if set, otherwise from the failure-aware port
    /// policy (see [`crate::port`]).
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoMatchingRelay`] if no active relay matches
    /// or the policy needs a random port and the catalog has none.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        constraints: &RelayConstraints,
        failed_attempts: u32,
        rng: &mut R,
    ) -> Result<SelectedRelay, SelectionError> {
        let candidates = self.candidates(constraints);

        let candidate = pick_weighted(&candidates, |candidate| candidate.relay.weight, rng)
            .ok_or(SelectionError::NoMatchingRelay)?;

        let port = select_port(
            &constraints.port,
            self.catalog.port_ranges(),
            failed_attempts,
            rng,
        )
        .ok_or_else(|| {
            tracing::warn!("Relay list has no usable WireGuard port range");
            SelectionError::NoMatchingRelay
        })?;

        tracing::debug!(
            "Selected {} port {} (attempt {}, {:?} port strategy)",
            candidate.relay.hostname,
            port,
            failed_attempts,
            port_strategy(failed_attempts)
        );

        Ok(self.build_selection(candidate, port))
    }

    fn build_selection(&self, candidate: &Candidate<'a, ServerRelay>, port: u16) -> SelectedRelay {
        let relay = candidate.relay;
        let wireguard = &self.catalog.wireguard;

        let endpoint = WireguardEndpoint {
            ipv4_relay: SocketAddrV4::new(relay.ipv4_addr_in, port),
            ipv6_relay: relay
                .ipv6_addr_in
                .map(|addr| SocketAddrV6::new(addr, port, 0, 0)),
            protocol: TransportProtocol::Udp,
            ipv4_gateway: wireguard.ipv4_gateway,
            ipv6_gateway: wireguard.ipv6_gateway,
            public_key: relay.public_key,
        };

        SelectedRelay {
            relay: relay.clone(),
            location: candidate.location.clone(),
            endpoint,
        }
    }
}

/// Pick a relay and endpoint from `catalog`; see [`RelaySelector::evaluate`].
///
/// # Errors
///
/// Returns [`SelectionError::NoMatchingRelay`] if the constraints cannot be
/// satisfied.
pub fn evaluate<R: Rng + ?Sized>(
    catalog: &RelayCatalog,
    constraints: &RelayConstraints,
    failed_attempts: u32,
    rng: &mut R,
) -> Result<SelectedRelay, SelectionError> {
    RelaySelector::new(catalog).evaluate(constraints, failed_attempts, rng)
}
