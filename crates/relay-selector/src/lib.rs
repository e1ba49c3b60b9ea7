//! # Relay Selector
//!
//! Picks the relay and endpoint a WireGuard VPN client connects through.
//!
//! This crate provides:
//! - Location, ownership, provider and DAITA constraints
//! - Matching over a [`RelayCatalog`](relay_catalog::RelayCatalog) snapshot
//! - Weighted random relay choice
//! - A port policy driven by the number of failed connection attempts
//! - Shadowsocks bridge selection by geographic proximity
//!
//! ## Selection
//!
//! ```text
//!  catalog ──► active ──► location ──► ownership/providers/DAITA ──► weighted draw ──► relay
//!                                                                                        │
//!  failed attempts ──► phase (n mod 4) ──► 0,1: random pool port / 2,3: port 53 ──► endpoint
//! ```
//!
//! Selection is a pure function of the catalog, the constraints, the failure
//! count and the RNG. Seeding the RNG makes it reproducible.
//!
//! ## Example
//!
//! ```rust,no_run
//! use relay_catalog::RelayCatalog;
//! use relay_selector::{RelayConstraints, RelayLocation, RelaySelector};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = RelayCatalog::load("relays.json")?;
//! let constraints = RelayConstraints::new().with_location(RelayLocation::city("se", "got"));
//!
//! let selected = RelaySelector::new(&catalog).evaluate(&constraints, 0, &mut rand::thread_rng())?;
//! println!("{} via {}", selected.relay.hostname, selected.endpoint.ipv4_relay);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod constraints;
pub mod error;
pub mod geo;
pub mod matcher;
pub mod port;
pub mod selector;
pub mod weighted;

pub use bridge::{MAX_BRIDGE_CANDIDATES, MAX_BRIDGE_DISTANCE_KM};
pub use constraints::{Constraint, Ownership, Providers, RelayConstraints, RelayLocation};
pub use error::{ParseConstraintError, SelectionError};
pub use geo::{GeoCoordinate, haversine_distance, midpoint};
pub use matcher::{Candidate, matching_relays, relay_matches};
pub use port::{DEFAULT_PORT, PORT_POLICY_PERIOD, PortStrategy, port_strategy, random_port, select_port};
pub use selector::{RelaySelector, SelectedRelay, TransportProtocol, WireguardEndpoint, evaluate};
pub use weighted::pick_weighted;
