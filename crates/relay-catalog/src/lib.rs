//! # Relay Catalog
//!
//! In-memory model of the relay list a VPN client selects relays from.
//!
//! This crate provides:
//! - Locations keyed by id (`"se-got"`) with country, city and coordinates
//! - WireGuard relays with weight, ownership, provider and capability flags
//! - Tunnel port ranges and gateway addresses
//! - Shadowsocks bridge relays and endpoints
//! - JSON decoding of the published relay list
//! - Integrity checks ([`RelayCatalog::validate`])
//! - Lock-free snapshot publication ([`CatalogStore`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use relay_catalog::{CatalogStore, RelayCatalog};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CatalogStore::default();
//! store.publish(RelayCatalog::load("relays.json")?);
//!
//! let catalog = store.snapshot();
//! for issue in catalog.validate() {
//!     eprintln!("{issue}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod location;
pub mod ports;
pub mod relay;
pub mod store;

pub use catalog::{BridgeRelays, CatalogIssue, RelayCatalog, WireguardRelays};
pub use error::CatalogError;
pub use location::{Location, ServerLocation, split_location_id};
pub use ports::{PortRange, port_count};
pub use relay::{BridgeRelay, PublicKey, RelayEntry, ServerRelay, ShadowsocksEndpoint};
pub use store::CatalogStore;

/// WireGuard public key length in bytes
pub const PUBLIC_KEY_LEN: usize = 32;
