//! The relay catalog and its integrity checks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::error::CatalogError;
use crate::location::{Location, ServerLocation, split_location_id};
use crate::ports::{PortRange, port_count};
use crate::relay::{BridgeRelay, RelayEntry, ServerRelay, ShadowsocksEndpoint};

/// Snapshot of every relay the client may connect through.
///
/// Catalogs are immutable once published; a refresher replaces the whole
/// snapshot (see [`CatalogStore`](crate::CatalogStore)).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayCatalog {
    /// Location id to location details
    pub locations: BTreeMap<String, ServerLocation>,
    /// WireGuard relays and tunnel parameters
    pub wireguard: WireguardRelays,
    /// Shadowsocks bridges
    #[serde(default)]
    pub bridge: BridgeRelays,
}

/// WireGuard section of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireguardRelays {
    /// In-tunnel IPv4 gateway
    pub ipv4_gateway: Ipv4Addr,
    /// In-tunnel IPv6 gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_gateway: Option<Ipv6Addr>,
    /// Pool of ports the tunnel may use
    #[serde(default)]
    pub port_ranges: Vec<PortRange>,
    /// Relay servers
    #[serde(default)]
    pub relays: Vec<ServerRelay>,
}

impl Default for WireguardRelays {
    fn default() -> Self {
        Self {
            ipv4_gateway: Ipv4Addr::UNSPECIFIED,
            ipv6_gateway: None,
            port_ranges: Vec::new(),
            relays: Vec::new(),
        }
    }
}

/// Bridge section of the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeRelays {
    /// Shadowsocks server parameters
    #[serde(default)]
    pub shadowsocks: Vec<ShadowsocksEndpoint>,
    /// Bridge relay servers
    #[serde(default)]
    pub relays: Vec<BridgeRelay>,
}

/// A data integrity problem found by [`RelayCatalog::validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogIssue {
    /// A relay references a location id missing from `locations`
    UnknownLocation {
        /// Relay hostname
        hostname: String,
        /// The dangling location id
        location: String,
    },
    /// A location id without country and city codes
    MalformedLocationId {
        /// The offending id
        location: String,
    },
    /// A port range with `start > end`
    InvalidPortRange(PortRange),
    /// No valid port range at all
    EmptyPortPool,
    /// Latitude or longitude out of range
    InvalidCoordinates {
        /// Location id
        location: String,
        /// Latitude in degrees
        latitude: f64,
        /// Longitude in degrees
        longitude: f64,
    },
    /// Two relays share a hostname
    DuplicateHostname(String),
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLocation { hostname, location } => {
                write!(f, "relay {hostname} references unknown location {location}")
            }
            Self::MalformedLocationId { location } => {
                write!(f, "location id {location:?} has no country and city code")
            }
            Self::InvalidPortRange(range) => {
                write!(f, "port range [{}, {}] is inverted", range.start, range.end)
            }
            Self::EmptyPortPool => f.write_str("no valid WireGuard port range"),
            Self::InvalidCoordinates {
                location,
                latitude,
                longitude,
            } => write!(
                f,
                "location {location} has invalid coordinates ({latitude}, {longitude})"
            ),
            Self::DuplicateHostname(hostname) => write!(f, "duplicate relay hostname {hostname}"),
        }
    }
}

impl RelayCatalog {
    /// Parse a catalog from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the input is not a valid relay list.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a catalog from JSON bytes
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the input is not a valid relay list.
    pub fn from_json_slice(json: &[u8]) -> Result<Self, CatalogError> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Parse a catalog from a reader
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the input is not a valid relay list.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref())?;
        let catalog = Self::from_reader(BufReader::new(file))?;

        tracing::debug!(
            "Loaded relay list from {}: {} locations, {} WireGuard relays, {} bridges",
            path.as_ref().display(),
            catalog.locations.len(),
            catalog.wireguard.relays.len(),
            catalog.bridge.relays.len()
        );

        Ok(catalog)
    }

    /// Serialize the catalog as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// WireGuard relays in catalog order
    #[must_use]
    pub fn wireguard_relays(&self) -> &[ServerRelay] {
        &self.wireguard.relays
    }

    /// WireGuard port ranges in catalog order
    #[must_use]
    pub fn port_ranges(&self) -> &[PortRange] {
        &self.wireguard.port_ranges
    }

    /// Look up a location entry by id
    #[must_use]
    pub fn location(&self, location_id: &str) -> Option<&ServerLocation> {
        self.locations.get(location_id)
    }

    /// Resolve a relay's location, or `None` if its id is dangling or malformed
    #[must_use]
    pub fn resolve_location<T: RelayEntry + ?Sized>(&self, relay: &T) -> Option<Location> {
        let server_location = self.location(relay.location_id())?;
        Location::resolve(relay.location_id(), server_location)
    }

    /// Find a WireGuard relay by hostname
    #[must_use]
    pub fn relay_by_hostname(&self, hostname: &str) -> Option<&ServerRelay> {
        self.wireguard
            .relays
            .iter()
            .find(|relay| relay.hostname == hostname)
    }

    /// Check the catalog for integrity problems.
    ///
    /// Problems do not prevent selection: relays with unresolvable locations
    /// are skipped and invalid port ranges contribute no ports.
    #[must_use]
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for (id, location) in &self.locations {
            if split_location_id(id).is_none() {
                issues.push(CatalogIssue::MalformedLocationId {
                    location: id.clone(),
                });
            }
            if !location.has_valid_coordinates() {
                issues.push(CatalogIssue::InvalidCoordinates {
                    location: id.clone(),
                    latitude: location.latitude,
                    longitude: location.longitude,
                });
            }
        }

        let relays = self
            .wireguard
            .relays
            .iter()
            .map(|relay| relay as &dyn RelayEntry)
            .chain(self.bridge.relays.iter().map(|relay| relay as &dyn RelayEntry));

        let mut seen = HashSet::new();
        for relay in relays {
            if !self.locations.contains_key(relay.location_id()) {
                issues.push(CatalogIssue::UnknownLocation {
                    hostname: relay.hostname().to_string(),
                    location: relay.location_id().to_string(),
                });
            }
            if !seen.insert(relay.hostname()) {
                issues.push(CatalogIssue::DuplicateHostname(relay.hostname().to_string()));
            }
        }

        for range in &self.wireguard.port_ranges {
            if !range.is_valid() {
                issues.push(CatalogIssue::InvalidPortRange(*range));
            }
        }
        if port_count(&self.wireguard.port_ranges) == 0 {
            issues.push(CatalogIssue::EmptyPortPool);
        }

        issues
    }
}
