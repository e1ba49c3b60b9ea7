//! Relay entries: WireGuard relays, Shadowsocks bridge relays and endpoints.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::CatalogError;
use crate::PUBLIC_KEY_LEN;

/// WireGuard public key of a relay (base64 on the wire)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Wrap raw key bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Decode a base64 encoded key
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidPublicKey`] if the input is not base64 or
    /// does not decode to exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, CatalogError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CatalogError::InvalidPublicKey(e.to_string()))?;

        let key: [u8; PUBLIC_KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            CatalogError::InvalidPublicKey(format!(
                "expected {PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self(key))
    }

    /// Base64 representation
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Raw key bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

fn default_true() -> bool {
    true
}

/// Common view over the relay kinds in a catalog, used for constraint matching.
pub trait RelayEntry {
    /// Relay hostname (e.g. "se6-wireguard")
    fn hostname(&self) -> &str;
    /// Location id (e.g. "se-got")
    fn location_id(&self) -> &str;
    /// Whether the relay accepts connections
    fn is_active(&self) -> bool;
    /// Whether the relay hardware is owned rather than rented
    fn is_owned(&self) -> bool;
    /// Hosting provider name
    fn provider(&self) -> &str;
    /// Selection weight
    fn weight(&self) -> u64;
    /// Whether the relay takes part in country-wide selection
    fn include_in_country(&self) -> bool;
    /// Whether the relay supports DAITA
    fn is_daita_capable(&self) -> bool {
        false
    }
}

/// A WireGuard relay server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRelay {
    /// Hostname
    pub hostname: String,
    /// Whether the relay accepts connections
    pub active: bool,
    /// Whether the relay hardware is owned
    pub owned: bool,
    /// Location id into the catalog's `locations`
    pub location: String,
    /// Hosting provider
    pub provider: String,
    /// Selection weight
    pub weight: u64,
    /// IPv4 entry address
    pub ipv4_addr_in: Ipv4Addr,
    /// IPv6 entry address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_addr_in: Option<Ipv6Addr>,
    /// WireGuard public key
    pub public_key: PublicKey,
    /// Whether the relay is picked for country constraints
    #[serde(default = "default_true")]
    pub include_in_country: bool,
    /// DAITA support
    #[serde(default)]
    pub daita: bool,
}

impl RelayEntry for ServerRelay {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn location_id(&self) -> &str {
        &self.location
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_owned(&self) -> bool {
        self.owned
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn weight(&self) -> u64 {
        self.weight
    }

    fn include_in_country(&self) -> bool {
        self.include_in_country
    }

    fn is_daita_capable(&self) -> bool {
        self.daita
    }
}

/// A Shadowsocks bridge relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRelay {
    /// Hostname
    pub hostname: String,
    /// Whether the bridge accepts connections
    pub active: bool,
    /// Whether the bridge hardware is owned
    pub owned: bool,
    /// Location id into the catalog's `locations`
    pub location: String,
    /// Hosting provider
    pub provider: String,
    /// Selection weight
    pub weight: u64,
    /// IPv4 entry address
    pub ipv4_addr_in: Ipv4Addr,
    /// Whether the bridge is picked for country constraints
    #[serde(default = "default_true")]
    pub include_in_country: bool,
}

impl RelayEntry for BridgeRelay {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn location_id(&self) -> &str {
        &self.location
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_owned(&self) -> bool {
        self.owned
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn weight(&self) -> u64 {
        self.weight
    }

    fn include_in_country(&self) -> bool {
        self.include_in_country
    }
}

/// Shadowsocks server parameters shared by all bridge relays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksEndpoint {
    /// Transport protocol ("tcp" or "udp")
    pub protocol: String,
    /// Port
    pub port: u16,
    /// Cipher name
    pub cipher: String,
    /// Shared password
    pub password: String,
}

impl ShadowsocksEndpoint {
    /// Whether the endpoint runs over TCP
    #[must_use]
    pub fn is_tcp(&self) -> bool {
        self.protocol.eq_ignore_ascii_case("tcp")
    }
}
