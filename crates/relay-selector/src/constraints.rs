//! User constraints narrowing which relays may be selected.

use relay_catalog::{Location, RelayEntry};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseConstraintError;

/// Either no restriction or exactly one accepted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint<T> {
    /// Anything is accepted
    Any,
    /// Only this value is accepted
    Only(T),
}

impl<T> Constraint<T> {
    /// Whether the constraint accepts anything
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// The required value, if any
    #[must_use]
    pub const fn option(&self) -> Option<&T> {
        match self {
            Self::Any => None,
            Self::Only(value) => Some(value),
        }
    }

    /// Transform the required value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Constraint<U> {
        match self {
            Self::Any => Constraint::Any,
            Self::Only(value) => Constraint::Only(f(value)),
        }
    }

    /// Whether `predicate` holds for the required value, or `true` for `Any`
    pub fn matches_with<F: FnOnce(&T) -> bool>(&self, predicate: F) -> bool {
        match self {
            Self::Any => true,
            Self::Only(value) => predicate(value),
        }
    }
}

impl<T: PartialEq> Constraint<T> {
    /// Whether `value` satisfies the constraint
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        self.matches_with(|required| required == value)
    }
}

impl<T> Default for Constraint<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T> From<Option<T>> for Constraint<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Any, Self::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Constraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for Constraint<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            Ok(Self::Any)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// A location at country, city or hostname granularity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelayLocation {
    /// All relays in a country
    Country(String),
    /// All relays in a city: (country code, city code)
    City(String, String),
    /// One relay: (country code, city code, hostname)
    Hostname(String, String, String),
}

impl RelayLocation {
    /// Country constraint
    pub fn country(country: impl Into<String>) -> Self {
        Self::Country(country.into())
    }

    /// City constraint
    pub fn city(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self::City(country.into(), city.into())
    }

    /// Hostname constraint
    pub fn hostname(
        country: impl Into<String>,
        city: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self::Hostname(country.into(), city.into(), hostname.into())
    }

    /// Country code of the location
    #[must_use]
    pub fn country_code(&self) -> &str {
        match self {
            Self::Country(country) | Self::City(country, _) | Self::Hostname(country, _, _) => {
                country
            }
        }
    }

    /// Whether a relay at `location` satisfies this location.
    ///
    /// Country constraints only pick relays flagged `include_in_country`.
    pub fn matches<T: RelayEntry + ?Sized>(&self, relay: &T, location: &Location) -> bool {
        match self {
            Self::Country(country) => {
                location.country_code == *country && relay.include_in_country()
            }
            Self::City(country, city) => {
                location.country_code == *country && location.city_code == *city
            }
            Self::Hostname(country, city, hostname) => {
                location.country_code == *country
                    && location.city_code == *city
                    && relay.hostname() == hostname
            }
        }
    }
}

impl fmt::Display for RelayLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country(country) => write!(f, "{country}"),
            Self::City(country, city) => write!(f, "{country}-{city}"),
            Self::Hostname(country, city, hostname) => write!(f, "{country}-{city}-{hostname}"),
        }
    }
}

impl FromStr for RelayLocation {
    type Err = ParseConstraintError;

    /// Parse `se`, `se-got` or `se-got-se6-wireguard` (hostnames may contain `-`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseConstraintError::InvalidLocation(s.to_string());
        let parts: Vec<&str> = s.trim().splitn(3, '-').collect();

        if parts.iter().any(|part| part.is_empty()) {
            return Err(invalid());
        }

        match parts.as_slice() {
            [country] => Ok(Self::country(*country)),
            [country, city] => Ok(Self::city(*country, *city)),
            [country, city, hostname] => Ok(Self::hostname(*country, *city, *hostname)),
            _ => Err(invalid()),
        }
    }
}

/// Relay hardware ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Servers owned by the VPN operator
    MullvadOwned,
    /// Rented servers
    Rented,
}

impl Ownership {
    /// Whether a relay with the given `owned` flag has this ownership
    #[must_use]
    pub const fn matches(self, owned: bool) -> bool {
        match self {
            Self::MullvadOwned => owned,
            Self::Rented => !owned,
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MullvadOwned => f.write_str("owned"),
            Self::Rented => f.write_str("rented"),
        }
    }
}

impl FromStr for Ownership {
    type Err = ParseConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owned" | "mullvad-owned" => Ok(Self::MullvadOwned),
            "rented" => Ok(Self::Rented),
            _ => Err(ParseConstraintError::InvalidOwnership(s.to_string())),
        }
    }
}

/// A non-empty set of hosting providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Providers(BTreeSet<String>);

impl Providers {
    /// Build a provider set
    ///
    /// # Errors
    ///
    /// Returns [`ParseConstraintError::NoProviders`] if `providers` is empty.
    pub fn new<I, S>(providers: I) -> Result<Self, ParseConstraintError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = providers.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(ParseConstraintError::NoProviders);
        }
        Ok(Self(set))
    }

    /// Whether `provider` is in the set
    #[must_use]
    pub fn contains(&self, provider: &str) -> bool {
        self.0.contains(provider)
    }

    /// Providers in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

impl FromStr for Providers {
    type Err = ParseConstraintError;

    /// Parse a comma separated provider list
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(
            s.split(',')
                .map(str::trim)
                .filter(|provider| !provider.is_empty()),
        )
    }
}

/// Everything a caller can restrict about the selected relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayConstraints {
    /// Location filter
    pub location: Constraint<RelayLocation>,
    /// Tunnel port; `Only` overrides the port policy
    pub port: Constraint<u16>,
    /// Ownership filter
    pub ownership: Constraint<Ownership>,
    /// Provider filter
    pub providers: Constraint<Providers>,
    /// Require DAITA-capable relays
    pub daita: bool,
}

impl RelayConstraints {
    /// Constraints accepting every active relay
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the location
    #[must_use]
    pub fn with_location(mut self, location: RelayLocation) -> Self {
        self.location = Constraint::Only(location);
        self
    }

    /// Pin the tunnel port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Constraint::Only(port);
        self
    }

    /// Restrict ownership
    #[must_use]
    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Constraint::Only(ownership);
        self
    }

    /// Restrict providers
    #[must_use]
    pub fn with_providers(mut self, providers: Providers) -> Self {
        self.providers = Constraint::Only(providers);
        self
    }

    /// Require DAITA support
    #[must_use]
    pub fn with_daita(mut self, daita: bool) -> Self {
        self.daita = daita;
        self
    }
}

impl fmt::Display for RelayConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "location={} port={} ownership={} providers={} daita={}",
            self.location, self.port, self.ownership, self.providers, self.daita
        )
    }
}
