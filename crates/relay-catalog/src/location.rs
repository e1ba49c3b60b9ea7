//! Server locations and location id resolution.

use serde::{Deserialize, Serialize};

/// Location entry as published in the relay list, keyed by location id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerLocation {
    /// Country name (e.g. "Sweden")
    pub country: String,
    /// City name (e.g. "Gothenburg")
    pub city: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl ServerLocation {
    /// Whether latitude and longitude are within their valid ranges
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A relay location with the country and city codes taken from its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Country name
    pub country: String,
    /// Country code (e.g. "se")
    pub country_code: String,
    /// City name
    pub city: String,
    /// City code (e.g. "got")
    pub city_code: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Location {
    /// Combine a location id with its catalog entry.
    ///
    /// Returns `None` when the id has no country or city component.
    #[must_use]
    pub fn resolve(location_id: &str, server_location: &ServerLocation) -> Option<Self> {
        let (country_code, city_code) = split_location_id(location_id)?;

        Some(Self {
            country: server_location.country.clone(),
            country_code: country_code.to_string(),
            city: server_location.city.clone(),
            city_code: city_code.to_string(),
            latitude: server_location.latitude,
            longitude: server_location.longitude,
        })
    }
}

/// Split a location id such as `"se-got"` into `("se", "got")`.
///
/// Components after the city code are ignored. Empty components are rejected.
#[must_use]
pub fn split_location_id(location_id: &str) -> Option<(&str, &str)> {
    let mut parts = location_id.split('-').filter(|part| !part.is_empty());
    let country_code = parts.next()?;
    let city_code = parts.next()?;
    Some((country_code, city_code))
}
