//! Great-circle distance and geographic midpoint.

use relay_catalog::Location;

/// Earth radius used for distances, in kilometres
pub const EARTH_RADIUS_KM: f64 = 6372.8;

/// A point on the globe in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&Location> for GeoCoordinate {
    fn from(location: &Location) -> Self {
        Self::new(location.latitude, location.longitude)
    }
}

/// Haversine distance between two points, in kilometres
#[must_use]
pub fn haversine_distance(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Geographic midpoint of a set of points.
///
/// Averages the points as unit vectors and projects the mean back onto the
/// sphere. Returns `None` for an empty input.
#[must_use]
pub fn midpoint(points: &[GeoCoordinate]) -> Option<GeoCoordinate> {
    if points.is_empty() {
        return None;
    }

    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for point in points {
        let lat = point.latitude.to_radians();
        let lon = point.longitude.to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }

    let n = points.len() as f64;
    let (x, y, z) = (x / n, y / n, z / n);

    let longitude = y.atan2(x);
    let latitude = z.atan2(x.hypot(y));

    Some(GeoCoordinate::new(latitude.to_degrees(), longitude.to_degrees()))
}
