//! Geographic coordinates and great-circle distance.
//!
//! All coordinates are latitude/longitude in degrees and must share one
//! reference frame across grid and exposure inputs.

use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude, used for coarse window bounds.
pub const KM_PER_DEG: f64 = std::f64::consts::PI * EARTH_RADIUS_KM / 180.0;

/// A geographic point (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance to `other` in kilometers.
    pub fn haversine_km(&self, other: &LatLon) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_for_identical_points() {
        let p = LatLon::new(47.37, 8.55);
        assert_eq!(p.haversine_km(&p), 0.0);
    }

    #[test]
    fn haversine_one_degree_latitude_is_about_111_km() {
        let a = LatLon::new(0.0, 0.0);
        let b = LatLon::new(1.0, 0.0);
        let d = a.haversine_km(&b);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = LatLon::new(-12.5, 130.8);
        let b = LatLon::new(35.7, 139.7);
        assert_eq!(a.haversine_km(&b), b.haversine_km(&a));
    }

    #[test]
    fn haversine_longitude_shrinks_toward_poles() {
        let equator = LatLon::new(0.0, 0.0).haversine_km(&LatLon::new(0.0, 1.0));
        let high = LatLon::new(60.0, 0.0).haversine_km(&LatLon::new(60.0, 1.0));
        assert!(high < equator / 1.9, "equator {equator}, 60N {high}");
    }
}
