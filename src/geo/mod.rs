//! Geographic primitives
//!
//! This module handles:
//! - The `Coordinates` value type and range validation
//! - Great-circle distance between two points (haversine)
//! - One-shot user geolocation with graceful degradation

pub mod locate;

use crate::constants::geo::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Check ranges without constructing an error, for defensive row filtering
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance between two points in kilometers
///
/// Haversine formula with mean Earth radius 6371 km. Uses the atan2
/// formulation rather than asin so floating-point overshoot near
/// antipodal points cannot leave the arc-function domain.
///
/// Symmetric, and zero when both points coincide.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat * PI / 180.0;
    let lat2 = b.lat * PI / 180.0;
    let delta_lat = (b.lat - a.lat) * PI / 180.0;
    let delta_lng = (b.lng - a.lng) * PI / 180.0;

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = Coordinates::new(45.043, 41.97);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Coordinates::new(55.7558, 37.6173);
        let b = Coordinates::new(59.9343, 30.3351);
        assert_relative_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 1.0);
        let d = distance_km(a, b);
        assert!(
            (d - 111.19).abs() < 0.5,
            "Distance {} should be approximately 111.19 km",
            d
        );
    }

    #[test]
    fn test_antipodal_points_stay_in_domain() {
        // asin-based haversine can hit NaN here when the argument
        // overshoots 1.0; the atan2 form must not
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        // Half the Earth's circumference
        assert!((d - PI * EARTH_RADIUS_KM).abs() < 1.0);
    }

    #[test]
    fn test_tiny_separation_is_near_zero() {
        let a = Coordinates::new(45.0, 45.0);
        let b = Coordinates::new(45.0, 45.0 + 1e-9);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        assert!(d >= 0.0);
        assert!(d < 0.001);
    }

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(Coordinates::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinates::new(-90.0, -180.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(Coordinates::new(90.5, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_in_range() {
        assert!(Coordinates::new(45.0, 41.0).in_range());
        assert!(!Coordinates::new(91.0, 0.0).in_range());
        assert!(!Coordinates::new(0.0, 200.0).in_range());
    }
}
