//! Centralized constants for the repairhub crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers (WGS84 approximation)
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// External API endpoints
pub mod api {
    /// Default base URL of the repair backend (local development server)
    pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Geolocation settings
pub mod location {
    /// Upper bound on a one-shot position acquisition, in seconds
    pub const POSITION_TIMEOUT_SECS: u64 = 5;

    /// Position cache duration in seconds (1 hour)
    pub const POSITION_TTL_SECS: u64 = 3600;

    /// Position cache file name
    pub const POSITION_CACHE_FILE: &str = "position_cache.json";
}

/// Pricing fallbacks
pub mod pricing {
    /// Generic default price range, used when the issue code is unknown
    /// to both the backend and the static fallback table
    pub const DEFAULT_MIN_PRICE: f64 = 9000.0;
    pub const DEFAULT_MAX_PRICE: f64 = 12000.0;
    pub const DEFAULT_HOURS: f64 = 1.0;
}
