//! User position acquisition
//!
//! Uses ip-api.com for IP geolocation with file-based caching. Position is
//! a best-effort input to center ranking: acquisition is one-shot and
//! timeout-bounded, and every failure mode degrades to "no position".

use crate::constants::api::IP_API_URL;
use crate::constants::location::{POSITION_CACHE_FILE, POSITION_TIMEOUT_SECS, POSITION_TTL_SECS};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// IP geolocation service with caching
#[derive(Debug)]
pub struct Locator {
    client: reqwest::Client,
    cache_path: Option<PathBuf>,
    timeout: Duration,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Cached position data
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPosition {
    position: Coordinates,
    timestamp: u64,
}

impl Locator {
    /// Create a new locator with the default cache path and timeout
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir().map(|p| p.join("repairhub").join(POSITION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            cache_path,
            timeout: Duration::from_secs(POSITION_TIMEOUT_SECS),
        }
    }

    /// Create a locator with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: Some(cache_path),
            timeout: Duration::from_secs(POSITION_TIMEOUT_SECS),
        }
    }

    /// Create a locator without caching
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: None,
            timeout: Duration::from_secs(POSITION_TIMEOUT_SECS),
        }
    }

    /// Override the acquisition timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Acquire the user's position, or `None` in any degraded case
    ///
    /// Degraded cases (timeout, network failure, lookup refusal, malformed
    /// response) are logged at debug and are not errors: center ranking
    /// falls back to backend order without a position.
    pub async fn position(&self) -> Option<Coordinates> {
        if let Some(cached) = self.load_cache() {
            return Some(cached);
        }

        match tokio::time::timeout(self.timeout, self.fetch_position()).await {
            Ok(Ok(position)) => {
                self.save_cache(&position);
                Some(position)
            }
            Ok(Err(e)) => {
                debug!("Position lookup failed: {}", e);
                None
            }
            Err(_) => {
                debug!("Position lookup timed out after {:?}", self.timeout);
                None
            }
        }
    }

    /// Fetch position from ip-api.com
    async fn fetch_position(&self) -> Result<Coordinates> {
        let response = self
            .client
            .get(IP_API_URL)
            .send()
            .await
            .map_err(|e| Error::Api(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Api(format!("Failed to parse IP location response: {}", e)))?;

        if data.status != "success" {
            return Err(Error::Api("IP location lookup refused".to_string()));
        }

        let (lat, lng) = data
            .lat
            .zip(data.lon)
            .ok_or_else(|| Error::Api("No coordinates in IP location response".to_string()))?;

        let position = Coordinates::new(lat, lng);
        position.validate()?;
        Ok(position)
    }

    /// Load cached position if still valid
    fn load_cache(&self) -> Option<Coordinates> {
        let cache_path = self.cache_path.as_ref()?;

        if !cache_path.exists() {
            return None;
        }

        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedPosition = serde_json::from_str(&content).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        if now - cached.timestamp < POSITION_TTL_SECS {
            Some(cached.position)
        } else {
            None
        }
    }

    /// Save position to cache
    fn save_cache(&self, position: &Coordinates) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let cached = CachedPosition {
            position: *position,
            timestamp,
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locator_creation() {
        let locator = Locator::new();
        assert!(locator.cache_path.is_some());
        assert_eq!(locator.timeout.as_secs(), POSITION_TIMEOUT_SECS);
    }

    #[test]
    fn test_locator_without_cache() {
        let locator = Locator::without_cache();
        assert!(locator.cache_path.is_none());
    }

    #[test]
    fn test_cache_operations() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("test_cache.json");
        let locator = Locator::with_cache_path(cache_path.clone());

        // Initially no cache
        assert!(locator.load_cache().is_none());

        let position = Coordinates::new(45.043, 41.97);
        locator.save_cache(&position);

        let loaded = locator.load_cache().unwrap();
        assert_eq!(loaded.lat, 45.043);
        assert_eq!(loaded.lng, 41.97);

        locator.clear_cache();
        assert!(locator.load_cache().is_none());
    }

    #[test]
    fn test_expired_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let cache_path = temp_dir.path().join("stale_cache.json");

        let stale = CachedPosition {
            position: Coordinates::new(0.0, 0.0),
            timestamp: 0,
        };
        fs::write(&cache_path, serde_json::to_string(&stale).unwrap()).unwrap();

        let locator = Locator::with_cache_path(cache_path);
        assert!(locator.load_cache().is_none());
    }

    #[tokio::test]
    async fn test_position_degrades_to_none_on_timeout() {
        // Zero timeout forces the degraded path without network traffic
        let locator = Locator::without_cache().with_timeout(Duration::from_millis(0));
        assert!(locator.position().await.is_none());
    }

    #[test]
    fn test_cached_position_serialization() {
        let cached = CachedPosition {
            position: Coordinates::new(45.043, 41.97),
            timestamp: 1704200000,
        };

        let json = serde_json::to_string(&cached).unwrap();
        let parsed: CachedPosition = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.position.lat, 45.043);
        assert_eq!(parsed.timestamp, 1704200000);
    }
}
