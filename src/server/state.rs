//! Server shared state
//!
//! Holds the single state tree behind the app server: catalog cache,
//! center selection, and the in-progress draft, each behind its own lock.

use crate::api::ApiClient;
use crate::catalog::CatalogCache;
use crate::centers::CenterSelection;
use crate::config::Config;
use crate::error::Result;
use crate::request::RepairDraft;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared state for the app server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    /// Client for the repair backend
    pub api: ApiClient,

    /// Catalog data and form selection
    pub catalog: RwLock<CatalogCache>,

    /// Loaded centers and the shared selection
    pub centers: RwLock<CenterSelection>,

    /// Contact fields of the in-progress draft
    pub draft: RwLock<RepairDraft>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::with_timeout(&config.backend.base_url, config.backend.timeout_secs)?;
        let urgency = config.default_urgency();

        let mut catalog = CatalogCache::new();
        catalog.set_urgency(urgency);

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            api,
            catalog: RwLock::new(catalog),
            centers: RwLock::new(CenterSelection::new()),
            draft: RwLock::new(RepairDraft::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::UrgencyLevel;

    #[tokio::test]
    async fn test_state_picks_up_configured_urgency() {
        let mut config = Config::default();
        config.defaults.urgency = "urgent".to_string();

        let state = AppState::new(config).unwrap();
        assert_eq!(state.catalog.read().await.urgency(), UrgencyLevel::Urgent);
    }
}
