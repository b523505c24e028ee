//! Client-side catalog cache
//!
//! Owns the fetched brand/model/issue/price data and the user's current
//! selection. Updates go through explicit mutating methods on the owned
//! state value; there are no ambient globals.
//!
//! Fetches for a resource can be superseded: selecting a different brand
//! while a model list is still in flight must not let the stale response
//! overwrite the newer state. Each dependent resource carries a
//! [`Generation`]; a fetch takes a token when it is issued and its result
//! is applied only while that token is still current.

use crate::api::{Brand, DeviceModel, Issue};
use crate::pricing::{self, Estimate, PriceRange, UrgencyLevel};
use std::collections::HashMap;
use tracing::debug;

/// Monotonic counter guarding a fetchable resource against out-of-order
/// async responses
#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

/// Token captured when a fetch is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

impl Generation {
    /// Start a new fetch, superseding any still in flight
    pub fn begin(&mut self) -> FetchToken {
        self.current += 1;
        FetchToken(self.current)
    }

    /// Invalidate all outstanding tokens without starting a fetch
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, token: FetchToken) -> bool {
        token.0 == self.current
    }
}

/// Cached catalog data plus the current form selection
#[derive(Debug, Default)]
pub struct CatalogCache {
    brands: Vec<Brand>,
    models: Vec<DeviceModel>,
    issues: Vec<Issue>,
    prices: HashMap<String, PriceRange>,

    selected_brand: Option<Brand>,
    selected_model: Option<DeviceModel>,
    selected_issue: Option<Issue>,
    urgency: UrgencyLevel,

    models_gen: Generation,
    prices_gen: Generation,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors

    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn models(&self) -> &[DeviceModel] {
        &self.models
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn prices(&self) -> &HashMap<String, PriceRange> {
        &self.prices
    }

    pub fn selected_brand(&self) -> Option<&Brand> {
        self.selected_brand.as_ref()
    }

    pub fn selected_model(&self) -> Option<&DeviceModel> {
        self.selected_model.as_ref()
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.selected_issue.as_ref()
    }

    pub fn urgency(&self) -> UrgencyLevel {
        self.urgency
    }

    // Fetched-data updates

    pub fn set_brands(&mut self, brands: Vec<Brand>) {
        self.brands = brands;
    }

    pub fn set_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
    }

    /// Issue a model-list fetch; supersedes any model fetch still in flight
    pub fn begin_models_fetch(&mut self) -> FetchToken {
        self.models_gen.begin()
    }

    /// Apply a model-list result if its fetch has not been superseded
    ///
    /// Returns false (and changes nothing) for stale results.
    pub fn apply_models(&mut self, token: FetchToken, models: Vec<DeviceModel>) -> bool {
        if !self.models_gen.is_current(token) {
            debug!("Discarding superseded model list ({} rows)", models.len());
            return false;
        }
        self.models = models;
        true
    }

    /// Issue a price-table fetch; supersedes any price fetch still in flight
    pub fn begin_prices_fetch(&mut self) -> FetchToken {
        self.prices_gen.begin()
    }

    /// Apply a price-table result if its fetch has not been superseded
    pub fn apply_prices(&mut self, token: FetchToken, prices: HashMap<String, PriceRange>) -> bool {
        if !self.prices_gen.is_current(token) {
            debug!("Discarding superseded price table ({} rows)", prices.len());
            return false;
        }
        self.prices = prices;
        true
    }

    // Selection updates with dependency invalidation

    /// Select a brand; clears dependent models, model selection, and prices
    pub fn select_brand(&mut self, brand: Brand) {
        self.selected_brand = Some(brand);
        self.models.clear();
        self.selected_model = None;
        self.clear_prices();
        self.models_gen.invalidate();
    }

    /// Select a model; clears the dependent price table
    pub fn select_model(&mut self, model: DeviceModel) {
        self.selected_model = Some(model);
        self.clear_prices();
    }

    pub fn select_issue(&mut self, issue: Issue) {
        self.selected_issue = Some(issue);
    }

    pub fn set_urgency(&mut self, urgency: UrgencyLevel) {
        self.urgency = urgency;
    }

    fn clear_prices(&mut self) {
        self.prices.clear();
        self.prices_gen.invalidate();
    }

    // Lookup helpers

    pub fn brand_by_id(&self, id: i64) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }

    pub fn model_by_id(&self, id: i64) -> Option<&DeviceModel> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn issue_by_code(&self, code: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.code == code)
    }

    // Derived estimate

    /// The price range for the selected issue, through the three-tier fallback
    pub fn current_range(&self) -> Option<PriceRange> {
        let issue = self.selected_issue.as_ref()?;
        let server = self.prices.get(&issue.code).copied();
        Some(pricing::resolve_range(server, &issue.code))
    }

    /// The current estimate, recomputed from selection + urgency
    ///
    /// `None` only while no issue is selected; once an issue is chosen the
    /// fallback tiers guarantee a defined estimate.
    pub fn estimate(&self) -> Option<Estimate> {
        self.current_range()
            .map(|range| pricing::estimate(&range, self.urgency))
    }
}
