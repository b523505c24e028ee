//! HTTP client for the repair backend
//!
//! Thin typed wrapper over the backend's REST endpoints. The base URL is
//! injectable so tests can point the client at a mock server. All list
//! endpoints go through [`ListEnvelope`] normalization, and malformed rows
//! (unparseable prices, impossible coordinates) are dropped per row rather
//! than failing the fetch.

pub mod types;

use crate::error::{Error, Result};
use crate::pricing::PriceRange;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

pub use types::{
    Brand, CreatedRepair, DeviceModel, Issue, ListEnvelope, ModelPriceRow, NewRepairRequest,
    RepairStatus, ServiceCenter, ServiceCenterRow, SupportAck, SupportMessage,
};

const USER_AGENT: &str = "repairhub/0.1.0";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Typed client for the repair backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List all brands
    pub async fn brands(&self) -> Result<Vec<Brand>> {
        self.get_list("/brands/").await
    }

    /// List models of a brand, optionally filtered by a search string
    pub async fn models(&self, brand: i64, query: Option<&str>) -> Result<Vec<DeviceModel>> {
        let path = match query {
            Some(q) if !q.is_empty() => {
                format!("/models/?brand={}&q={}", brand, urlencoding::encode(q))
            }
            _ => format!("/models/?brand={}", brand),
        };
        self.get_list(&path).await
    }

    /// List all known issue kinds
    pub async fn issues(&self) -> Result<Vec<Issue>> {
        self.get_list("/issues/").await
    }

    /// Fetch the price table for a model, keyed by issue code
    ///
    /// Rows that fail numeric coercion or violate the price-range invariant
    /// are dropped with a warning.
    pub async fn model_prices(&self, model: i64) -> Result<HashMap<String, PriceRange>> {
        let rows: Vec<ModelPriceRow> = self
            .get_list(&format!("/model-prices/?model={}", model))
            .await?;

        let mut prices = HashMap::new();
        for row in rows {
            match row.normalize() {
                Some((code, range)) => {
                    prices.insert(code, range);
                }
                None => {
                    warn!("Dropping malformed price row id={} for model {}", row.id, model);
                }
            }
        }
        Ok(prices)
    }

    /// List all service centers, dropping rows with impossible coordinates
    pub async fn service_centers(&self) -> Result<Vec<ServiceCenter>> {
        let rows: Vec<ServiceCenterRow> = self.get_list("/servicecenters/").await?;

        let mut centers = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id;
            match row.normalize() {
                Some(center) => centers.push(center),
                None => warn!("Dropping service center id={} with out-of-range coordinates", id),
            }
        }
        Ok(centers)
    }

    /// Create a repair request; returns the backend-assigned request
    pub async fn create_repair(&self, payload: &NewRepairRequest) -> Result<CreatedRepair> {
        self.post("/repairs/", payload).await
    }

    /// Fetch the current status of a repair request
    pub async fn repair_status(&self, id: i64) -> Result<RepairStatus> {
        let response = self
            .client
            .get(format!("{}/repairs/{}/", self.base_url, id))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Send a support message attached to a repair request
    pub async fn send_support_message(&self, repair_request: i64, text: &str) -> Result<SupportAck> {
        let payload = SupportMessage {
            repair_request,
            text: text.to_string(),
        };
        self.post("/support-messages/", &payload).await
    }

    /// GET a list endpoint, accepting either a bare array or an envelope
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        let envelope: ListEnvelope<T> = Self::parse_response(response).await?;
        Ok(envelope.into_vec())
    }

    /// POST a JSON body and parse the JSON response
    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Turn a response into a typed value, or a backend error carried verbatim
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(Self::extract_message(status, &body)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(Error::Json)
    }

    /// Pull a human-readable message out of an error body
    ///
    /// The backend usually wraps messages as {"detail": "..."}; fall back to
    /// the raw body, then to the status line when the body is empty.
    fn extract_message(status: reqwest::StatusCode, body: &str) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
                return detail.to_string();
            }
        }

        if body.trim().is_empty() {
            format!("Backend returned status {}", status)
        } else {
            body.trim().to_string()
        }
    }
}
