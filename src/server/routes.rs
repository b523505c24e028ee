//! HTTP API routes
//!
//! Defines the app server endpoints backing the ordering front-end. Every
//! handler failure maps to a JSON error response; a panic-catching layer
//! keeps a fault in one handler from taking the process down.

use crate::api::{Brand, DeviceModel, Issue, RepairStatus, SupportAck};
use crate::centers::RankedCenter;
use crate::error::Error;
use crate::geo::locate::Locator;
use crate::geo::Coordinates;
use crate::history::{RequestLog, SubmittedRequest};
use crate::pricing::{Estimate, PriceRange, UrgencyLevel};
use crate::request::{self, RepairDraft};
use crate::server::state::AppState;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/brands", get(brands_handler))
        .route("/api/models", get(models_handler))
        .route("/api/issues", get(issues_handler))
        .route("/api/selection", post(selection_handler))
        .route("/api/estimate", get(estimate_handler))
        .route("/api/centers", get(centers_handler))
        .route("/api/centers/select", post(center_select_handler))
        .route("/api/draft", get(draft_handler).patch(draft_update_handler))
        .route("/api/submit", post(submit_handler))
        .route("/api/requests/:id", get(request_status_handler))
        .route("/api/support", post(support_handler))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "BACKEND_ERROR" => StatusCode::BAD_GATEWAY,
            "NOT_FOUND" | "UNKNOWN_CENTER" => StatusCode::NOT_FOUND,
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::Api(_) | Error::Http(_) => "BACKEND_ERROR",
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::Config(_) => "CONFIG_ERROR",
            Error::DraftIncomplete(_) => "DRAFT_INCOMPLETE",
            Error::UnknownCenter(_) => "UNKNOWN_CENTER",
            Error::NotFound(_) => "NOT_FOUND",
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(err.to_string(), code)
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub backend_url: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let config = state.config.read().await;
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend_url: config.backend.base_url.clone(),
    })
}

/// List brands, refreshing the cache from the backend
///
/// GET /api/brands
async fn brands_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Brand>>, ApiError> {
    let brands = state.api.brands().await.map_err(ApiError::from)?;
    state.catalog.write().await.set_brands(brands.clone());
    Ok(Json(brands))
}

/// Model search query
#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Search models of the selected brand
///
/// GET /api/models?q=<text>
///
/// Each call supersedes any model search still in flight; a stale response
/// never overwrites a newer list.
async fn models_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModelsQuery>,
) -> Result<Json<Vec<DeviceModel>>, ApiError> {
    let (brand_id, token) = {
        let mut catalog = state.catalog.write().await;
        let brand = catalog
            .selected_brand()
            .ok_or_else(|| ApiError::new("No brand selected", "NO_BRAND_SELECTED"))?;
        let brand_id = brand.id;
        (brand_id, catalog.begin_models_fetch())
    };

    let models = state
        .api
        .models(brand_id, query.q.as_deref())
        .await
        .map_err(ApiError::from)?;

    let mut catalog = state.catalog.write().await;
    // When a newer search superseded this one, the current list stands
    catalog.apply_models(token, models);
    Ok(Json(catalog.models().to_vec()))
}

/// List issue kinds, refreshing the cache from the backend
///
/// GET /api/issues
async fn issues_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let issues = state.api.issues().await.map_err(ApiError::from)?;
    state.catalog.write().await.set_issues(issues.clone());
    Ok(Json(issues))
}

/// Selection update request body
///
/// Fields are applied in dependency order: brand first (clears models and
/// prices), then model (clears prices), then issue and urgency.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub brand: Option<i64>,
    pub model: Option<i64>,
    pub issue: Option<String>,
    pub urgency: Option<String>,
}

/// Selection state response
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub brand: Option<Brand>,
    pub model: Option<DeviceModel>,
    pub issue: Option<Issue>,
    pub urgency: UrgencyLevel,
    pub estimate: Option<Estimate>,
}

/// Update the form selection
///
/// POST /api/selection
async fn selection_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    if let Some(brand_id) = req.brand {
        let token = {
            let mut catalog = state.catalog.write().await;
            let brand = catalog
                .brand_by_id(brand_id)
                .cloned()
                .ok_or_else(|| ApiError::new(format!("Unknown brand: {}", brand_id), "NOT_FOUND"))?;
            catalog.select_brand(brand);
            catalog.begin_models_fetch()
        };

        let models = state.api.models(brand_id, None).await.map_err(ApiError::from)?;
        state.catalog.write().await.apply_models(token, models);
    }

    if let Some(model_id) = req.model {
        let token = {
            let mut catalog = state.catalog.write().await;
            let model = catalog
                .model_by_id(model_id)
                .cloned()
                .ok_or_else(|| ApiError::new(format!("Unknown model: {}", model_id), "NOT_FOUND"))?;
            catalog.select_model(model);
            catalog.begin_prices_fetch()
        };

        let prices = state.api.model_prices(model_id).await.map_err(ApiError::from)?;
        state.catalog.write().await.apply_prices(token, prices);
    }

    if let Some(code) = &req.issue {
        let mut catalog = state.catalog.write().await;
        let issue = catalog
            .issue_by_code(code)
            .cloned()
            .ok_or_else(|| ApiError::new(format!("Unknown issue: {}", code), "NOT_FOUND"))?;
        catalog.select_issue(issue);
    }

    if let Some(urgency) = &req.urgency {
        let parsed: UrgencyLevel = urgency
            .parse()
            .map_err(|e: String| ApiError::new(e, "INVALID_URGENCY"))?;
        state.catalog.write().await.set_urgency(parsed);
    }

    let catalog = state.catalog.read().await;
    Ok(Json(SelectionResponse {
        brand: catalog.selected_brand().cloned(),
        model: catalog.selected_model().cloned(),
        issue: catalog.selected_issue().cloned(),
        urgency: catalog.urgency(),
        estimate: catalog.estimate(),
    }))
}

/// Estimate response
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub estimate: Estimate,
    pub range: PriceRange,
    pub urgency: UrgencyLevel,
}

/// Current price/time estimate for the selection
///
/// GET /api/estimate
async fn estimate_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let catalog = state.catalog.read().await;

    let range = catalog
        .current_range()
        .ok_or_else(|| ApiError::new("No issue selected", "NO_ISSUE_SELECTED"))?;

    Ok(Json(EstimateResponse {
        estimate: crate::pricing::estimate(&range, catalog.urgency()),
        range,
        urgency: catalog.urgency(),
    }))
}

/// Centers query: an explicit position, or `here` for IP geolocation
#[derive(Debug, Deserialize)]
pub struct CentersQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub here: bool,
}

/// Centers response, consumed by both the map and the list views
#[derive(Debug, Serialize)]
pub struct CentersResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_pos: Option<Coordinates>,
    pub centers: Vec<RankedCenter>,
}

/// Load and rank service centers
///
/// GET /api/centers
///
/// Without a position (none given, geolocation timed out or was refused)
/// the centers come back in backend order; that is the documented degraded
/// mode, not an error.
async fn centers_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CentersQuery>,
) -> Result<Json<CentersResponse>, ApiError> {
    let centers = state.api.service_centers().await.map_err(ApiError::from)?;

    let user_pos = if let (Some(lat), Some(lng)) = (query.lat, query.lng) {
        let pos = Coordinates::new(lat, lng);
        pos.validate().map_err(ApiError::from)?;
        Some(pos)
    } else if query.here {
        let timeout = state.config.read().await.location.timeout_secs;
        Locator::new()
            .with_timeout(Duration::from_secs(timeout))
            .position()
            .await
    } else {
        state.centers.read().await.user_pos()
    };

    let mut selection = state.centers.write().await;
    selection.load(centers);
    selection.set_user_pos(user_pos);

    Ok(Json(CentersResponse {
        user_pos,
        centers: selection.ranked(),
    }))
}

/// Center select request body
#[derive(Debug, Deserialize)]
pub struct CenterSelectRequest {
    pub id: i64,
}

/// Select a service center
///
/// POST /api/centers/select
async fn center_select_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CenterSelectRequest>,
) -> Result<Json<CentersResponse>, ApiError> {
    let mut selection = state.centers.write().await;
    selection.select(req.id).map_err(ApiError::from)?;

    Ok(Json(CentersResponse {
        user_pos: selection.user_pos(),
        centers: selection.ranked(),
    }))
}

/// Draft state response
#[derive(Debug, Serialize, Deserialize)]
pub struct DraftResponse {
    pub draft: RepairDraft,
    pub missing: Vec<String>,
    pub submittable: bool,
}

/// Assemble the full draft from the current state tree
async fn assemble_draft(state: &AppState) -> RepairDraft {
    let catalog = state.catalog.read().await;
    let centers = state.centers.read().await;
    let mut draft = state.draft.read().await.clone();

    draft.brand_name = catalog.selected_brand().map(|b| b.name.clone());
    draft.model_name = catalog.selected_model().map(|m| m.name.clone());
    draft.issue_code = catalog.selected_issue().map(|i| i.code.clone());
    draft.urgency = catalog.urgency();
    draft.center_id = centers.selected_id();

    draft
}

/// Current draft and its unmet preconditions
///
/// GET /api/draft
async fn draft_handler(State(state): State<Arc<AppState>>) -> Json<DraftResponse> {
    let draft = assemble_draft(&state).await;
    let missing: Vec<String> = draft.validate().iter().map(|s| s.to_string()).collect();
    let submittable = missing.is_empty();

    Json(DraftResponse {
        draft,
        missing,
        submittable,
    })
}

/// Draft contact-field update body
#[derive(Debug, Deserialize)]
pub struct DraftUpdateRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub description: Option<String>,
    pub agreed_to_offer: Option<bool>,
}

/// Update the draft contact fields
///
/// PATCH /api/draft
async fn draft_update_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DraftUpdateRequest>,
) -> Json<DraftResponse> {
    {
        let mut draft = state.draft.write().await;
        if let Some(name) = req.customer_name {
            draft.customer_name = name;
        }
        if let Some(phone) = req.customer_phone {
            draft.customer_phone = phone;
        }
        if let Some(description) = req.description {
            draft.description = description;
        }
        if let Some(agreed) = req.agreed_to_offer {
            draft.agreed_to_offer = agreed;
        }
    }

    draft_handler(State(state)).await
}

/// Submit response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: i64,
}

/// Submit the assembled draft
///
/// POST /api/submit
async fn submit_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let mut draft = assemble_draft(&state).await;
    let center_name = {
        let centers = state.centers.read().await;
        centers.selected().map(|c| c.name.clone())
    };

    let id = request::submit(&state.api, &mut draft)
        .await
        .map_err(ApiError::from)?;

    // The submission went through: reset the stored contact fields too
    state.draft.write().await.clear_transient();

    // Best-effort local log; a write failure must not fail the submission
    match RequestLog::load() {
        Ok(mut log) => {
            let mut entry = SubmittedRequest::new(
                id,
                draft.brand_name.clone().unwrap_or_default(),
                draft.model_name.clone().unwrap_or_default(),
            );
            if let Some(code) = &draft.issue_code {
                entry = entry.with_issue(code.clone());
            }
            if let Some(name) = center_name {
                entry = entry.with_center(name);
            }
            log.add(entry);
            if let Err(e) = log.save() {
                warn!("Failed to save request log: {}", e);
            }
        }
        Err(e) => warn!("Failed to load request log: {}", e),
    }

    Ok(Json(SubmitResponse { id }))
}

/// Fetch the status of a repair request from the backend
///
/// GET /api/requests/:id
async fn request_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<RepairStatus>, ApiError> {
    let status = state.api.repair_status(id).await.map_err(ApiError::from)?;

    if let Ok(mut log) = RequestLog::load() {
        if log.update_status(id, &status.status) {
            let _ = log.save();
        }
    }

    Ok(Json(status))
}

/// Support message body
#[derive(Debug, Deserialize)]
pub struct SupportRequest {
    pub repair_request: i64,
    pub text: String,
}

/// Send a support message attached to a repair request
///
/// POST /api/support
async fn support_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SupportRequest>,
) -> Result<Json<SupportAck>, ApiError> {
    let ack = state
        .api
        .send_support_message(req.repair_request, &req.text)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(ack))
}
