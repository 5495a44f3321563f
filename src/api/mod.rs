//! REST API endpoints.
//!
//! Axum-based HTTP API serving war reports, per-war analytics and
//! cross-war comparisons to the dashboard.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::models::WarScope;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Parse an optional `scope` query value. Absent means full wars only.
pub fn parse_scope(raw: Option<&str>) -> Result<WarScope, ApiError> {
    match raw {
        None => Ok(WarScope::default()),
        Some(s) => s.parse().map_err(ApiError::BadRequest),
    }
}

/// Serialize a response that borrows from the repository while the read
/// lock is held.
pub fn to_json<T: Serialize>(value: &T) -> Result<Json<serde_json::Value>, ApiError> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origin.trim() == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin.trim()) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
            layer
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/wars", get(routes::wars::list_wars))
        .route("/api/wars/:file", get(routes::wars::war_summary))
        .route("/api/wars/:file/groups", get(routes::wars::war_groups))
        .route("/api/wars/:file/analytics", get(routes::wars::war_analytics))
        .route(
            "/api/wars/:file/group-comparison",
            get(routes::wars::war_group_comparison),
        )
        .route(
            "/api/wars/:file/classes/:build",
            get(routes::wars::war_class_comparison),
        )
        .route("/api/overview", get(routes::overview::company_overview))
        .route("/api/players/:name", get(routes::overview::player_profile))
        .route("/api/synergy", get(routes::synergy::baseline_group))
        .route("/api/synergy/pair", get(routes::synergy::pair))
        .route("/api/reload", post(routes::reload::reload));

    if let Some(dir) = &state.config.server.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(cors_layer(&state.config.server.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
