//! Health check endpoint handler.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::state::HealthState;

/// Handler for the health check endpoint.
///
/// Reports the gateway each log kind runs on. The check does not reach
/// the search engine.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler(State(state): State<HealthState>) -> (StatusCode, Json<Value>) {
    debug!("Processing health check request");

    let body = serde_json::json!({
        "status": "healthy",
        "backend": state.backend_name,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(body))
}
