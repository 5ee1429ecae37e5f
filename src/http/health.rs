//! Liveness endpoint.

use axum::{extract::State, http::StatusCode, response::Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::http::response::json_response;
use crate::http::server::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn now(service: &str) -> Self {
        Self {
            status: "ok",
            service: service.to_string(),
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, &HealthStatus::now(&state.service_name))
}
