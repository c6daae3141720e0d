//! Service info and health endpoints.

use crate::api::{AppState, HealthResponse, ServiceInfo};
use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

pub const SERVICE_NAME: &str = "NordicSense API";

/// GET / - Service name, version and uptime.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs_f64(),
    })
}

/// GET /api/health - Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
