//! HTTP error envelope and response types.

use crate::analysis::{AnalysisFeature, ValidationIssue};
use crate::provider::ProviderError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Error envelope: `{"error": {"code", "message", "details"}}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default = "empty_details")]
    pub details: Value,
}

fn empty_details() -> Value {
    json!({})
}

impl ApiError {
    fn new(code: &str, message: impl Into<String>, details: Value) -> Self {
        Self {
            error: ApiErrorBody {
                code: code.to_string(),
                message: message.into(),
                details,
            },
        }
    }

    /// Create a bad request error (400) listing every field issue.
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        Self::new(
            "BAD_REQUEST",
            "Invalid request body",
            json!({ "issues": issues }),
        )
    }

    /// Create a feature disabled error (403).
    pub fn feature_disabled(feature: AnalysisFeature) -> Self {
        Self::new(
            "FEATURE_DISABLED",
            format!("{} analysis is disabled", feature),
            empty_details(),
        )
    }

    /// Create a route not found error (404).
    pub fn not_found(path: &str) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Route {} not found", path),
            empty_details(),
        )
    }

    pub fn code(&self) -> &str {
        &self.error.code
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.error.code.as_str() {
            "BAD_REQUEST" => StatusCode::BAD_REQUEST,
            "FEATURE_DISABLED" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "PROVIDER_ERROR" | "PROVIDER_RESPONSE_EMPTY" | "PROVIDER_PARSE_ERROR" => {
                StatusCode::BAD_GATEWAY
            }
            "PROVIDER_TIMEOUT" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Map a provider failure onto the envelope.
    ///
    /// Upstream response bodies stay out of `message`; with `expose_upstream`
    /// they are attached as `details.upstreamMessage`.
    pub fn from_provider(err: ProviderError, expose_upstream: bool) -> Self {
        let code = match &err {
            ProviderError::Timeout(_) => "PROVIDER_TIMEOUT",
            ProviderError::EmptyResponse => "PROVIDER_RESPONSE_EMPTY",
            ProviderError::InvalidResponse(_) => "PROVIDER_PARSE_ERROR",
            ProviderError::Network(_)
            | ProviderError::Upstream { .. }
            | ProviderError::Configuration(_)
            | ProviderError::Internal(_) => "PROVIDER_ERROR",
        };
        match err {
            ProviderError::Upstream { status, message } => {
                let details = if expose_upstream {
                    json!({ "upstreamStatus": status, "upstreamMessage": message })
                } else {
                    json!({ "upstreamStatus": status })
                };
                Self::new(
                    code,
                    format!("Provider request failed with status {}", status),
                    details,
                )
            }
            other => Self::new(code, other.to_string(), empty_details()),
        }
    }

    /// Create a timeout error (504) for a request that hit the server deadline.
    pub fn request_timeout(timeout: Duration) -> Self {
        Self::new(
            "PROVIDER_TIMEOUT",
            format!("Request timed out after {}s", timeout.as_secs()),
            empty_details(),
        )
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        Self::from_provider(err, false)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(vec![ValidationIssue {
            path: String::new(),
            message: rejection.body_text(),
        }])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = %self.error.code, message = %self.error.message, "Request failed");
        } else {
            tracing::warn!(code = %self.error.code, message = %self.error.message, "API error");
        }
        (status, Json(self)).into_response()
    }
}

/// Response for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    /// Seconds since startup
    pub uptime: f64,
}

/// Response for `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}
