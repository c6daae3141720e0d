//! Server configuration

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Transport deadline for a whole request, including provider fan-out
    pub request_timeout_seconds: u64,
    /// Allowed CORS origin; "*" allows any
    pub cors_origin: String,
    /// Maximum accepted request body size
    pub max_body_bytes: usize,
    /// Include upstream provider error bodies in error details
    pub expose_upstream_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            request_timeout_seconds: 120,
            cors_origin: "*".to_string(),
            max_body_bytes: 1024 * 1024,
            expose_upstream_errors: false,
        }
    }
}
