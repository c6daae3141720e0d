//! Error types for provider operations.

use thiserror::Error;

/// Errors that can occur while calling the analysis provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Provider returned an error response (4xx, 5xx).
    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider answered without any content.
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// Response could not be parsed or violates the expected schema.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider configuration error (missing credentials, bad URL).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The analysis task panicked or was aborted.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Short machine-readable kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Upstream { .. } => "upstream",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::Configuration(_) => "configuration",
            ProviderError::Internal(_) => "internal",
        }
    }
}
