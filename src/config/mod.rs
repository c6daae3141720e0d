//! Configuration module for NordicSense
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`NORDICSENSE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use nordicsense::config::NordicConfig;
//!
//! let config = NordicConfig::default();
//! assert_eq!(config.server.port, 4000);
//!
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: NordicConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```

pub mod analysis;
pub mod cache;
pub mod error;
pub mod logging;
pub mod provider;
pub mod server;

pub use analysis::AnalysisConfig;
pub use cache::CacheConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use provider::{ProviderConfig, ProviderKind};
pub use server::ServerConfig;

use crate::analysis::AnalysisFeature;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the NordicSense server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NordicConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Upstream analysis provider
    pub provider: ProviderConfig,
    /// Limits, defaults and feature switches
    pub analysis: AnalysisConfig,
    /// Full-analysis result cache
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl NordicConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports NORDICSENSE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        // Server settings
        if let Ok(port) = std::env::var("NORDICSENSE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("NORDICSENSE_HOST") {
            self.server.host = host;
        }
        if let Ok(origin) = std::env::var("NORDICSENSE_CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }

        // Logging settings
        if let Ok(level) = std::env::var("NORDICSENSE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("NORDICSENSE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        // Analysis defaults and limits
        if let Ok(length) = std::env::var("NORDICSENSE_DEFAULT_SUMMARY_LENGTH") {
            if let Ok(l) = length.parse() {
                self.analysis.default_summary_length = l;
            }
        }
        if let Ok(language) = std::env::var("NORDICSENSE_DEFAULT_LANGUAGE") {
            if let Ok(l) = language.parse() {
                self.analysis.default_language = l;
            }
        }
        if let Ok(max) = std::env::var("NORDICSENSE_MAX_TEXT_LENGTH") {
            if let Ok(m) = max.parse() {
                self.analysis.max_text_length = m;
            }
        }
        if let Ok(features) = std::env::var("NORDICSENSE_ALLOWED_FEATURES") {
            if let Some(parsed) = parse_feature_list(&features) {
                self.analysis.allowed_features = parsed;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "port must be non-zero",
            ));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::validation(
                "provider.model",
                "model cannot be empty",
            ));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::validation(
                "provider.base_url",
                "URL cannot be empty",
            ));
        }
        if self.analysis.max_text_length == 0 {
            return Err(ConfigError::validation(
                "analysis.max_text_length",
                "must be greater than zero",
            ));
        }
        if self.analysis.batch_concurrency == 0 {
            return Err(ConfigError::validation(
                "analysis.batch_concurrency",
                "must be greater than zero",
            ));
        }
        if self.analysis.max_batch_items == 0 {
            return Err(ConfigError::validation(
                "analysis.max_batch_items",
                "must be greater than zero",
            ));
        }
        if self.cache.max_items == 0 {
            return Err(ConfigError::validation(
                "cache.max_items",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Parse a comma separated feature list. Any unknown entry rejects the whole list.
fn parse_feature_list(raw: &str) -> Option<Vec<AnalysisFeature>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}
