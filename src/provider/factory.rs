//! Provider factory for creating `AnalysisProvider` trait objects from configuration.

use super::{AnalysisProvider, OpenAiProvider, ProviderError};
use crate::config::{ProviderConfig, ProviderKind};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Create the analysis provider described by `config`.
///
/// The API key is taken from `api_key` when set, otherwise from the
/// environment variable named by `api_key_env`.
///
/// # Errors
///
/// Returns [`ProviderError::Configuration`] when no API key can be found.
/// This is a startup failure; the server must not come up without credentials.
///
/// # Examples
///
/// ```
/// use nordicsense::config::ProviderConfig;
/// use nordicsense::provider::create_provider;
/// use reqwest::Client;
///
/// let config = ProviderConfig {
///     api_key: Some("sk-test".to_string()),
///     ..ProviderConfig::default()
/// };
/// let provider = create_provider(&config, Client::new()).unwrap();
/// assert_eq!(provider.name(), "openai");
/// ```
pub fn create_provider(
    config: &ProviderConfig,
    client: Client,
) -> Result<Arc<dyn AnalysisProvider>, ProviderError> {
    match config.kind {
        ProviderKind::OpenAi => {
            let api_key = resolve_api_key(config)?;
            let provider = OpenAiProvider::new(config.base_url.clone(), api_key, client)
                .with_model(config.model.clone())
                .with_temperature(config.temperature)
                .with_timeout(Duration::from_secs(config.timeout_seconds));
            Ok(Arc::new(provider))
        }
    }
}

fn resolve_api_key(config: &ProviderConfig) -> Result<String, ProviderError> {
    if let Some(key) = config.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Ok(key.clone());
    }

    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.is_empty() => Ok(key),
        Ok(_) => Err(ProviderError::Configuration(format!(
            "Environment variable '{}' is empty",
            config.api_key_env
        ))),
        Err(e) => Err(ProviderError::Configuration(format!(
            "Failed to read API key from env var '{}': {}",
            config.api_key_env, e
        ))),
    }
}
