//! Structured logging helpers
//!
//! Filter directive construction for the tracing subscriber and per-request
//! span creation for the HTTP layer.

pub mod middleware;

pub use middleware::{generate_request_id, request_span};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
/// Components are emitted in name order.
///
/// # Examples
///
/// ```
/// use nordicsense::config::logging::{LogFormat, LoggingConfig};
/// use nordicsense::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("analysis".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
/// };
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,nordicsense::analysis=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",nordicsense::{}={}", component, level));
        }
    }

    filter_str
}
