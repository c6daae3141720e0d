//! # HTTP API
//!
//! JSON endpoints for the NordicSense text analysis service.
//!
//! ## Endpoints
//!
//! - `GET /` - Service name, version and uptime
//! - `GET /api/health` - Liveness probe
//! - `POST /api/analyze/{full,batch,sentiment,topics,keywords,summary,toxicity,entities}`
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Example
//!
//! ```no_run
//! use nordicsense::api::{create_router, AppState};
//! use nordicsense::config::NordicConfig;
//! use nordicsense::provider::create_provider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(NordicConfig::default());
//! let provider = create_provider(&config.provider, reqwest::Client::new())?;
//! let state = Arc::new(AppState::new(config, provider));
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All errors share one envelope:
//! ```json
//! {
//!   "error": {
//!     "code": "BAD_REQUEST",
//!     "message": "Invalid request body",
//!     "details": { "issues": [{ "path": "text", "message": "Text is required" }] }
//!   }
//! }
//! ```

mod analyze;
mod health;
pub mod types;

pub use types::*;

use crate::analysis::{ResultCache, TextAnalysisService};
use crate::config::NordicConfig;
use crate::metrics::PrometheusHandle;
use crate::provider::AnalysisProvider;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, Uri},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<NordicConfig>,
    pub service: Arc<TextAnalysisService>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Prometheus handle for rendering metrics
    pub prometheus_handle: PrometheusHandle,
}

impl AppState {
    /// Create application state around the given provider.
    pub fn new(config: Arc<NordicConfig>, provider: Arc<dyn AnalysisProvider>) -> Self {
        let cache = Arc::new(ResultCache::from_config(&config.cache));
        let service = Arc::new(TextAnalysisService::new(
            provider,
            cache,
            config.analysis.clone(),
        ));

        Self {
            config,
            service,
            start_time: Instant::now(),
            prometheus_handle: crate::metrics::metrics_handle(),
        }
    }
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;
    let cors = cors_layer(&server.cors_origin);
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let body_limit = server.max_body_bytes;

    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health))
        .route("/api/analyze/full", post(analyze::full))
        .route("/api/analyze/batch", post(analyze::batch))
        .route("/api/analyze/sentiment", post(analyze::sentiment))
        .route("/api/analyze/topics", post(analyze::topics))
        .route("/api/analyze/keywords", post(analyze::keywords))
        .route("/api/analyze/summary", post(analyze::summary))
        .route("/api/analyze/toxicity", post(analyze::toxicity))
        .route("/api/analyze/entities", post(analyze::entities))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(from_fn_with_state(timeout, request_deadline))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| crate::logging::request_span(request)),
        )
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::from(Any)
    } else {
        match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS origin, allowing any");
                AllowOrigin::from(Any)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Answer with the error envelope once a request outlives the server deadline.
///
/// Only the response is abandoned; a full analysis already running keeps
/// going and still fills the cache.
async fn request_deadline(
    State(timeout): State<Duration>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::request_timeout(timeout).into_response(),
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}
