//! Shared test utilities for NordicSense integration tests.
//!
//! Provides a scripted analysis provider, service and router builders, and
//! request helpers for driving the axum app in-process.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use nordicsense::analysis::*;
use nordicsense::api::{create_router, AppState};
use nordicsense::config::{AnalysisConfig, NordicConfig};
use nordicsense::provider::{AnalysisProvider, ProviderError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::Service;

// =============================================================================
// Well-Known Test Texts
// =============================================================================

/// Swedish review long enough to pass the short-text threshold.
pub const SWEDISH_REVIEW: &str =
    "Leveransen var sen och kundtjänsten svarade aldrig på mina mejl om paketet.";

/// Text carrying one of each PII kind.
pub const PII_TEXT: &str = "Kontakta anna@example.se eller +46 70 123 45 67, \
                            personnummer 19900101-1234, kort 4111 1111 1111 1111.";

// =============================================================================
// Scripted Provider
// =============================================================================

/// Provider stub that counts calls, records what it saw and can be told to fail.
#[derive(Default)]
pub struct ScriptedProvider {
    pub calls: AtomicUsize,
    pub seen_texts: Mutex<Vec<String>>,
    pub seen_languages: Mutex<Vec<Language>>,
    /// Texts containing this marker fail every operation
    pub fail_marker: Option<String>,
    /// Error returned on failure
    pub failure: Option<ProviderError>,
    /// Only this operation fails (others succeed)
    pub failing_operation: Option<&'static str>,
    pub delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str, error: ProviderError) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn failing_operation(operation: &'static str, error: ProviderError) -> Self {
        Self {
            failing_operation: Some(operation),
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.seen_texts.lock().unwrap().clone()
    }

    pub fn languages(&self) -> Vec<Language> {
        self.seen_languages.lock().unwrap().clone()
    }

    async fn enter(
        &self,
        operation: &'static str,
        request: &ResolvedRequest,
    ) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_texts.lock().unwrap().push(request.text.clone());
        self.seen_languages.lock().unwrap().push(request.language);

        if operation == "sentiment" {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if operation == "sentiment" {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        let marker_hit = self
            .fail_marker
            .as_deref()
            .is_some_and(|m| request.text.contains(m));
        let operation_hit = self.failing_operation == Some(operation);
        if marker_hit || operation_hit {
            return Err(self
                .failure
                .clone()
                .unwrap_or(ProviderError::EmptyResponse));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze_sentiment(
        &self,
        request: &ResolvedRequest,
    ) -> Result<SentimentResult, ProviderError> {
        self.enter("sentiment", request).await?;
        Ok(SentimentResult {
            label: SentimentLabel::Negative,
            score: 0.82,
            tones: Some(vec![SentimentTone {
                label: "frustrated".to_string(),
                score: 0.7,
            }]),
        })
    }

    async fn classify_topics(
        &self,
        request: &ResolvedRequest,
    ) -> Result<TopicClassificationResult, ProviderError> {
        self.enter("topics", request).await?;
        Ok(TopicClassificationResult {
            topics: vec![
                TopicScore {
                    label: "delivery".to_string(),
                    score: 0.91,
                },
                TopicScore {
                    label: "support".to_string(),
                    score: 0.74,
                },
            ],
        })
    }

    async fn extract_keywords(
        &self,
        request: &ResolvedRequest,
    ) -> Result<Vec<Keyword>, ProviderError> {
        self.enter("keywords", request).await?;
        Ok(vec![Keyword {
            text: "kundtjänsten".to_string(),
            kind: KeywordKind::Word,
            importance: 0.8,
            frequency: 1,
        }])
    }

    async fn summarize(&self, request: &ResolvedRequest) -> Result<SummaryResult, ProviderError> {
        self.enter("summary", request).await?;
        Ok(SummaryResult {
            summary: "Sen leverans, ingen support.".to_string(),
            language: request.language,
            original_length: utf16_len(&request.text),
            summary_length: request.summary_length,
        })
    }

    async fn detect_toxicity(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ToxicityResult, ProviderError> {
        self.enter("toxicity", request).await?;
        Ok(ToxicityResult::default())
    }

    async fn extract_entities(
        &self,
        request: &ResolvedRequest,
    ) -> Result<Vec<NamedEntity>, ProviderError> {
        self.enter("entities", request).await?;
        Ok(vec![])
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Service over `provider` with a fresh cache.
pub fn make_service(
    provider: Arc<ScriptedProvider>,
    config: AnalysisConfig,
) -> TextAnalysisService {
    let cache = Arc::new(ResultCache::new(100, Duration::from_secs(60)));
    TextAnalysisService::new(provider, cache, config)
}

/// Config with every feature, batch included, switched on.
pub fn config_all_features() -> NordicConfig {
    let mut config = NordicConfig::default();
    config.analysis.allowed_features = vec![
        AnalysisFeature::Full,
        AnalysisFeature::Batch,
        AnalysisFeature::Sentiment,
        AnalysisFeature::Topics,
        AnalysisFeature::Keywords,
        AnalysisFeature::Summary,
        AnalysisFeature::Toxicity,
        AnalysisFeature::Entities,
    ];
    config
}

pub fn make_app(config: NordicConfig, provider: Arc<ScriptedProvider>) -> axum::Router {
    let state = Arc::new(AppState::new(Arc::new(config), provider));
    create_router(state)
}

// =============================================================================
// Request Helpers
// =============================================================================

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send a request through the router and decode the JSON body.
pub async fn send_json(
    app: &mut axum::Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}
