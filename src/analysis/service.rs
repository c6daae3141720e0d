//! Orchestration service.
//!
//! Redacts, resolves and fans requests out to the [`AnalysisProvider`],
//! caching full analyses and isolating failures in batches.

use super::cache::ResultCache;
use super::language::LanguageResolver;
use super::pii;
use super::types::{
    utf16_len, AnalysisBatchRequest, AnalysisMeta, AnalysisRequest, BatchItemError,
    BatchItemResult, FullAnalysisResult, Keyword, NamedEntity, ResolvedRequest, SentimentLabel,
    SentimentResult, SummaryResult, TopicClassificationResult, ToxicityResult,
};
use crate::config::AnalysisConfig;
use crate::provider::{AnalysisProvider, ProviderError};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// `meta.provider` reported for results produced without any provider call.
pub const SHORT_TEXT_PROVIDER: &str = "short_text_shortcut";

/// Entry point for every analysis operation.
///
/// Cheap to share behind an `Arc`; all methods take `&self` and may be called
/// concurrently.
pub struct TextAnalysisService {
    provider: Arc<dyn AnalysisProvider>,
    cache: Arc<ResultCache>,
    resolver: LanguageResolver,
    config: AnalysisConfig,
}

impl TextAnalysisService {
    pub fn new(
        provider: Arc<dyn AnalysisProvider>,
        cache: Arc<ResultCache>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            resolver: LanguageResolver::from_config(&config),
            config,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Copy of `request` with PII replaced when `anonymize` is set.
    pub fn redact(request: &AnalysisRequest) -> AnalysisRequest {
        if request.anonymize {
            AnalysisRequest {
                text: pii::anonymize(&request.text),
                ..request.clone()
            }
        } else {
            request.clone()
        }
    }

    /// Fill in language and summary length for an already-redacted request.
    pub fn resolve(&self, request: AnalysisRequest) -> ResolvedRequest {
        let language = self.resolver.resolve(&request);
        ResolvedRequest {
            summary_length: request
                .summary_length
                .unwrap_or(self.config.default_summary_length),
            text: request.text,
            language,
        }
    }

    fn prepare(&self, request: &AnalysisRequest) -> ResolvedRequest {
        self.resolve(Self::redact(request))
    }

    pub async fn analyze_sentiment(
        &self,
        request: &AnalysisRequest,
    ) -> Result<SentimentResult, ProviderError> {
        let resolved = self.prepare(request);
        track("sentiment", self.provider.analyze_sentiment(&resolved)).await
    }

    pub async fn classify_topics(
        &self,
        request: &AnalysisRequest,
    ) -> Result<TopicClassificationResult, ProviderError> {
        let resolved = self.prepare(request);
        track("topics", self.provider.classify_topics(&resolved)).await
    }

    pub async fn extract_keywords(
        &self,
        request: &AnalysisRequest,
    ) -> Result<Vec<Keyword>, ProviderError> {
        let resolved = self.prepare(request);
        track("keywords", self.provider.extract_keywords(&resolved)).await
    }

    pub async fn summarize(&self, request: &AnalysisRequest) -> Result<SummaryResult, ProviderError> {
        let resolved = self.prepare(request);
        track("summary", self.provider.summarize(&resolved)).await
    }

    pub async fn detect_toxicity(
        &self,
        request: &AnalysisRequest,
    ) -> Result<ToxicityResult, ProviderError> {
        let resolved = self.prepare(request);
        track("toxicity", self.provider.detect_toxicity(&resolved)).await
    }

    pub async fn extract_entities(
        &self,
        request: &AnalysisRequest,
    ) -> Result<Vec<NamedEntity>, ProviderError> {
        let resolved = self.prepare(request);
        track("entities", self.provider.extract_entities(&resolved)).await
    }

    /// Run all six analyses for one text.
    ///
    /// Short texts are answered locally. Otherwise the cache is probed and, on
    /// a miss, the six provider calls run concurrently on a detached task;
    /// the first failure fails the whole call and nothing is cached.
    /// Dropping the returned future does not cancel that task.
    pub async fn analyze_full(
        &self,
        request: &AnalysisRequest,
    ) -> Result<FullAnalysisResult, ProviderError> {
        let redacted = Self::redact(request);

        let length = utf16_len(&redacted.text);
        if length < self.config.short_text_threshold {
            metrics::counter!("nordicsense_short_text_total").increment(1);
            tracing::debug!(length, "Short text, skipping provider");
            return Ok(self.short_text_result(redacted));
        }

        let resolved = self.resolve(redacted);

        if let Some(mut hit) = self.cache.get(&resolved) {
            metrics::counter!("nordicsense_cache_hits_total").increment(1);
            tracing::debug!(language = %resolved.language, "Cache hit");
            hit.meta.cached = Some(true);
            return Ok(hit);
        }
        metrics::counter!("nordicsense_cache_misses_total").increment(1);

        // The fan-out and cache write outlive this call: a caller that times
        // out or disconnects still leaves the result cached.
        let task = tokio::spawn(fan_out(
            Arc::clone(&self.provider),
            Arc::clone(&self.cache),
            resolved,
        ));
        task.await
            .map_err(|e| ProviderError::Internal(format!("analysis task failed: {}", e)))?
    }

    /// Analyze every item independently, at most `batch_concurrency` at a time.
    ///
    /// Output order equals input order. Failed items become error records.
    pub async fn analyze_batch(&self, batch: &AnalysisBatchRequest) -> Vec<BatchItemResult> {
        let limit = self.config.batch_concurrency.max(1);

        stream::iter(batch.items.iter().cloned().enumerate())
            .map(|(index, item)| async move {
                match self.analyze_full(&item).await {
                    Ok(result) => BatchItemResult::Success(Box::new(result)),
                    Err(e) => {
                        metrics::counter!("nordicsense_batch_item_errors_total").increment(1);
                        tracing::warn!(index, error = %e, "Batch item failed");
                        BatchItemResult::Failure(BatchItemError::new(
                            e.to_string(),
                            item.text,
                        ))
                    }
                }
            })
            .buffered(limit)
            .collect()
            .await
    }

    fn short_text_result(&self, request: AnalysisRequest) -> FullAnalysisResult {
        let language = self.config.default_language;
        FullAnalysisResult {
            language,
            sentiment: SentimentResult {
                label: SentimentLabel::Neutral,
                score: 0.5,
                tones: None,
            },
            topics: TopicClassificationResult::default(),
            keywords: Vec::new(),
            summary: SummaryResult {
                original_length: utf16_len(&request.text),
                summary: request.text,
                language,
                summary_length: request
                    .summary_length
                    .unwrap_or(self.config.default_summary_length),
            },
            toxicity: ToxicityResult::default(),
            entities: Vec::new(),
            meta: AnalysisMeta {
                provider: SHORT_TEXT_PROVIDER.to_string(),
                processing_time_ms: 0,
                cached: None,
            },
        }
    }
}

/// Run the six provider calls for a cache miss and store the result.
///
/// Fails fast: the first error drops the remaining calls and nothing is
/// cached.
async fn fan_out(
    provider: Arc<dyn AnalysisProvider>,
    cache: Arc<ResultCache>,
    resolved: ResolvedRequest,
) -> Result<FullAnalysisResult, ProviderError> {
    let start = Instant::now();
    let provider = provider.as_ref();
    let (sentiment, topics, keywords, summary, toxicity, entities) = futures::try_join!(
        track("sentiment", provider.analyze_sentiment(&resolved)),
        track("topics", provider.classify_topics(&resolved)),
        track("keywords", provider.extract_keywords(&resolved)),
        track("summary", provider.summarize(&resolved)),
        track("toxicity", provider.detect_toxicity(&resolved)),
        track("entities", provider.extract_entities(&resolved))
    )?;
    let elapsed = start.elapsed();

    metrics::histogram!("nordicsense_fanout_duration_seconds").record(elapsed.as_secs_f64());
    tracing::debug!(
        language = %resolved.language,
        elapsed_ms = elapsed.as_millis() as u64,
        "Full analysis completed"
    );

    let result = FullAnalysisResult {
        language: resolved.language,
        sentiment,
        topics,
        keywords,
        summary,
        toxicity,
        entities,
        meta: AnalysisMeta {
            provider: provider.name().to_string(),
            processing_time_ms: elapsed.as_millis() as u64,
            cached: None,
        },
    };

    cache.set(&resolved, result.clone());
    Ok(result)
}

async fn track<T>(
    operation: &'static str,
    call: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    call.await.inspect_err(|e| {
        metrics::counter!("nordicsense_provider_errors_total", "operation" => operation)
            .increment(1);
        tracing::debug!(operation, error = %e, kind = e.kind(), "Provider call failed");
    })
}
