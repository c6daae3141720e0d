//! Analysis provider abstraction.
//!
//! This module provides the `AnalysisProvider` trait that hides the LLM
//! vendor behind six independent analysis operations. The orchestration
//! service only ever talks to `Arc<dyn AnalysisProvider>`.

use async_trait::async_trait;

pub mod error;
pub mod factory;
pub mod openai;

pub use error::ProviderError;
pub use factory::create_provider;
pub use openai::OpenAiProvider;

use crate::analysis::{
    Keyword, NamedEntity, ResolvedRequest, SentimentResult, SummaryResult,
    TopicClassificationResult, ToxicityResult,
};

/// Capability interface for the external analysis backend.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn AnalysisProvider>`.
/// All async methods use `async_trait` for compatibility with trait objects.
///
/// # Errors
///
/// Every operation fails independently with a [`ProviderError`] when the
/// upstream call errors, returns nothing, or returns data that violates the
/// operation's schema. Callers propagate these unchanged.
#[async_trait]
pub trait AnalysisProvider: Send + Sync + 'static {
    /// Provider identity reported in `meta.provider` (e.g., "openai").
    fn name(&self) -> &str;

    /// Overall sentiment with optional tone nuances.
    async fn analyze_sentiment(
        &self,
        request: &ResolvedRequest,
    ) -> Result<SentimentResult, ProviderError>;

    /// Customer-experience topics with confidence scores.
    async fn classify_topics(
        &self,
        request: &ResolvedRequest,
    ) -> Result<TopicClassificationResult, ProviderError>;

    /// Important words and phrases.
    async fn extract_keywords(&self, request: &ResolvedRequest)
        -> Result<Vec<Keyword>, ProviderError>;

    /// Summary at `request.summary_length`.
    async fn summarize(&self, request: &ResolvedRequest) -> Result<SummaryResult, ProviderError>;

    /// Toxicity verdict with per-label scores.
    async fn detect_toxicity(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ToxicityResult, ProviderError>;

    /// Named entities with UTF-16 offsets.
    async fn extract_entities(
        &self,
        request: &ResolvedRequest,
    ) -> Result<Vec<NamedEntity>, ProviderError>;
}
