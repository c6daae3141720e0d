//! Analysis pipeline configuration

use crate::analysis::{AnalysisFeature, Language, SummaryLength};
use serde::{Deserialize, Serialize};

/// Limits, defaults and feature switches for the analysis endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum request text length in UTF-16 code units
    pub max_text_length: usize,
    pub default_summary_length: SummaryLength,
    /// Fallback when detection is skipped or inconclusive
    pub default_language: Language,
    /// Endpoints that accept traffic; anything else answers 403
    pub allowed_features: Vec<AnalysisFeature>,
    /// Maximum batch items analyzed at the same time
    pub batch_concurrency: usize,
    pub max_batch_items: usize,
    /// Texts shorter than this skip the provider entirely in full analysis
    pub short_text_threshold: usize,
    /// Texts shorter than this are not sent to language detection
    pub min_detection_length: usize,
}

impl AnalysisConfig {
    pub fn is_enabled(&self, feature: AnalysisFeature) -> bool {
        self.allowed_features.contains(&feature)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_text_length: 20_000,
            default_summary_length: SummaryLength::Short,
            default_language: Language::En,
            allowed_features: vec![
                AnalysisFeature::Full,
                AnalysisFeature::Sentiment,
                AnalysisFeature::Topics,
                AnalysisFeature::Keywords,
                AnalysisFeature::Summary,
                AnalysisFeature::Toxicity,
                AnalysisFeature::Entities,
            ],
            batch_concurrency: 5,
            max_batch_items: 50,
            short_text_threshold: 20,
            min_detection_length: crate::analysis::language::MIN_DETECTION_LENGTH,
        }
    }
}
