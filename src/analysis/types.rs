//! Request, result and batch types shared by the service, provider and API layers.
//!
//! All JSON field names are camelCase to match the public HTTP contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Languages the analysis pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Swedish
    Sv,
    /// Norwegian
    No,
    /// Danish
    Da,
    /// Finnish
    Fi,
    /// English
    #[default]
    En,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Sv,
        Language::No,
        Language::Da,
        Language::Fi,
        Language::En,
    ];

    /// Two-letter tag used on the wire and in provider prompts.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Sv => "sv",
            Language::No => "no",
            Language::Da => "da",
            Language::Fi => "fi",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sv" => Ok(Language::Sv),
            "no" => Ok(Language::No),
            "da" => Ok(Language::Da),
            "fi" => Ok(Language::Fi),
            "en" => Ok(Language::En),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

/// Summary granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    #[default]
    Short,
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Long => "long",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "long" => Ok(SummaryLength::Long),
            _ => Err(format!("Invalid summary length: {}", s)),
        }
    }
}

/// Endpoints that can be switched on and off in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisFeature {
    Full,
    Batch,
    Sentiment,
    Topics,
    Keywords,
    Summary,
    Toxicity,
    Entities,
}

impl AnalysisFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisFeature::Full => "full",
            AnalysisFeature::Batch => "batch",
            AnalysisFeature::Sentiment => "sentiment",
            AnalysisFeature::Topics => "topics",
            AnalysisFeature::Keywords => "keywords",
            AnalysisFeature::Summary => "summary",
            AnalysisFeature::Toxicity => "toxicity",
            AnalysisFeature::Entities => "entities",
        }
    }
}

impl fmt::Display for AnalysisFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(AnalysisFeature::Full),
            "batch" => Ok(AnalysisFeature::Batch),
            "sentiment" => Ok(AnalysisFeature::Sentiment),
            "topics" => Ok(AnalysisFeature::Topics),
            "keywords" => Ok(AnalysisFeature::Keywords),
            "summary" => Ok(AnalysisFeature::Summary),
            "toxicity" => Ok(AnalysisFeature::Toxicity),
            "entities" => Ok(AnalysisFeature::Entities),
            _ => Err(format!("Unknown analysis feature: {}", s)),
        }
    }
}

/// Length of `text` in UTF-16 code units.
///
/// Every length the API reports or enforces uses this unit, matching the
/// entity offsets returned by the provider.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Inbound analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_length: Option<SummaryLength>,
    #[serde(default)]
    pub anonymize: bool,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_summary_length(mut self, summary_length: SummaryLength) -> Self {
        self.summary_length = Some(summary_length);
        self
    }

    pub fn with_anonymize(mut self, anonymize: bool) -> Self {
        self.anonymize = anonymize;
        self
    }

    /// Check the text bounds. Returns every issue found; empty means valid.
    pub fn validate(&self, max_text_length: usize) -> Vec<ValidationIssue> {
        self.validate_at("text", max_text_length)
    }

    fn validate_at(&self, path: &str, max_text_length: usize) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.text.is_empty() {
            issues.push(ValidationIssue::new(path, "Text is required"));
        } else if utf16_len(&self.text) > max_text_length {
            issues.push(ValidationIssue::new(
                path,
                format!("Text must be below {} characters", max_text_length),
            ));
        }
        issues
    }
}

/// Batch of analysis requests processed independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBatchRequest {
    pub items: Vec<AnalysisRequest>,
}

impl AnalysisBatchRequest {
    pub fn validate(&self, max_items: usize, max_text_length: usize) -> Vec<ValidationIssue> {
        if self.items.is_empty() {
            return vec![ValidationIssue::new(
                "items",
                "At least one item is required",
            )];
        }
        if self.items.len() > max_items {
            return vec![ValidationIssue::new(
                "items",
                format!("Batch must contain at most {} items", max_items),
            )];
        }
        self.items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| item.validate_at(&format!("items.{}.text", i), max_text_length))
            .collect()
    }
}

/// Request with language and summary length filled in.
///
/// `text` is already redacted when the caller asked for anonymization, so
/// this value never carries raw PII into the cache or the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRequest {
    pub text: String,
    pub language: Language,
    pub summary_length: SummaryLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTone {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tones: Option<Vec<SentimentTone>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicClassificationResult {
    pub topics: Vec<TopicScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordKind {
    Word,
    Phrase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: KeywordKind,
    pub importance: f64,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    pub language: Language,
    pub original_length: usize,
    pub summary_length: SummaryLength,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToxicityResult {
    pub is_toxic: bool,
    pub labels: Vec<String>,
    pub scores: BTreeMap<String, f64>,
}

/// Named entity with offsets in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    pub provider: String,
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

/// Aggregate of all six sub-analyses for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysisResult {
    pub language: Language,
    pub sentiment: SentimentResult,
    pub topics: TopicClassificationResult,
    pub keywords: Vec<Keyword>,
    pub summary: SummaryResult,
    pub toxicity: ToxicityResult,
    pub entities: Vec<NamedEntity>,
    pub meta: AnalysisMeta,
}

impl FullAnalysisResult {
    pub fn is_cached(&self) -> bool {
        self.meta.cached.unwrap_or(false)
    }
}

/// Error record standing in for a failed batch item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemError {
    pub error: bool,
    pub message: String,
    pub original_text: String,
}

impl BatchItemError {
    pub fn new(message: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            original_text: original_text.into(),
        }
    }
}

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItemResult {
    Failure(BatchItemError),
    Success(Box<FullAnalysisResult>),
}

impl BatchItemResult {
    pub fn is_error(&self) -> bool {
        matches!(self, BatchItemResult::Failure(_))
    }

    pub fn as_success(&self) -> Option<&FullAnalysisResult> {
        match self {
            BatchItemResult::Success(result) => Some(result),
            BatchItemResult::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&BatchItemError> {
        match self {
            BatchItemResult::Failure(error) => Some(error),
            BatchItemResult::Success(_) => None,
        }
    }
}
