//! OpenAI provider implementation.

use super::{AnalysisProvider, ProviderError};
use crate::analysis::{
    Keyword, KeywordKind, Language, NamedEntity, ResolvedRequest, SentimentResult,
    SummaryResult, TopicClassificationResult, ToxicityResult,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// OpenAI provider implementation.
///
/// Every analysis is one JSON-mode chat completion:
/// - POST /v1/chat/completions with Bearer token
/// - `response_format: {"type": "json_object"}`
/// - content parsed and checked against the operation's schema
pub struct OpenAiProvider {
    /// Base URL (e.g., "https://api.openai.com")
    base_url: String,
    /// API key for Bearer authentication
    api_key: String,
    /// Chat model used for every task
    model: String,
    temperature: f32,
    /// Per-call deadline
    timeout: Duration,
    /// Shared HTTP client for connection pooling
    client: Client,
}

impl OpenAiProvider {
    pub fn new(base_url: String, api_key: String, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(60),
            client,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one JSON-mode completion and deserialize the message content.
    async fn run_structured_task<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let timeout_ms = self.timeout.as_millis() as u64;
        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(timeout_ms)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        serde_json::from_str(&content).map_err(|e| {
            ProviderError::InvalidResponse(format!("Unable to parse provider payload: {}", e))
        })
    }
}

fn build_context(language: Language, text: &str) -> String {
    format!("Language: {}\nText:\n\"\"\"\n{}\n\"\"\"", language, text)
}

fn user_prompt(request: &ResolvedRequest, instruction: &str) -> String {
    format!(
        "{}\n{}",
        build_context(request.language, &request.text),
        instruction
    )
}

fn check_score(field: &str, score: f64) -> Result<(), ProviderError> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(ProviderError::InvalidResponse(format!(
            "{} must be between 0 and 1, got {}",
            field, score
        )))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct KeywordsPayload {
    keywords: Vec<RawKeyword>,
}

#[derive(Deserialize)]
struct RawKeyword {
    text: String,
    #[serde(rename = "type")]
    kind: String,
    importance: f64,
    frequency: u32,
}

#[derive(Deserialize)]
struct SummaryPayload {
    summary: String,
}

#[derive(Deserialize)]
struct EntitiesPayload {
    entities: Vec<NamedEntity>,
}

#[async_trait]
impl AnalysisProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn analyze_sentiment(
        &self,
        request: &ResolvedRequest,
    ) -> Result<SentimentResult, ProviderError> {
        let result: SentimentResult = self
            .run_structured_task(
                "You are a Nordic language sentiment analyst. Return strict JSON describing \
                 sentiment and tone nuances as {\"label\": \"positive|neutral|negative\", \
                 \"score\": 0-1, \"tones\": [{\"label\": string, \"score\": 0-1}]}.",
                &user_prompt(
                    request,
                    "Determine overall sentiment and optional tone nuances.",
                ),
            )
            .await?;

        check_score("sentiment.score", result.score)?;
        for tone in result.tones.iter().flatten() {
            check_score("sentiment.tones.score", tone.score)?;
        }
        Ok(result)
    }

    async fn classify_topics(
        &self,
        request: &ResolvedRequest,
    ) -> Result<TopicClassificationResult, ProviderError> {
        let result: TopicClassificationResult = self
            .run_structured_task(
                "You are a Nordic CX analyst. Return relevant customer topics with confidence \
                 scores in JSON format as {\"topics\": [{\"label\": string, \"score\": 0-1}]}.",
                &user_prompt(
                    request,
                    "Identify topics such as delivery, price, support, features, usability, \
                     complaints, praise and more.",
                ),
            )
            .await?;

        for topic in &result.topics {
            check_score("topics.score", topic.score)?;
        }
        Ok(result)
    }

    async fn extract_keywords(
        &self,
        request: &ResolvedRequest,
    ) -> Result<Vec<Keyword>, ProviderError> {
        let payload: KeywordsPayload = self
            .run_structured_task(
                "You are a Nordic SEO assistant. Extract important keywords/phrases as JSON \
                 {\"keywords\": [{\"text\": string, \"type\": \"word|phrase\", \
                 \"importance\": 0-1, \"frequency\": integer}]}.",
                &user_prompt(
                    request,
                    "Return between 5 and 12 keywords/phrases focusing on relevance.",
                ),
            )
            .await?;

        payload
            .keywords
            .into_iter()
            .map(|raw| {
                check_score("keywords.importance", raw.importance)?;
                if raw.frequency < 1 {
                    return Err(ProviderError::InvalidResponse(
                        "keywords.frequency must be at least 1".to_string(),
                    ));
                }
                let kind = match raw.kind.as_str() {
                    "phrase" => KeywordKind::Phrase,
                    _ => KeywordKind::Word,
                };
                Ok(Keyword {
                    text: raw.text,
                    kind,
                    importance: raw.importance,
                    frequency: raw.frequency,
                })
            })
            .collect()
    }

    async fn summarize(&self, request: &ResolvedRequest) -> Result<SummaryResult, ProviderError> {
        let payload: SummaryPayload = self
            .run_structured_task(
                "You are a professional Nordic summarizer. Produce fluent summaries, never \
                 switching language if not needed. Answer as {\"summary\": string}.",
                &user_prompt(
                    request,
                    &format!("Produce a {} summary.", request.summary_length),
                ),
            )
            .await?;

        Ok(SummaryResult {
            summary: payload.summary,
            language: request.language,
            original_length: crate::analysis::utf16_len(&request.text),
            summary_length: request.summary_length,
        })
    }

    async fn detect_toxicity(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ToxicityResult, ProviderError> {
        let result: ToxicityResult = self
            .run_structured_task(
                "You are a Nordic content safety service. Detect insults, hate speech, \
                 harassment, threats, discrimination, profanity. Answer as {\"isToxic\": bool, \
                 \"labels\": [string], \"scores\": {label: 0-1}}.",
                &user_prompt(
                    request,
                    "Return whether the text is toxic. Provide per-label scores.",
                ),
            )
            .await?;

        for score in result.scores.values() {
            check_score("toxicity.scores", *score)?;
        }
        Ok(result)
    }

    async fn extract_entities(
        &self,
        request: &ResolvedRequest,
    ) -> Result<Vec<NamedEntity>, ProviderError> {
        let payload: EntitiesPayload = self
            .run_structured_task(
                "You are a Nordic NER model. Extract persons, locations, organizations, dates, \
                 monetary values, and products as {\"entities\": [{\"text\": string, \
                 \"type\": string, \"start\": integer, \"end\": integer}]}.",
                &user_prompt(
                    request,
                    "Provide the character offsets using UTF-16 code units.",
                ),
            )
            .await?;

        Ok(payload.entities)
    }
}
