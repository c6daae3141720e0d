//! Analysis endpoint handlers.
//!
//! Every handler runs the same gate: feature switch, then body parsing and
//! validation, then the service call. Outcomes are counted per feature.

use crate::analysis::{
    AnalysisBatchRequest, AnalysisFeature, AnalysisRequest, BatchItemResult, FullAnalysisResult,
    Keyword, NamedEntity, SentimentResult, SummaryResult, TopicClassificationResult,
    ToxicityResult,
};
use crate::api::{ApiError, AppState};
use crate::provider::ProviderError;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

type Payload<T> = Result<Json<T>, JsonRejection>;

fn ensure_enabled(state: &AppState, feature: AnalysisFeature) -> Result<(), ApiError> {
    if state.config.analysis.is_enabled(feature) {
        Ok(())
    } else {
        Err(ApiError::feature_disabled(feature))
    }
}

fn admit(
    state: &AppState,
    feature: AnalysisFeature,
    payload: Payload<AnalysisRequest>,
) -> Result<AnalysisRequest, ApiError> {
    ensure_enabled(state, feature)?;
    let Json(request) = payload?;
    let issues = request.validate(state.config.analysis.max_text_length);
    if !issues.is_empty() {
        return Err(ApiError::validation(issues));
    }
    Ok(request)
}

fn upstream(state: &AppState) -> impl Fn(ProviderError) -> ApiError + '_ {
    move |err| ApiError::from_provider(err, state.config.server.expose_upstream_errors)
}

fn record<T>(feature: AnalysisFeature, result: Result<T, ApiError>) -> Result<Json<T>, ApiError> {
    let status = match &result {
        Ok(_) => "200".to_string(),
        Err(e) => e.status_code().as_u16().to_string(),
    };
    metrics::counter!(
        "nordicsense_requests_total",
        "feature" => feature.as_str(),
        "status" => status,
    )
    .increment(1);
    result.map(Json)
}

/// POST /api/analyze/full
pub async fn full(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisRequest>,
) -> Result<Json<FullAnalysisResult>, ApiError> {
    let feature = AnalysisFeature::Full;
    let result = async {
        let request = admit(&state, feature, payload)?;
        let output = state
            .service
            .analyze_full(&request)
            .await
            .map_err(upstream(&state))?;
        Ok::<_, ApiError>(output)
    }
    .await;
    record(feature, result)
}

/// POST /api/analyze/batch
pub async fn batch(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisBatchRequest>,
) -> Result<Json<Vec<BatchItemResult>>, ApiError> {
    let feature = AnalysisFeature::Batch;
    let result = async {
        ensure_enabled(&state, feature)?;
        let Json(batch) = payload?;
        let analysis = &state.config.analysis;
        let issues = batch.validate(analysis.max_batch_items, analysis.max_text_length);
        if !issues.is_empty() {
            return Err(ApiError::validation(issues));
        }
        Ok::<_, ApiError>(state.service.analyze_batch(&batch).await)
    }
    .await;
    record(feature, result)
}

/// POST /api/analyze/sentiment
pub async fn sentiment(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisRequest>,
) -> Result<Json<SentimentResult>, ApiError> {
    let feature = AnalysisFeature::Sentiment;
    let result = async {
        let request = admit(&state, feature, payload)?;
        let output = state
            .service
            .analyze_sentiment(&request)
            .await
            .map_err(upstream(&state))?;
        Ok::<_, ApiError>(output)
    }
    .await;
    record(feature, result)
}

/// POST /api/analyze/topics
pub async fn topics(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisRequest>,
) -> Result<Json<TopicClassificationResult>, ApiError> {
    let feature = AnalysisFeature::Topics;
    let result = async {
        let request = admit(&state, feature, payload)?;
        let output = state
            .service
            .classify_topics(&request)
            .await
            .map_err(upstream(&state))?;
        Ok::<_, ApiError>(output)
    }
    .await;
    record(feature, result)
}

/// POST /api/analyze/keywords
pub async fn keywords(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisRequest>,
) -> Result<Json<Vec<Keyword>>, ApiError> {
    let feature = AnalysisFeature::Keywords;
    let result = async {
        let request = admit(&state, feature, payload)?;
        let output = state
            .service
            .extract_keywords(&request)
            .await
            .map_err(upstream(&state))?;
        Ok::<_, ApiError>(output)
    }
    .await;
    record(feature, result)
}

/// POST /api/analyze/summary
pub async fn summary(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisRequest>,
) -> Result<Json<SummaryResult>, ApiError> {
    let feature = AnalysisFeature::Summary;
    let result = async {
        let request = admit(&state, feature, payload)?;
        let output = state
            .service
            .summarize(&request)
            .await
            .map_err(upstream(&state))?;
        Ok::<_, ApiError>(output)
    }
    .await;
    record(feature, result)
}

/// POST /api/analyze/toxicity
pub async fn toxicity(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisRequest>,
) -> Result<Json<ToxicityResult>, ApiError> {
    let feature = AnalysisFeature::Toxicity;
    let result = async {
        let request = admit(&state, feature, payload)?;
        let output = state
            .service
            .detect_toxicity(&request)
            .await
            .map_err(upstream(&state))?;
        Ok::<_, ApiError>(output)
    }
    .await;
    record(feature, result)
}

/// POST /api/analyze/entities
pub async fn entities(
    State(state): State<Arc<AppState>>,
    payload: Payload<AnalysisRequest>,
) -> Result<Json<Vec<NamedEntity>>, ApiError> {
    let feature = AnalysisFeature::Entities;
    let result = async {
        let request = admit(&state, feature, payload)?;
        let output = state
            .service
            .extract_entities(&request)
            .await
            .map_err(upstream(&state))?;
        Ok::<_, ApiError>(output)
    }
    .await;
    record(feature, result)
}
