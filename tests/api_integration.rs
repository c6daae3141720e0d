//! Integration tests for the HTTP API.
//!
//! The router is driven in-process with a scripted provider behind it.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use nordicsense::analysis::AnalysisFeature;
use nordicsense::api::{create_router, AppState};
use nordicsense::config::NordicConfig;
use nordicsense::provider::ProviderError;
use serde_json::json;
use std::sync::Arc;
use tower::Service;

#[tokio::test]
async fn test_root_reports_service_info() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));

    let (status, body) = send_json(&mut app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "NordicSense API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));

    let (status, body) = send_json(&mut app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_unknown_route_returns_error_envelope() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));

    let (status, body) = send_json(&mut app, get("/api/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("/api/nope"));
}

#[tokio::test]
async fn test_full_analysis_round_trip() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut app = make_app(NordicConfig::default(), Arc::clone(&provider));

    let (status, body) = send_json(
        &mut app,
        post_json(
            "/api/analyze/full",
            json!({"text": SWEDISH_REVIEW, "language": "sv", "summaryLength": "long"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "sv");
    assert_eq!(body["sentiment"]["label"], "negative");
    assert_eq!(body["topics"]["topics"][0]["label"], "delivery");
    assert_eq!(body["keywords"][0]["type"], "word");
    assert_eq!(body["summary"]["summaryLength"], "long");
    assert_eq!(body["toxicity"]["isToxic"], false);
    assert_eq!(body["meta"]["provider"], "scripted");
    assert!(body["meta"].get("cached").is_none());
    assert_eq!(provider.call_count(), 6);

    // Same request again comes from the cache
    let (status, body) = send_json(
        &mut app,
        post_json(
            "/api/analyze/full",
            json!({"text": SWEDISH_REVIEW, "language": "sv", "summaryLength": "long"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["cached"], true);
    assert_eq!(provider.call_count(), 6);
}

#[tokio::test]
async fn test_short_text_shortcut_over_http() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut app = make_app(NordicConfig::default(), Arc::clone(&provider));

    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/full", json!({"text": "Toppen!"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["provider"], "short_text_shortcut");
    assert_eq!(body["meta"]["processingTimeMs"], 0);
    assert_eq!(body["summary"]["summary"], "Toppen!");
    assert_eq!(body["summary"]["originalLength"], 7);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_single_feature_endpoints() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));
    let payload = json!({"text": SWEDISH_REVIEW, "language": "sv"});

    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/sentiment", payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tones"][0]["label"], "frustrated");

    let (status, body) =
        send_json(&mut app, post_json("/api/analyze/topics", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topics"].as_array().unwrap().len(), 2);

    let (status, body) =
        send_json(&mut app, post_json("/api/analyze/keywords", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    let (status, body) =
        send_json(&mut app, post_json("/api/analyze/summary", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summaryLength"], "short");
    assert_eq!(body["language"], "sv");

    let (status, body) =
        send_json(&mut app, post_json("/api/analyze/toxicity", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"], json!([]));

    let (status, body) =
        send_json(&mut app, post_json("/api/analyze/entities", payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_empty_text_is_bad_request() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut app = make_app(NordicConfig::default(), Arc::clone(&provider));

    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/sentiment", json!({"text": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["details"]["issues"][0]["path"], "text");
    assert_eq!(
        body["error"]["details"]["issues"][0]["message"],
        "Text is required"
    );
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_text_over_limit_is_bad_request() {
    let mut config = NordicConfig::default();
    config.analysis.max_text_length = 10;
    let mut app = make_app(config, Arc::new(ScriptedProvider::new()));

    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/full", json!({"text": "elva tecken"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"]["issues"][0]["message"],
        "Text must be below 10 characters"
    );
}

#[tokio::test]
async fn test_unsupported_language_is_bad_request() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));

    let (status, body) = send_json(
        &mut app,
        post_json(
            "/api/analyze/topics",
            json!({"text": SWEDISH_REVIEW, "language": "de"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze/full")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_json(&mut app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_disabled_feature_is_forbidden_before_validation() {
    let mut config = NordicConfig::default();
    config.analysis.allowed_features = vec![AnalysisFeature::Full];
    let mut app = make_app(config, Arc::new(ScriptedProvider::new()));

    // Invalid body, but the gate answers first
    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/sentiment", json!({"text": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FEATURE_DISABLED");
    assert_eq!(body["error"]["message"], "sentiment analysis is disabled");
}

#[tokio::test]
async fn test_batch_disabled_by_default() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));

    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/batch", json!({"items": [{"text": SWEDISH_REVIEW}]})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FEATURE_DISABLED");
}

#[tokio::test]
async fn test_batch_endpoint_isolates_failures() {
    let provider = Arc::new(ScriptedProvider::failing_on(
        "TRASIG",
        ProviderError::EmptyResponse,
    ));
    let mut app = make_app(config_all_features(), Arc::clone(&provider));

    let (status, body) = send_json(
        &mut app,
        post_json(
            "/api/analyze/batch",
            json!({"items": [
                {"text": SWEDISH_REVIEW},
                {"text": format!("TRASIG {}", SWEDISH_REVIEW)},
                {"text": "Ok"}
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["meta"]["provider"], "scripted");
    assert_eq!(items[1]["error"], true);
    assert_eq!(items[1]["message"], "Provider returned an empty response");
    assert_eq!(
        items[1]["originalText"],
        format!("TRASIG {}", SWEDISH_REVIEW)
    );
    assert_eq!(items[2]["meta"]["provider"], "short_text_shortcut");
}

#[tokio::test]
async fn test_batch_validation_paths() {
    let mut app = make_app(config_all_features(), Arc::new(ScriptedProvider::new()));

    let (status, body) = send_json(
        &mut app,
        post_json(
            "/api/analyze/batch",
            json!({"items": [{"text": "fine text"}, {"text": ""}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["issues"][0]["path"], "items.1.text");

    let (status, body) =
        send_json(&mut app, post_json("/api/analyze/batch", json!({"items": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["issues"][0]["path"], "items");
}

#[tokio::test]
async fn test_provider_errors_map_to_gateway_statuses() {
    let cases = [
        (ProviderError::Timeout(500), StatusCode::GATEWAY_TIMEOUT, "PROVIDER_TIMEOUT"),
        (
            ProviderError::EmptyResponse,
            StatusCode::BAD_GATEWAY,
            "PROVIDER_RESPONSE_EMPTY",
        ),
        (
            ProviderError::InvalidResponse("bad json".to_string()),
            StatusCode::BAD_GATEWAY,
            "PROVIDER_PARSE_ERROR",
        ),
        (
            ProviderError::Upstream {
                status: 500,
                message: "boom".to_string(),
            },
            StatusCode::BAD_GATEWAY,
            "PROVIDER_ERROR",
        ),
    ];

    for (error, expected_status, expected_code) in cases {
        let provider = Arc::new(ScriptedProvider::failing_operation("summary", error));
        let mut app = make_app(NordicConfig::default(), provider);

        let (status, body) = send_json(
            &mut app,
            post_json("/api/analyze/full", json!({"text": SWEDISH_REVIEW})),
        )
        .await;

        assert_eq!(status, expected_status);
        assert_eq!(body["error"]["code"], expected_code);
    }
}

#[tokio::test]
async fn test_server_deadline_uses_error_envelope_and_keeps_work() {
    let mut config = NordicConfig::default();
    config.server.request_timeout_seconds = 1;
    let provider =
        Arc::new(ScriptedProvider::new().with_delay(std::time::Duration::from_millis(1500)));
    let state = Arc::new(AppState::new(Arc::new(config), provider.clone()));
    let mut app = create_router(Arc::clone(&state));

    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/full", json!({"text": SWEDISH_REVIEW})),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"]["code"], "PROVIDER_TIMEOUT");
    assert_eq!(body["error"]["message"], "Request timed out after 1s");
    assert_eq!(body["error"]["details"], json!({}));

    // The fan-out finishes in the background and lands in the cache
    tokio::time::sleep(std::time::Duration::from_millis(1000)).await;
    assert_eq!(state.service.cache().len(), 1);
}

#[tokio::test]
async fn test_upstream_body_not_leaked_by_default() {
    let provider = Arc::new(ScriptedProvider::failing_operation(
        "sentiment",
        ProviderError::Upstream {
            status: 500,
            message: "internal trace".to_string(),
        },
    ));
    let mut app = make_app(NordicConfig::default(), provider);

    let (status, body) = send_json(
        &mut app,
        post_json("/api/analyze/sentiment", json!({"text": SWEDISH_REVIEW})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["message"], "Provider request failed with status 500");
    assert_eq!(body["error"]["details"]["upstreamStatus"], 500);
    assert!(body["error"]["details"].get("upstreamMessage").is_none());
}

#[tokio::test]
async fn test_upstream_body_exposed_when_configured() {
    let provider = Arc::new(ScriptedProvider::failing_operation(
        "sentiment",
        ProviderError::Upstream {
            status: 500,
            message: "internal trace".to_string(),
        },
    ));
    let mut config = NordicConfig::default();
    config.server.expose_upstream_errors = true;
    let mut app = make_app(config, provider);

    let (_, body) = send_json(
        &mut app,
        post_json("/api/analyze/sentiment", json!({"text": SWEDISH_REVIEW})),
    )
    .await;

    assert_eq!(body["error"]["details"]["upstreamMessage"], "internal trace");
}

#[tokio::test]
async fn test_anonymize_over_http_hides_pii_from_provider() {
    let provider = Arc::new(ScriptedProvider::new());
    let mut app = make_app(NordicConfig::default(), Arc::clone(&provider));

    let (status, _) = send_json(
        &mut app,
        post_json(
            "/api/analyze/entities",
            json!({"text": PII_TEXT, "anonymize": true}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let seen = provider.texts();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("[EMAIL]"));
    assert!(seen[0].contains("[PHONE]"));
    assert!(seen[0].contains("[SSN]"));
    assert!(seen[0].contains("[CARD]"));
    assert!(!seen[0].contains("anna@example.se"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let mut app = make_app(NordicConfig::default(), Arc::new(ScriptedProvider::new()));

    let response = app.call(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}
