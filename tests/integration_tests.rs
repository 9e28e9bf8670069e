//! Integration tests for the edge enrichment service.
//!
//! These tests drive the full router in-process (no listener) and verify
//! the pipeline's observable behavior: the geo-detect JSON fast path,
//! header propagation on enriched responses, and the per-stage bypass
//! rules that must leave requests completely unmodified.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use edge_enrich::{app, AppState};

// ==================== Test Helpers ====================

fn test_app() -> Router {
    app(Arc::new(AppState::default()))
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

fn get_with_headers(path: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

// ==================== Geo-Detect Endpoint Tests ====================

#[tokio::test]
async fn test_geo_detect_returns_default_location_json() {
    let response = test_app().oneshot(get("/api/geo-detect")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let json = body_json(response).await;
    assert_eq!(json["country"], "BR");
    assert_eq!(json["city"], "Rio de Janeiro");
    assert_eq!(json["timezone"], "America/Sao_Paulo");
    assert_eq!(json["region"], "RJ");
    assert_eq!(json["latitude"], -22.9068);
    assert_eq!(json["longitude"], -43.2045);
    assert_eq!(json["isDefault"], true);
}

#[tokio::test]
async fn test_geo_detect_reflects_upstream_signal() {
    let request = get_with_headers(
        "/api/geo-detect",
        &[(
            "x-edge-geo",
            r#"{"country":{"code":"DE"},"city":"Berlin","timezone":"Europe/Berlin","subdivision":{"code":"BE"},"latitude":52.52,"longitude":13.405}"#,
        )],
    );
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["country"], "DE");
    assert_eq!(json["city"], "Berlin");
    assert_eq!(json["region"], "BE");
    assert_eq!(json["isDefault"], false);
}

#[tokio::test]
async fn test_geo_detect_treats_malformed_signal_as_absent() {
    let request = get_with_headers("/api/geo-detect", &[("x-edge-geo", "{not json")]);
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["country"], "BR");
    assert_eq!(json["isDefault"], true);
}

// ==================== Header Propagation Tests ====================

#[tokio::test]
async fn test_page_request_gets_both_headers() {
    let response = test_app().oneshot(get("/checkout")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let location = response
        .headers()
        .get("x-user-location")
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    let json: serde_json::Value = serde_json::from_str(location).expect("location json");
    assert_eq!(json["country"], "BR");
    assert_eq!(json["isDefault"], true);

    assert_eq!(
        response
            .headers()
            .get("x-detected-language")
            .and_then(|v| v.to_str().ok()),
        Some("en")
    );
}

#[tokio::test]
async fn test_upstream_signal_flows_into_headers() {
    let request = get_with_headers(
        "/",
        &[
            ("x-edge-geo", r#"{"country":{"code":"KZ"}}"#),
            ("accept-language", "en-US,en;q=0.9"),
        ],
    );
    let response = test_app().oneshot(request).await.unwrap();

    let location = response
        .headers()
        .get("x-user-location")
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    let json: serde_json::Value = serde_json::from_str(location).expect("location json");
    assert_eq!(json["country"], "KZ");
    assert_eq!(json["isDefault"], false);

    // Russian-speaking country wins over the English header.
    assert_eq!(
        response
            .headers()
            .get("x-detected-language")
            .and_then(|v| v.to_str().ok()),
        Some("ru")
    );
}

#[tokio::test]
async fn test_accept_language_decides_when_country_does_not() {
    let request = get_with_headers("/", &[("accept-language", "ru-RU,en;q=0.5")]);
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("x-detected-language")
            .and_then(|v| v.to_str().ok()),
        Some("ru")
    );

    let request = get_with_headers("/", &[("accept-language", "fr-FR,en;q=0.8")]);
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("x-detected-language")
            .and_then(|v| v.to_str().ok()),
        Some("en")
    );
}

#[tokio::test]
async fn test_downstream_body_passes_through_unchanged() {
    let response = test_app().oneshot(get("/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    assert!(!bytes.is_empty());
}

// ==================== Bypass Tests ====================

#[tokio::test]
async fn test_static_asset_path_is_never_enriched() {
    let response = test_app().oneshot(get("/images/logo.png")).await.unwrap();

    assert!(response.headers().get("x-user-location").is_none());
    assert!(response.headers().get("x-detected-language").is_none());
}

#[tokio::test]
async fn test_platform_function_path_is_never_intercepted() {
    let response = test_app()
        .oneshot(get("/.netlify/functions/x"))
        .await
        .unwrap();

    assert!(response.headers().get("x-user-location").is_none());
    assert!(response.headers().get("x-detected-language").is_none());
}

#[tokio::test]
async fn test_api_and_build_asset_prefixes_bypass() {
    for path in ["/api/chat", "/_next/data/page"] {
        let response = test_app().oneshot(get(path)).await.unwrap();
        assert!(
            response.headers().get("x-user-location").is_none(),
            "{} should be bypassed",
            path
        );
        assert!(
            response.headers().get("x-detected-language").is_none(),
            "{} should be bypassed",
            path
        );
    }
}

#[tokio::test]
async fn test_component_bundle_bypasses_only_the_language_stage() {
    let response = test_app().oneshot(get("/components/header")).await.unwrap();

    assert!(response.headers().get("x-user-location").is_some());
    assert!(response.headers().get("x-detected-language").is_none());
}

// ==================== Idempotence Tests ====================

#[tokio::test]
async fn test_identical_requests_yield_identical_enrichment() {
    let headers: &[(&str, &str)] = &[
        ("x-edge-geo", r#"{"country":{"code":"FR"},"city":"Paris"}"#),
        ("accept-language", "fr-FR,ru;q=0.4"),
    ];

    let first = test_app()
        .oneshot(get_with_headers("/", headers))
        .await
        .unwrap();
    let second = test_app()
        .oneshot(get_with_headers("/", headers))
        .await
        .unwrap();

    assert_eq!(
        first.headers().get("x-user-location"),
        second.headers().get("x-user-location")
    );
    assert_eq!(
        first.headers().get("x-detected-language"),
        second.headers().get("x-detected-language")
    );
}
