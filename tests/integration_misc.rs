mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use common::setup_test_app;
use tower::ServiceExt;

#[tokio::test]
async fn test_root_banner() {
    let app = setup_test_app();

    for uri in ["/api", "/api/"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Digital Library Access Tracker API");
    }
}

#[tokio::test]
async fn test_fine_policy_endpoint() {
    let app = setup_test_app();

    let (status, body) = app.get("/api/fines/policy").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grace_period_days"], 5);
    let tiers = body["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers[0]["days_start"], 1);
    assert_eq!(tiers[0]["days_end"], 7);
    assert_eq!(tiers[0]["rate_per_day"], 2.0);
    assert_eq!(tiers[2]["days_end"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_fine_assessment_endpoint() {
    let app = setup_test_app();

    let (status, body) = app
        .get("/api/fines/assess?due_date=2024-01-01&return_date=2024-01-20")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fine_amount"], 49.0);
    assert_eq!(body["return_date"], "2024-01-20");

    app.clock.advance(Duration::days(9));
    let (status, body) = app
        .get("/api/fines/assess?due_date=2024-01-01&return_date=")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fine_amount"], 8.0);
    assert_eq!(body["return_date"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_fine_assessment_rejects_bad_dates() {
    let app = setup_test_app();

    let (status, body) = app
        .get("/api/fines/assess?due_date=2024-01-01&return_date=tomorrow")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("tomorrow"));

    let (status, body) = app.get("/api/fines/assess").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app();

    let (status, body) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Shelfwise API");
    assert!(body["paths"]["/api/transactions/issue"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app();

    let request = Request::builder()
        .uri("/api/books")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_error_body_shape() {
    let app = setup_test_app();

    let (status, body) = app.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::Value::Null);

    let (status, body) = app
        .post("/api/transactions/return", serde_json::json!({"transaction_id": "T1"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].is_string());
}
