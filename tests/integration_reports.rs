mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::setup_test_app;
use data_encoding::BASE64;
use serde_json::json;

#[tokio::test]
async fn test_generate_report_returns_base64_workbook() {
    let app = setup_test_app();
    app.add_book("B1", "Dune", "SciFi", 1).await;
    app.add_user("U1", "Asha", "MBA").await;
    let id = app.issue("B1", "U1", 7).await;
    app.clock.advance(Duration::days(20));
    app.post("/api/transactions/return", json!({"transaction_id": id}))
        .await;

    let (status, body) = app.post("/api/reports/generate", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["filename"], "library_report_2024-01-21.xlsx");

    let bytes = BASE64
        .decode(body["content"].as_str().unwrap().as_bytes())
        .unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_generate_report_on_empty_library() {
    let app = setup_test_app();

    let (status, body) = app.send("POST", "/api/reports/generate", None).await;

    assert_eq!(status, StatusCode::OK);
    let bytes = BASE64
        .decode(body["content"].as_str().unwrap().as_bytes())
        .unwrap();
    assert!(bytes.starts_with(b"PK"));
}
