mod common;

use axum::http::StatusCode;
use common::setup_test_app;
use serde_json::json;

#[tokio::test]
async fn test_create_user_with_defaults() {
    let app = setup_test_app();

    let (status, body) = app
        .post(
            "/api/users",
            json!({
                "user_id": "U1",
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": "9876543210"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["department"], "General");
    assert_eq!(body["semester"], "N/A");
}

#[tokio::test]
async fn test_create_user_invalid_email_is_unprocessable() {
    let app = setup_test_app();

    let (status, body) = app
        .post(
            "/api/users",
            json!({
                "user_id": "U1",
                "name": "Asha Rao",
                "email": "not-an-email",
                "phone": "1"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_duplicate_user_is_conflict() {
    let app = setup_test_app();
    app.add_user("U1", "Asha", "MBA").await;

    let (status, body) = app
        .post(
            "/api/users",
            json!({
                "user_id": "U1",
                "name": "Someone Else",
                "email": "else@example.com",
                "phone": "2"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User ID already exists");
}

#[tokio::test]
async fn test_list_users_filters() {
    let app = setup_test_app();
    app.add_user("U1", "Asha Rao", "MBA").await;
    app.add_user("U2", "Ben Okafor", "Civil").await;
    app.add_user("U3", "Chen Wei", "MBA").await;

    let (status, body) = app.get("/api/users?department=MBA").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["U1", "U3"]);

    // matches the generated email u2@example.com
    let (_, body) = app.get("/api/users?search=U2@EXAMPLE").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Ben Okafor");
}

#[tokio::test]
async fn test_departments_are_distinct_and_sorted() {
    let app = setup_test_app();
    app.add_user("U1", "Asha", "MBA").await;
    app.add_user("U2", "Ben", "Civil").await;
    app.add_user("U3", "Chen", "MBA").await;

    let (status, body) = app.get("/api/users/departments").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["departments"], json!(["Civil", "MBA"]));
}
