#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use shelfwise::modules::seed::StaticDatasetSource;
use shelfwise::router::init_router;
use shelfwise::state::AppState;
use shelfwise_core::ManualClock;
use shelfwise_db::{InMemoryLibraryStore, LibraryStore};
use shelfwise_fines::FinePolicy;
use shelfwise_models::{Book, User};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryLibraryStore>,
    pub clock: Arc<ManualClock>,
}

/// 2024-01-01 09:00 UTC, the instant every test app starts at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_datasets(StaticDatasetSource::new())
}

pub fn setup_test_app_with_datasets(datasets: StaticDatasetSource) -> TestApp {
    let store = Arc::new(InMemoryLibraryStore::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let state = AppState::new(
        store.clone(),
        clock.clone(),
        FinePolicy::default(),
        Arc::new(datasets),
    );

    TestApp {
        router: init_router(state),
        store,
        clock,
    }
}

impl TestApp {
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn add_book(&self, book_id: &str, title: &str, genre: &str, copies: i32) {
        let book = Book::new(book_id, title, "Test Author", genre, "A1", copies, copies).unwrap();
        self.store.insert_book(&book).await.unwrap();
    }

    pub async fn add_user(&self, user_id: &str, name: &str, department: &str) {
        let email = format!("{}@example.com", user_id.to_lowercase());
        let user = User::new(user_id, name, email, "5550100", department, "3").unwrap();
        self.store.insert_user(&user).await.unwrap();
    }

    pub async fn available_copies(&self, book_id: &str) -> i32 {
        self.store
            .get_book(book_id)
            .await
            .unwrap()
            .unwrap()
            .available_copies
    }

    /// Issues a loan over HTTP and returns its transaction id.
    pub async fn issue(&self, book_id: &str, user_id: &str, borrow_days: u32) -> String {
        let (status, body) = self
            .post(
                "/api/transactions/issue",
                serde_json::json!({
                    "book_id": book_id,
                    "user_id": user_id,
                    "borrow_days": borrow_days
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "issue failed: {body}");
        body["transaction_id"].as_str().unwrap().to_string()
    }
}
