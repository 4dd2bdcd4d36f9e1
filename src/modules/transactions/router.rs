use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_transactions, issue_book, return_book};

pub fn init_transactions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_transactions))
        .route("/issue", post(issue_book))
        .route("/return", post(return_book))
}
