use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::generate_report;

pub fn init_reports_router() -> Router<AppState> {
    Router::new().route("/generate", post(generate_report))
}
