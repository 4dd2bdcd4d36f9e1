use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{assess_fine, get_fine_policy};

pub fn init_fines_router() -> Router<AppState> {
    Router::new()
        .route("/policy", get(get_fine_policy))
        .route("/assess", get(assess_fine))
}
