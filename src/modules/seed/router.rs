use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::init_data;

pub fn init_seed_router() -> Router<AppState> {
    Router::new().route("/init-data", post(init_data))
}
