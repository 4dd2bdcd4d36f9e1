use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_dashboard_stats, get_genre_distribution, get_overdue_list, get_top_books,
    get_top_borrowers,
};

pub fn init_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(get_dashboard_stats))
}

pub fn init_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/top-borrowers", get(get_top_borrowers))
        .route("/top-books", get(get_top_books))
        .route("/genre-distribution", get(get_genre_distribution))
        .route("/overdue-list", get(get_overdue_list))
}
