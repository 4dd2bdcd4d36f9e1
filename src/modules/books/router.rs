use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{create_book, get_books, get_genres, update_book};

pub fn init_books_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_books).post(create_book))
        .route("/genres", get(get_genres))
        .route("/{id}", put(update_book))
}
