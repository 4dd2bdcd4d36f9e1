use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use shelfwise_core::AppError;
use shelfwise_models::{Book, BookFilterParams, CreateBookDto, GenresResponse, UpdateBookDto};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::BookService;

#[utoipa::path(
    get,
    path = "/api/books",
    params(BookFilterParams),
    responses(
        (status = 200, description = "Books matching the filters, ordered by title", body = Vec<Book>),
        (status = 400, description = "Invalid query parameters", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Books"
)]
pub async fn get_books(
    State(state): State<AppState>,
    filters: Result<Query<BookFilterParams>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let books = BookService::list_books(state.store.as_ref(), filters).await?;
    Ok(Json(books))
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookDto,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 409, description = "Book ID already exists", body = shelfwise_core::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Books"
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateBookDto>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = BookService::create_book(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = UpdateBookDto,
    responses(
        (status = 200, description = "Updated book", body = Book),
        (status = 404, description = "Book not found", body = shelfwise_core::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Books"
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateBookDto>,
) -> Result<Json<Book>, AppError> {
    let book = BookService::update_book(state.store.as_ref(), &book_id, dto).await?;
    Ok(Json(book))
}

#[utoipa::path(
    get,
    path = "/api/books/genres",
    responses(
        (status = 200, description = "Distinct genres, sorted", body = GenresResponse)
    ),
    tag = "Books"
)]
pub async fn get_genres(State(state): State<AppState>) -> Result<Json<GenresResponse>, AppError> {
    let genres = BookService::genres(state.store.as_ref()).await?;
    Ok(Json(GenresResponse { genres }))
}
