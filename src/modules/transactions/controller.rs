use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use shelfwise_core::AppError;
use shelfwise_models::{
    IssueBookDto, IssueResponse, ReturnBookDto, ReturnResponse, Transaction,
    TransactionFilterParams,
};

use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(TransactionFilterParams),
    responses(
        (status = 200, description = "Loans, newest first. Open loans report the fine accrued so far", body = Vec<Transaction>),
        (status = 400, description = "Invalid query parameters", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Transactions"
)]
pub async fn get_transactions(
    State(state): State<AppState>,
    filters: Result<Query<TransactionFilterParams>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let transactions = state.transactions().list(filters).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    post,
    path = "/api/transactions/issue",
    request_body = IssueBookDto,
    responses(
        (status = 201, description = "Book issued", body = IssueResponse),
        (status = 404, description = "Book or user not found", body = shelfwise_core::errors::ErrorResponse),
        (status = 409, description = "No copies available", body = shelfwise_core::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Transactions"
)]
pub async fn issue_book(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<IssueBookDto>,
) -> Result<(StatusCode, Json<IssueResponse>), AppError> {
    let loan = state
        .transactions()
        .issue(&dto.book_id, &dto.user_id, dto.borrow_days)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            message: "Book issued successfully".to_string(),
            transaction_id: loan.transaction_id,
            due_date: loan.due_date,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/transactions/return",
    request_body = ReturnBookDto,
    responses(
        (status = 200, description = "Book returned, fine fixed", body = ReturnResponse),
        (status = 404, description = "Transaction not found", body = shelfwise_core::errors::ErrorResponse),
        (status = 409, description = "Book already returned", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Transactions"
)]
pub async fn return_book(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ReturnBookDto>,
) -> Result<Json<ReturnResponse>, AppError> {
    let fine_amount = state.transactions().return_book(&dto.transaction_id).await?;

    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
        fine_amount,
    }))
}
