use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use shelfwise_core::AppError;
use shelfwise_models::{CreateUserDto, DepartmentsResponse, User, UserFilterParams};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Patrons matching the filters, ordered by name", body = Vec<User>),
        (status = 400, description = "Invalid query parameters", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn get_users(
    State(state): State<AppState>,
    filters: Result<Query<UserFilterParams>, QueryRejection>,
) -> Result<Json<Vec<User>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let users = UserService::list_users(state.store.as_ref(), filters).await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Patron created", body = User),
        (status = 409, description = "User ID already exists", body = shelfwise_core::errors::ErrorResponse),
        (status = 422, description = "Validation failed", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(state.store.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/departments",
    responses(
        (status = 200, description = "Distinct departments, sorted", body = DepartmentsResponse)
    ),
    tag = "Users"
)]
pub async fn get_departments(
    State(state): State<AppState>,
) -> Result<Json<DepartmentsResponse>, AppError> {
    let departments = UserService::departments(state.store.as_ref()).await?;
    Ok(Json(DepartmentsResponse { departments }))
}
