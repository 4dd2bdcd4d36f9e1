use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use shelfwise_core::AppError;
use shelfwise_models::{DashboardStats, GenreCount, LimitParams, OverdueEntry, TopBook, TopBorrower};

use crate::state::AppState;

use super::service::AnalyticsService;

fn limit_from(params: Result<Query<LimitParams>, QueryRejection>) -> Result<usize, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(params.limit())
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Library-wide counters", body = DashboardStats)
    ),
    tag = "Analytics"
)]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = AnalyticsService::dashboard_stats(state.store.as_ref(), state.clock.as_ref()).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/analytics/top-borrowers",
    params(LimitParams),
    responses(
        (status = 200, description = "Patrons with the most loans", body = Vec<TopBorrower>),
        (status = 400, description = "Invalid query parameters", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_top_borrowers(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Vec<TopBorrower>>, AppError> {
    let limit = limit_from(params)?;
    Ok(Json(AnalyticsService::top_borrowers(state.store.as_ref(), limit).await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/top-books",
    params(LimitParams),
    responses(
        (status = 200, description = "Most borrowed books", body = Vec<TopBook>),
        (status = 400, description = "Invalid query parameters", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_top_books(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Vec<TopBook>>, AppError> {
    let limit = limit_from(params)?;
    Ok(Json(AnalyticsService::top_books(state.store.as_ref(), limit).await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/genre-distribution",
    responses(
        (status = 200, description = "Loan count per genre", body = Vec<GenreCount>)
    ),
    tag = "Analytics"
)]
pub async fn get_genre_distribution(
    State(state): State<AppState>,
) -> Result<Json<Vec<GenreCount>>, AppError> {
    Ok(Json(AnalyticsService::genre_distribution(state.store.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/overdue-list",
    responses(
        (status = 200, description = "Open loans past due, longest overdue first", body = Vec<OverdueEntry>)
    ),
    tag = "Analytics"
)]
pub async fn get_overdue_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<OverdueEntry>>, AppError> {
    Ok(Json(state.overdue().run().await?))
}
