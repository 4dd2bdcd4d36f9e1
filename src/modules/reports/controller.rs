use axum::{Json, extract::State};
use shelfwise_core::AppError;
use shelfwise_models::ReportResponse;

use crate::state::AppState;

use super::service::ReportService;

#[utoipa::path(
    post,
    path = "/api/reports/generate",
    responses(
        (status = 200, description = "Base64 encoded .xlsx report", body = ReportResponse),
        (status = 500, description = "Report could not be built", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Reports"
)]
pub async fn generate_report(State(state): State<AppState>) -> Result<Json<ReportResponse>, AppError> {
    Ok(Json(ReportService::generate(&state).await?))
}
