use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use shelfwise_core::AppError;
use shelfwise_fines::FinePolicy;
use shelfwise_models::{FineAssessment, FineAssessmentParams};

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/fines/policy",
    responses(
        (status = 200, description = "Grace period and tier table used to assess late fees", body = FinePolicy)
    ),
    tag = "Fines"
)]
pub async fn get_fine_policy(State(state): State<AppState>) -> Json<FinePolicy> {
    Json(state.fine_policy.as_ref().clone())
}

#[utoipa::path(
    get,
    path = "/api/fines/assess",
    params(FineAssessmentParams),
    responses(
        (status = 200, description = "Fine under the active policy", body = FineAssessment),
        (status = 400, description = "Missing or unparseable date", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Fines"
)]
pub async fn assess_fine(
    State(state): State<AppState>,
    params: Result<Query<FineAssessmentParams>, QueryRejection>,
) -> Result<Json<FineAssessment>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let fine_amount = state.fine_policy.assess_str(
        &params.due_date,
        params.return_date.as_deref(),
        state.clock.as_ref(),
    )?;

    Ok(Json(FineAssessment {
        due_date: params.due_date,
        return_date: params.return_date,
        fine_amount,
    }))
}
