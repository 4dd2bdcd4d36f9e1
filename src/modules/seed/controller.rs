use axum::{Json, extract::State};
use shelfwise_core::AppError;
use shelfwise_models::InitDataResponse;

use crate::state::AppState;

use super::service::Seeder;

#[utoipa::path(
    post,
    path = "/api/init-data",
    responses(
        (status = 200, description = "Import finished. Collections that already held data are not touched", body = InitDataResponse),
        (status = 500, description = "Storage failure", body = shelfwise_core::errors::ErrorResponse)
    ),
    tag = "Seed"
)]
pub async fn init_data(State(state): State<AppState>) -> Result<Json<InitDataResponse>, AppError> {
    let imported = Seeder::from_state(&state).run().await?;

    Ok(Json(InitDataResponse {
        message: "Data import completed".to_string(),
        imported,
    }))
}
