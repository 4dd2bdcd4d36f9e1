use axum::Json;
use shelfwise_models::MessageResponse;

pub const SERVICE_BANNER: &str = "Digital Library Access Tracker API";

#[utoipa::path(
    get,
    path = "/api/",
    responses(
        (status = 200, description = "Service banner", body = MessageResponse)
    ),
    tag = "Root"
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(SERVICE_BANNER))
}
