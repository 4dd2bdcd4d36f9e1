use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::analytics::{init_analytics_router, init_dashboard_router};
use crate::modules::books::init_books_router;
use crate::modules::fines::init_fines_router;
use crate::modules::reports::init_reports_router;
use crate::modules::root::root;
use crate::modules::seed::init_seed_router;
use crate::modules::transactions::init_transactions_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::get;
use axum::{Router, middleware};
use shelfwise_config::CorsConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            HeaderName::from_static(crate::logging::REQUEST_ID_HEADER),
        ]);

    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/api/", get(root))
        .nest(
            "/api",
            Router::new()
                .route("/", get(root))
                .nest("/books", init_books_router())
                .nest("/users", init_users_router())
                .nest("/transactions", init_transactions_router())
                .nest("/dashboard", init_dashboard_router())
                .nest("/analytics", init_analytics_router())
                .nest("/fines", init_fines_router())
                .nest("/reports", init_reports_router())
                .merge(init_seed_router()),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
