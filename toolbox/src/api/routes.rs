use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    // `*` cannot be combined with credentials; echo the request's origin,
    // method and headers instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let api = Router::new()
        .route("/status", get(handlers::service_status))
        .route("/remove-bg", post(handlers::remove_background))
        .route("/pdf-to-word", post(handlers::pdf_to_word))
        .route("/ocr", post(handlers::recognize_text))
        .route("/magic-eraser", post(handlers::magic_eraser))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router());

    Router::new()
        .route("/", get(handlers::health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
