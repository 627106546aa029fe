use axum::Json;
use utoipa::{OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};

use super::handlers;

/// Multipart body with a single `file` part.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct FileUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Multipart body for the magic eraser.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct EraserUpload {
    /// Color image to edit.
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
    /// Single-channel mask; nonzero pixels are erased.
    #[schema(value_type = String, format = Binary)]
    mask: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AI Toolbox API",
        version = "1.0.0",
        description = "Background removal, PDF to Word conversion, OCR and magic eraser.",
    ),
    paths(
        handlers::health::health_check,
        handlers::status::service_status,
        handlers::remove_bg::remove_background,
        handlers::pdf_to_word::pdf_to_word,
        handlers::ocr::recognize_text,
        handlers::magic_eraser::magic_eraser,
    ),
    components(schemas(
        crate::error::ErrorBody,
        FileUpload,
        EraserUpload,
        handlers::health::HealthResponse,
        handlers::status::ServiceStatus,
        handlers::status::BackgroundStatus,
        handlers::status::OcrStatus,
        handlers::ocr::OcrResponse,
    )),
    tags(
        (name = "health", description = "Liveness and capability status"),
        (name = "images", description = "Background removal and object erasing"),
        (name = "documents", description = "PDF to Word conversion"),
        (name = "text", description = "Optical character recognition"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
