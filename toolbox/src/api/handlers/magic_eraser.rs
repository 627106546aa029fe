use axum::extract::State;
use axum::response::Response;
use tracing::info;

use crate::api::state::AppState;
use crate::api::upload::UploadForm;
use crate::error::{Result, ToolboxError};
use crate::inpaint;

use super::png_response;

/// `POST /api/magic-eraser`
#[utoipa::path(
    post,
    path = "/api/magic-eraser",
    tag = "images",
    request_body(content = crate::api::openapi::EraserUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Inpainted image as PNG", content_type = "image/png", body = Vec<u8>),
        (status = 400, description = "Missing or undecodable image or mask", body = crate::error::ErrorBody),
    )
)]
pub async fn magic_eraser(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> Result<Response> {
    let image = form.take("image")?;
    let mask = form.take("mask")?;
    let radius = state.config.eraser.inpaint_radius;
    info!(
        image_bytes = image.bytes.len(),
        mask_bytes = mask.bytes.len(),
        radius,
        "Erasing masked region"
    );

    let png = tokio::task::spawn_blocking(move || inpaint::erase(&image.bytes, &mask.bytes, radius))
        .await
        .map_err(|e| ToolboxError::Internal(format!("Inpainting task panicked: {e}")))??;

    Ok(png_response(png))
}
