use axum::extract::State;
use axum::response::Response;
use tracing::info;

use crate::api::state::AppState;
use crate::api::upload::UploadForm;
use crate::error::Result;

use super::png_response;

/// `POST /api/remove-bg`
#[utoipa::path(
    post,
    path = "/api/remove-bg",
    tag = "images",
    request_body(content = crate::api::openapi::FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cut-out as PNG with an alpha channel", content_type = "image/png", body = Vec<u8>),
        (status = 400, description = "Missing or undecodable image", body = crate::error::ErrorBody),
        (status = 503, description = "Matting model not loaded", body = crate::error::ErrorBody),
    )
)]
pub async fn remove_background(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> Result<Response> {
    let upload = form.take("file")?;
    info!(
        file = upload.file_name.as_deref().unwrap_or("-"),
        content_type = upload.content_type.as_deref().unwrap_or("-"),
        bytes = upload.bytes.len(),
        "Removing background"
    );

    let png = state
        .background
        .remove_background(upload.bytes.to_vec())
        .await?;

    Ok(png_response(png))
}
