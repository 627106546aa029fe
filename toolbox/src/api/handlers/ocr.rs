use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::upload::UploadForm;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrResponse {
    /// Recognized lines joined with `\n`.
    pub text: String,
}

/// `POST /api/ocr`
///
/// Any recognition failure is answered with a fixed message; the detail only
/// reaches the server log.
#[utoipa::path(
    post,
    path = "/api/ocr",
    tag = "text",
    request_body(content = crate::api::openapi::FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Recognized text", body = OcrResponse),
        (status = 400, description = "Missing `file` field", body = crate::error::ErrorBody),
        (status = 500, description = "Recognition failed. The fixed fallback message is returned under `error`, not `text`.", body = crate::error::ErrorBody),
    )
)]
pub async fn recognize_text(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> Result<Json<OcrResponse>> {
    let upload = form.take("file")?;
    info!(
        file = upload.file_name.as_deref().unwrap_or("-"),
        content_type = upload.content_type.as_deref().unwrap_or("-"),
        bytes = upload.bytes.len(),
        "Running OCR"
    );

    let text = state.ocr.extract_text(&upload.bytes).await?;
    Ok(Json(OcrResponse { text }))
}
