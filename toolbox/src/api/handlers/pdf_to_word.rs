use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::api::state::AppState;
use crate::api::upload::UploadForm;
use crate::convert::{is_pdf, DOCX_MIME_TYPE};
use crate::error::{Result, ToolboxError};
use crate::scratch::ScratchFile;

const DEFAULT_UPLOAD_NAME: &str = "document.pdf";

/// `POST /api/pdf-to-word`
///
/// The upload and the converted document only live in the scratch directory
/// for the duration of the request.
#[utoipa::path(
    post,
    path = "/api/pdf-to-word",
    tag = "documents",
    request_body(content = crate::api::openapi::FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Converted Word document", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document", body = Vec<u8>),
        (status = 400, description = "Missing `file` field or not a PDF", body = crate::error::ErrorBody),
        (status = 500, description = "Conversion failed", body = crate::error::ErrorBody),
    )
)]
pub async fn pdf_to_word(State(state): State<AppState>, mut form: UploadForm) -> Result<Response> {
    let upload = form.take("file")?;
    if !is_pdf(&upload.bytes) {
        return Err(ToolboxError::Validation(
            "Uploaded file is not a PDF".to_string(),
        ));
    }

    let file_name = upload
        .file_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_UPLOAD_NAME);
    info!(
        file = file_name,
        content_type = upload.content_type.as_deref().unwrap_or("-"),
        bytes = upload.bytes.len(),
        "Converting PDF to Word"
    );

    state.scratch.ensure().await?;
    let paths = state.scratch.reserve(file_name, "docx");

    let input = ScratchFile::write(paths.input.clone(), &upload.bytes).await?;
    let output = ScratchFile::claim(paths.output.clone());

    // The guards drop with the blocking task, not with the request future.
    let converter = Arc::clone(&state.converter);
    let document = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        converter.convert(input.path(), output.path())?;
        Ok(std::fs::read(output.path())?)
    })
    .await
    .map_err(|e| ToolboxError::Internal(format!("Conversion task panicked: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&paths.download_name),
            ),
        ],
        document,
    )
        .into_response())
}

/// `attachment` disposition for `file_name`. Non-ASCII names get an ASCII
/// fallback plus an RFC 5987 `filename*` parameter.
fn content_disposition(file_name: &str) -> String {
    if file_name.is_ascii() {
        return format!("attachment; filename=\"{file_name}\"");
    }

    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_disposition() {
        assert_eq!(
            content_disposition("report.docx"),
            "attachment; filename=\"report.docx\""
        );
    }

    #[test]
    fn test_non_ascii_disposition_is_encoded() {
        let value = content_disposition("报告.docx");
        assert_eq!(
            value,
            "attachment; filename=\"__.docx\"; filename*=UTF-8''%E6%8A%A5%E5%91%8A.docx"
        );
        assert!(value.is_ascii());
    }
}
