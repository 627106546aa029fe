use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Shown to OCR clients instead of the underlying failure.
pub const OCR_FALLBACK_MESSAGE: &str = "识别失败，请检查是否安装了OCR语言模型";

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Background removal error: {0}")]
    BackgroundRemoval(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("OCR error: {0}")]
    Recognition(String),

    #[error("Inpainting error: {0}")]
    Inpainting(String),

    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ToolboxError {
    pub fn status(&self) -> StatusCode {
        match self {
            ToolboxError::Validation(_) | ToolboxError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ToolboxError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ToolboxError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ToolboxError::BackgroundRemoval(_)
            | ToolboxError::Conversion(_)
            | ToolboxError::Recognition(_)
            | ToolboxError::Inpainting(_)
            | ToolboxError::Io(_)
            | ToolboxError::Image(_)
            | ToolboxError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    pub fn client_message(&self) -> String {
        match self {
            ToolboxError::Validation(msg)
            | ToolboxError::PayloadTooLarge(msg)
            | ToolboxError::InvalidImage(msg)
            | ToolboxError::BackgroundRemoval(msg)
            | ToolboxError::Conversion(msg)
            | ToolboxError::Inpainting(msg)
            | ToolboxError::Unavailable(msg)
            | ToolboxError::Internal(msg) => msg.clone(),
            ToolboxError::Recognition(_) => OCR_FALLBACK_MESSAGE.to_string(),
            ToolboxError::Io(e) => e.to_string(),
            ToolboxError::Image(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ToolboxError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorBody {
            error: self.client_message(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ToolboxError>;
