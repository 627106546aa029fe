use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;

use crate::error::{Result, ToolboxError};

/// One uploaded multipart part.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// All named parts of a `multipart/form-data` body, buffered in memory.
///
/// The first part wins when a name repeats. Unnamed parts are skipped.
#[derive(Debug, Default)]
pub struct UploadForm {
    parts: HashMap<String, Upload>,
}

impl UploadForm {
    /// Remove and return the part called `name`.
    pub fn take(&mut self, name: &str) -> Result<Upload> {
        self.parts.remove(name).ok_or_else(|| {
            ToolboxError::Validation(format!("Missing required '{name}' field"))
        })
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = ToolboxError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(map_multipart_rejection)?;

        let mut parts = HashMap::new();
        while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(map_multipart_error)?;

            parts.entry(name).or_insert(Upload {
                file_name,
                content_type,
                bytes,
            });
        }

        Ok(Self { parts })
    }
}

fn map_multipart_rejection(rejection: MultipartRejection) -> ToolboxError {
    ToolboxError::Validation(rejection.body_text())
}

fn map_multipart_error(err: MultipartError) -> ToolboxError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ToolboxError::PayloadTooLarge(err.body_text())
    } else {
        ToolboxError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}
