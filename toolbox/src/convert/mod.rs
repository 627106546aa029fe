//! Document conversion for `POST /api/pdf-to-word`.

mod pdf;

pub use pdf::{build_docx, PdfToDocx};

use std::path::Path;

use crate::error::Result;

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Converts a document on disk into an editable document at `output`.
pub trait DocumentConverter: Send + Sync {
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Sniff the upload's magic bytes.
pub fn is_pdf(bytes: &[u8]) -> bool {
    infer::get(bytes).is_some_and(|kind| kind.mime_type() == "application/pdf")
}
