use std::any::Any;
use std::fs::File;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use docx_rs::{BreakType, Docx, Paragraph, Run};
use tracing::debug;

use crate::error::{Result, ToolboxError};

use super::DocumentConverter;

/// PDF to DOCX: one paragraph per extracted text line, one page break per PDF
/// page boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfToDocx;

impl DocumentConverter for PdfToDocx {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let pages = extract_pages(input)?;

        if pages.is_empty() {
            return Err(ToolboxError::Conversion(
                "PDF contains no pages".to_string(),
            ));
        }
        debug!(pages = pages.len(), "Extracted PDF text");

        let file = File::create(output)?;
        build_docx(&pages)
            .build()
            .pack(file)
            .map_err(|e| ToolboxError::Conversion(format!("Failed to write DOCX: {e}")))?;

        Ok(())
    }
}

/// Page texts of the PDF at `input`.
///
/// pdf-extract panics on some malformed documents instead of returning an
/// error; those panics are caught here and reported as conversion failures.
fn extract_pages(input: &Path) -> Result<Vec<String>> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(input)
    })) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ToolboxError::Conversion(format!(
            "PDF extraction failed: {e}"
        ))),
        Err(payload) => Err(ToolboxError::Conversion(format!(
            "PDF could not be parsed: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("malformed document")
}

/// Lay out extracted page texts as a Word document.
pub fn build_docx(pages: &[String]) -> Docx {
    let mut docx = Docx::new();

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            docx = docx.add_paragraph(
                Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            );
        }

        for line in page.lines().map(str::trim_end) {
            // Keep blank lines as empty paragraphs so vertical spacing survives.
            let paragraph = if line.trim().is_empty() {
                Paragraph::new()
            } else {
                Paragraph::new().add_run(Run::new().add_text(line))
            };
            docx = docx.add_paragraph(paragraph);
        }
    }

    docx
}
