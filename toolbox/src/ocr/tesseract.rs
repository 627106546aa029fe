use std::sync::Mutex;

use leptess::LepTess;
use tracing::info;

use crate::config::OcrConfig;
use crate::error::{Result, ToolboxError};

use super::TextRecognizer;

/// Local Tesseract engine. The underlying API is not reentrant, so calls are
/// serialized through a mutex.
pub struct TesseractRecognizer {
    engine: Mutex<LepTess>,
}

impl TesseractRecognizer {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let engine = LepTess::new(config.tessdata_path.as_deref(), &config.languages)
            .map_err(|e| {
                ToolboxError::Recognition(format!(
                    "Tesseract could not load languages '{}': {e}",
                    config.languages
                ))
            })?;
        info!(languages = %config.languages, "Tesseract OCR initialized");

        Ok(Self {
            engine: Mutex::new(engine),
        })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image_png: &[u8]) -> Result<Vec<String>> {
        let mut lt = self
            .engine
            .lock()
            .map_err(|_| ToolboxError::Recognition("OCR engine lock poisoned".to_string()))?;

        lt.set_image_from_mem(image_png)
            .map_err(|e| ToolboxError::Recognition(format!("Failed to set image: {e}")))?;
        let text = lt
            .get_utf8_text()
            .map_err(|e| ToolboxError::Recognition(format!("Failed to extract text: {e}")))?;

        Ok(split_fragments(&text))
    }
}

/// Split raw engine output into non-empty, trimmed lines.
pub fn split_fragments(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
