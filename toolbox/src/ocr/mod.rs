//! OCR (Optical Character Recognition) Module
//!
//! Extracts text from uploaded images for `POST /api/ocr`.
//!
//! # Architecture
//!
//! - `TextRecognizer` trait defines the engine interface
//! - `TesseractRecognizer` implements it locally via leptess
//! - `OcrEngine` holds one recognizer for the whole process, loading it the
//!   first time text is requested
//!
//! # Configuration
//!
//! OCR behavior is controlled via `OcrConfig` (see `config.rs`):
//! - `languages`: Tesseract language string (default `chi_sim+eng`)
//! - `tessdata_path`: Directory holding `*.traineddata`, system default if unset
//! - `timeout_secs`: Upper bound for one recognition, model load included
//! - `max_image_dimension`: Larger uploads are downscaled before recognition
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrEngine::tesseract(&config.ocr);
//! let text = ocr.extract_text(&image_bytes).await?;
//! ```

mod preprocessing;
mod provider;
mod tesseract;

pub use preprocessing::preprocess_image;
pub use provider::{OcrEngine, RecognizerFactory};
pub use tesseract::{split_fragments, TesseractRecognizer};

use crate::error::Result;

/// A loaded text recognition model.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in a preprocessed PNG and return the text fragments in
    /// reading order.
    fn recognize(&self, image_png: &[u8]) -> Result<Vec<String>>;
}
