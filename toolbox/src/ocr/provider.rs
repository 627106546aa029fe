use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, ToolboxError};

use super::preprocessing::preprocess_image;
use super::tesseract::TesseractRecognizer;
use super::TextRecognizer;

/// Builds a recognizer. Runs on a blocking thread the first time OCR is used.
pub type RecognizerFactory = Arc<dyn Fn() -> Result<Arc<dyn TextRecognizer>> + Send + Sync>;

/// Process-wide OCR engine holder.
///
/// The recognizer is loaded on the first request and kept until the process
/// exits. Concurrent first requests wait on the same initialization instead of
/// loading the model twice; a failed load is not cached, so a later request
/// retries.
pub struct OcrEngine {
    recognizer: OnceCell<Arc<dyn TextRecognizer>>,
    factory: RecognizerFactory,
    config: OcrConfig,
}

impl OcrEngine {
    pub fn tesseract(config: &OcrConfig) -> Self {
        let tess_config = config.clone();
        let factory: RecognizerFactory = Arc::new(move || {
            let recognizer = TesseractRecognizer::new(&tess_config)?;
            Ok(Arc::new(recognizer) as Arc<dyn TextRecognizer>)
        });
        Self::with_factory(config, factory)
    }

    pub fn with_factory(config: &OcrConfig, factory: RecognizerFactory) -> Self {
        Self {
            recognizer: OnceCell::new(),
            factory,
            config: config.clone(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.recognizer.initialized()
    }

    pub fn languages(&self) -> &str {
        &self.config.languages
    }

    /// Recognize text in an uploaded image and join the fragments with `\n`.
    ///
    /// Every failure, including an undecodable upload, is reported as
    /// [`ToolboxError::Recognition`].
    pub async fn extract_text(&self, image_bytes: &[u8]) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        match tokio::time::timeout(timeout_duration, self.extract_internal(image_bytes)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e @ ToolboxError::Recognition(_))) => Err(e),
            Ok(Err(other)) => Err(ToolboxError::Recognition(other.to_string())),
            Err(_) => Err(ToolboxError::Recognition(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn extract_internal(&self, image_bytes: &[u8]) -> Result<String> {
        let recognizer = self.recognizer().await?;
        let config = self.config.clone();
        let image_bytes = image_bytes.to_vec();

        // Decode, resize and recognition all stay off the async workers.
        let fragments = tokio::task::spawn_blocking(move || {
            let processed = preprocess_image(&image_bytes, &config)?;
            recognizer.recognize(&processed)
        })
        .await
        .map_err(|e| ToolboxError::Recognition(format!("OCR task panicked: {e}")))??;

        Ok(fragments.join("\n"))
    }

    async fn recognizer(&self) -> Result<Arc<dyn TextRecognizer>> {
        self.recognizer
            .get_or_try_init(|| async {
                info!(languages = %self.config.languages, "Loading OCR engine on first use");
                let factory = Arc::clone(&self.factory);
                let loaded = tokio::task::spawn_blocking(move || factory())
                    .await
                    .map_err(|e| ToolboxError::Recognition(format!("OCR load panicked: {e}")))?;
                if let Err(ref e) = loaded {
                    warn!(error = %e, "OCR engine failed to load");
                }
                loaded
            })
            .await
            .cloned()
    }
}
