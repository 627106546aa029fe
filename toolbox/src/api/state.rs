use std::sync::Arc;

use crate::background::BackgroundProvider;
use crate::config::Config;
use crate::convert::{DocumentConverter, PdfToDocx};
use crate::ocr::OcrEngine;
use crate::scratch::ScratchDir;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub background: BackgroundProvider,
    /// Loaded on the first OCR request.
    pub ocr: Arc<OcrEngine>,
    pub converter: Arc<dyn DocumentConverter>,
    pub scratch: ScratchDir,
}

impl AppState {
    /// Build the production providers from `config`.
    ///
    /// A missing background model degrades that one capability instead of
    /// failing startup.
    pub fn new(config: Config) -> Self {
        let background = BackgroundProvider::new(&config.background);
        let ocr = Arc::new(OcrEngine::tesseract(&config.ocr));

        Self::with_providers(config, background, ocr, Arc::new(PdfToDocx))
    }

    pub fn with_providers(
        config: Config,
        background: BackgroundProvider,
        ocr: Arc<OcrEngine>,
        converter: Arc<dyn DocumentConverter>,
    ) -> Self {
        let scratch = ScratchDir::new(config.scratch.dir.clone());

        Self {
            config: Arc::new(config),
            background,
            ocr,
            converter,
            scratch,
        }
    }
}
