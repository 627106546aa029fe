//! Background removal for `POST /api/remove-bg`.
//!
//! A `ForegroundExtractor` turns a decoded image into an RGBA cut-out whose
//! alpha channel separates subject from background. `BackgroundProvider`
//! wraps the configured extractor, degrading to an unavailable backend when
//! the model cannot be loaded so the rest of the service keeps running.

mod matting;
mod preprocessing;

pub use matting::OnnxMatting;

use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use tracing::{info, warn};

use crate::config::BackgroundConfig;
use crate::error::{Result, ToolboxError};
use crate::imaging;

pub trait ForegroundExtractor: Send + Sync {
    /// Produce an RGBA image of the same size as `image`.
    fn extract(&self, image: &DynamicImage) -> Result<RgbaImage>;
}

#[derive(Clone)]
enum BackgroundBackend {
    Local {
        extractor: Arc<dyn ForegroundExtractor>,
    },
    Unavailable {
        reason: String,
    },
}

#[derive(Clone)]
pub struct BackgroundProvider {
    backend: BackgroundBackend,
}

impl BackgroundProvider {
    pub fn new(config: &BackgroundConfig) -> Self {
        match OnnxMatting::new(config) {
            Ok(matting) => {
                info!("Background removal model initialized");
                Self::with_extractor(Arc::new(matting))
            }
            Err(e) => {
                let reason = format!("Background removal unavailable: {e:#}");
                warn!("{}", reason);
                Self::unavailable(reason)
            }
        }
    }

    pub fn with_extractor(extractor: Arc<dyn ForegroundExtractor>) -> Self {
        Self {
            backend: BackgroundBackend::Local { extractor },
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: BackgroundBackend::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, BackgroundBackend::Unavailable { .. })
    }

    /// Decode `image_bytes`, cut out the foreground and encode it as PNG.
    pub async fn remove_background(&self, image_bytes: Vec<u8>) -> Result<Vec<u8>> {
        let extractor = match &self.backend {
            BackgroundBackend::Local { extractor } => Arc::clone(extractor),
            BackgroundBackend::Unavailable { reason } => {
                return Err(ToolboxError::Unavailable(reason.clone()))
            }
        };

        tokio::task::spawn_blocking(move || {
            let image = imaging::decode(&image_bytes)?;
            let cutout = extractor.extract(&image)?;
            imaging::encode_png(&DynamicImage::ImageRgba8(cutout))
        })
        .await
        .map_err(|e| ToolboxError::Internal(format!("Background removal task panicked: {e}")))?
    }
}
