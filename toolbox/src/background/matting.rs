//! U²-Net style salient-object segmentation via ONNX Runtime.

use std::sync::Mutex;

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView, GrayImage, RgbaImage};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tracing::{debug, info};

use crate::config::BackgroundConfig;
use crate::error::ToolboxError;

use super::preprocessing::{apply_alpha, saliency_to_mask, to_input_tensor};
use super::ForegroundExtractor;

pub struct OnnxMatting {
    /// ONNX Runtime session (`run` needs exclusive access)
    session: Mutex<Session>,
    input_name: String,
    input_size: u32,
}

impl std::fmt::Debug for OnnxMatting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxMatting")
            .field("input_name", &self.input_name)
            .field("input_size", &self.input_size)
            .finish_non_exhaustive()
    }
}

impl OnnxMatting {
    /// Load the segmentation model named by `config.model_path`.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new(config: &BackgroundConfig) -> Result<Self> {
        let model_path = config.model_path.as_path();
        if !model_path.exists() {
            anyhow::bail!("Matting model not found: {}", model_path.display());
        }

        info!("Loading matting model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("Failed to load matting model from {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input.1".to_string());

        debug!(input = %input_name, size = config.input_size, "Matting model loaded");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            input_size: config.input_size,
        })
    }

    fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        let input = to_input_tensor(image, self.input_size);
        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Matting session lock poisoned"))?;
        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Matting inference failed")?;

        // The first output is the fused saliency map, shape [1, 1, H, W].
        let saliency = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;
        let shape = saliency.shape().to_vec();
        if shape.len() < 2 {
            anyhow::bail!("Unexpected matting output shape: {:?}", shape);
        }
        let map_height = shape[shape.len() - 2];
        let map_width = shape[shape.len() - 1];
        let values: Vec<f32> = saliency.iter().copied().take(map_width * map_height).collect();
        if values.len() < map_width * map_height {
            anyhow::bail!("Matting output is smaller than its shape {:?}", shape);
        }

        Ok(saliency_to_mask(
            &values,
            map_width as u32,
            map_height as u32,
            width,
            height,
        ))
    }
}

impl ForegroundExtractor for OnnxMatting {
    fn extract(&self, image: &DynamicImage) -> crate::error::Result<RgbaImage> {
        let mask = self
            .predict_mask(image)
            .map_err(|e| ToolboxError::BackgroundRemoval(format!("{e:#}")))?;
        Ok(apply_alpha(image, &mask))
    }
}
