use crate::config::OcrConfig;
use crate::error::Result;
use crate::imaging;
use image::{DynamicImage, GenericImageView, GrayImage, Luma};

/// Prepare uploaded image bytes for the recognizer.
///
/// 1. Decodes any format the `image` crate understands
/// 2. Downscales images larger than `max_image_dimension` (aspect preserved)
/// 3. Converts to 8-bit grayscale, dropping any alpha channel
/// 4. Stretches the histogram to the full `0..=255` range
///
/// Returns PNG bytes ready for the OCR engine.
pub fn preprocess_image(bytes: &[u8], config: &OcrConfig) -> Result<Vec<u8>> {
    let img = imaging::decode(bytes)?;
    let img = resize_if_needed(img, config.max_image_dimension);
    let gray = enhance_grayscale_contrast(img.to_luma8());

    imaging::encode_png(&DynamicImage::ImageLuma8(gray))
}

/// Uses Lanczos3 for high-quality downscaling.
fn resize_if_needed(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_dim && height <= max_dim {
        return img;
    }

    let ratio = if width > height {
        max_dim as f32 / width as f32
    } else {
        max_dim as f32 / height as f32
    };

    let new_width = ((width as f32 * ratio) as u32).max(1);
    let new_height = ((height as f32 * ratio) as u32).max(1);

    img.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Map the darkest pixel to 0 and the lightest to 255, scaling linearly.
fn enhance_grayscale_contrast(gray: GrayImage) -> GrayImage {
    let (min_val, max_val) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    // Flat images carry nothing to stretch.
    if max_val <= min_val {
        return gray;
    }

    let range = (max_val - min_val) as f32;
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let pixel = gray.get_pixel(x, y);
        let normalized = (pixel[0] - min_val) as f32 / range;
        Luma([(normalized * 255.0).round() as u8])
    })
}
