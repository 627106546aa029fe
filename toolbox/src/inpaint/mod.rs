//! Magic eraser: remove the masked region of an image by inpainting it.

mod telea;

pub use telea::inpaint;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage};

use crate::error::Result;
use crate::imaging;

/// Bring `mask` to `width`x`height` with nearest-neighbour sampling, so a
/// binary mask stays binary after scaling.
pub fn fit_mask(mask: GrayImage, width: u32, height: u32) -> GrayImage {
    if mask.dimensions() == (width, height) {
        return mask;
    }
    imageops::resize(&mask, width, height, FilterType::Nearest)
}

/// Decode `image_bytes` and `mask_bytes`, inpaint the nonzero mask region and
/// return the result as PNG bytes with the image's original dimensions.
pub fn erase(image_bytes: &[u8], mask_bytes: &[u8], radius: u32) -> Result<Vec<u8>> {
    let image = imaging::decode(image_bytes)?.to_rgb8();
    let mask = imaging::decode(mask_bytes)?.to_luma8();

    let (width, height) = image.dimensions();
    if mask.dimensions() != (width, height) {
        tracing::debug!(
            mask_width = mask.width(),
            mask_height = mask.height(),
            width,
            height,
            "Resizing mask to image dimensions"
        );
    }
    let mask = fit_mask(mask, width, height);

    let result = inpaint(&image, &mask, radius)?;
    let result = DynamicImage::ImageRgb8(result);
    debug_assert_eq!(result.dimensions(), (width, height));

    imaging::encode_png(&result)
}
