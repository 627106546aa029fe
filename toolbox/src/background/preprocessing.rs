//! Tensor preparation and alpha matte assembly for salient-object models.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use ndarray::Array4;

/// Mean values for normalization (ImageNet)
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Std values for normalization (ImageNet)
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Resize to `size`x`size` and build a normalized NCHW tensor `[1, 3, S, S]`.
pub fn to_input_tensor(image: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = image.resize_exact(size, size, FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let side = size as usize;
    let mut tensor = Array4::zeros((1, 3, side, side));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let normalized = (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
            tensor[[0, c, y as usize, x as usize]] = normalized;
        }
    }

    tensor
}

/// Turn a raw `map_width`x`map_height` saliency map into an 8-bit matte of
/// `width`x`height`.
///
/// Values are min-max normalized first. A flat map carries no foreground
/// information and yields a fully opaque matte.
pub fn saliency_to_mask(
    values: &[f32],
    map_width: u32,
    map_height: u32,
    width: u32,
    height: u32,
) -> GrayImage {
    let (lo, hi) = values
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = hi - lo;

    let matte = GrayImage::from_fn(map_width, map_height, |x, y| {
        let v = values[(y * map_width + x) as usize];
        if range > f32::EPSILON {
            Luma([(((v - lo) / range) * 255.0).round().clamp(0.0, 255.0) as u8])
        } else {
            Luma([255])
        }
    });

    if (map_width, map_height) == (width, height) {
        matte
    } else {
        image::imageops::resize(&matte, width, height, FilterType::Triangle)
    }
}

/// Combine the original colors with `mask` as the alpha channel.
pub fn apply_alpha(image: &DynamicImage, mask: &GrayImage) -> RgbaImage {
    let rgb = image.to_rgb8();
    RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let p = rgb.get_pixel(x, y);
        Rgba([p[0], p[1], p[2], mask.get_pixel(x, y)[0]])
    })
}
