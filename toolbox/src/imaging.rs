use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Result, ToolboxError};

/// Decode an uploaded image, guessing the format from its content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(ToolboxError::InvalidImage("Empty image upload".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ToolboxError::InvalidImage(format!("Failed to read image: {e}")))?;

    reader
        .decode()
        .map_err(|e| ToolboxError::InvalidImage(format!("Failed to decode image: {e}")))
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
