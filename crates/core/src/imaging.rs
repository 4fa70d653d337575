//! Avatar output normalization.
//!
//! Every generated avatar is cover-fitted (scaled to fill, centre-cropped)
//! onto a fixed square canvas and re-encoded as RGBA PNG with the best
//! compression level, whatever format the generator returned.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder};

use crate::error::CoreError;

/// Edge length of the square avatar canvas, in pixels.
pub const AVATAR_SIZE: u32 = 512;

/// Decode `bytes`, cover-fit to [`AVATAR_SIZE`]², and encode as PNG.
pub fn normalize_avatar(bytes: &[u8]) -> Result<Vec<u8>, CoreError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| CoreError::Image(format!("Failed to decode generated image: {e}")))?;
    encode_png(&cover_fit(&decoded, AVATAR_SIZE))
}

/// Scale `img` to fill a `size`×`size` square and crop the overflow evenly
/// from both sides.
pub fn cover_fit(img: &DynamicImage, size: u32) -> DynamicImage {
    img.resize_to_fill(size, size, FilterType::Lanczos3)
}

/// Encode as RGBA8 PNG at maximum compression.
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, CoreError> {
    let rgba = img.to_rgba8();
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive)
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CoreError::Image(format!("Failed to encode avatar PNG: {e}")))?;
    Ok(out.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
