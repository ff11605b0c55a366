//! Upload image normalization
//!
//! Client-supplied images arrive in arbitrary formats, orientations and
//! sizes. Everything is normalized before storage: decode, apply the
//! orientation recorded in the file's metadata, convert to RGB8, resize
//! preserving aspect ratio so the longer edge matches a fixed size, and
//! re-encode as PNG.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use tracing::debug;

use relief_core::{ReliefError, Result};

/// Normalize raw image bytes to an aspect-preserving PNG whose longer edge
/// is `max_edge` pixels.
pub fn normalize_image(bytes: &[u8], max_edge: u32) -> Result<Vec<u8>> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ReliefError::Image(e.to_string()))?;
    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ReliefError::Image(e.to_string()))?;
    let orientation = decoder
        .orientation()
        .unwrap_or(image::metadata::Orientation::NoTransforms);
    let mut decoded = DynamicImage::from_decoder(decoder)
        .map_err(|e| ReliefError::Image(e.to_string()))?;
    decoded.apply_orientation(orientation);

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let (new_width, new_height) = fit_longer_edge(width, height, max_edge);
    debug!(width, height, new_width, new_height, "normalizing image");

    let resized = image::imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3);

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(resized)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ReliefError::Image(e.to_string()))?;
    Ok(png)
}

/// Scale (width, height) so the longer edge equals `max_edge`, preserving
/// aspect ratio. Dimensions never round down to zero.
fn fit_longer_edge(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width >= height {
        let scaled = (height as f64 * max_edge as f64 / width as f64) as u32;
        (max_edge, scaled.max(1))
    } else {
        let scaled = (width as f64 * max_edge as f64 / height as f64) as u32;
        (scaled.max(1), max_edge)
    }
}
