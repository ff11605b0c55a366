//! Inference backend traits and mock implementations
//!
//! The generative models (diffusion image synthesis, monocular depth
//! estimation) are opaque collaborators with a plain input/output
//! contract. The mocks generate deterministic placeholder output with no
//! GPU or network involved; they back tests and local mode.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use image::{Rgb, RgbImage};

use relief_core::Result;
use relief_mesh::DepthGrid;

/// Text-to-image synthesis backend.
pub trait ImageSynthesizer: Send + Sync {
    fn synthesize(&self, positive_prompt: &str, negative_prompt: Option<&str>) -> Result<RgbImage>;
}

/// Per-pixel depth estimation backend.
///
/// Returns a depth grid aligned with the input image, with larger values
/// meaning closer to the camera (disparity-like, matching the depth
/// network the production worker wraps).
pub trait DepthEstimator: Send + Sync {
    fn estimate(&self, image: &RgbImage) -> Result<DepthGrid>;
}

/// Mock synthesizer producing a solid color derived from the prompt.
pub struct MockSynthesizer {
    pub width: u32,
    pub height: u32,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

impl ImageSynthesizer for MockSynthesizer {
    fn synthesize(&self, positive_prompt: &str, _negative_prompt: Option<&str>) -> Result<RgbImage> {
        let mut hasher = DefaultHasher::new();
        positive_prompt.hash(&mut hasher);
        let h = hasher.finish();
        let color = Rgb([(h >> 16) as u8, (h >> 8) as u8, h as u8]);
        Ok(RgbImage::from_pixel(self.width, self.height, color))
    }
}

/// Mock estimator producing a smooth radial depth bump.
///
/// The center of the image reads as foreground (well above the validity
/// threshold), fading toward the edges, so meshes built from it have
/// non-trivial shape and a fully valid interior.
#[derive(Default)]
pub struct MockDepthEstimator;

impl DepthEstimator for MockDepthEstimator {
    fn estimate(&self, image: &RgbImage) -> Result<DepthGrid> {
        let (width, height) = image.dimensions();
        let cx = (width.saturating_sub(1)) as f32 / 2.0;
        let cy = (height.saturating_sub(1)) as f32 / 2.0;
        let max_r = (cx * cx + cy * cy).sqrt().max(1.0);

        let mut values = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let r = (dx * dx + dy * dy).sqrt() / max_r;
                values.push(20.0 + 180.0 * (1.0 - r));
            }
        }
        Ok(DepthGrid::new(width, height, values))
    }
}
