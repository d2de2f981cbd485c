//! Per-Pixel Masking Augmenter
//!
//! Zeroes individually sampled pixels rather than contiguous patches or
//! frequency bands. Same ratio-driven contract as the other augmenters.

use image::RgbImage;
use rand_chacha::ChaCha8Rng;

use crate::mask::band::{suppressed_cells, validate_ratio};
use crate::utils::error::{FreqMaskError, Result};

/// Pixel-space random masking augmenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMaskGenerator {
    ratio: f64,
}

impl PixelMaskGenerator {
    pub fn new(ratio: f64) -> Result<Self> {
        validate_ratio(ratio)?;
        Ok(Self { ratio })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Zero `floor(ratio/100 * H * W)` distinct pixels sampled without
    /// replacement from `rng`.
    pub fn transform(&self, image: &RgbImage, rng: &mut ChaCha8Rng) -> Result<RgbImage> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(FreqMaskError::InvalidShape(format!(
                "expected non-empty image, got {}x{}",
                width, height
            )));
        }

        let total = (width as usize) * (height as usize);
        let mut target = suppressed_cells(self.ratio, total);
        if target == 0 && self.ratio > 0.0 {
            target = 1;
        }

        let mut out = image.clone();
        for index in rand::seq::index::sample(rng, total, target) {
            let x = (index % width as usize) as u32;
            let y = (index / width as usize) as u32;
            out.put_pixel(x, y, image::Rgb([0, 0, 0]));
        }
        Ok(out)
    }
}
