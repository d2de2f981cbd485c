//! Spatial Patch Masking Augmenter
//!
//! The non-frequency baseline used for controlled comparisons: zeroes
//! randomly chosen square patches directly in pixel space until exactly
//! `floor(ratio/100 * H * W)` pixels are suppressed. Shares the external
//! contract of the spectral augmenter (ratio-driven, same pipeline slot).

use image::RgbImage;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::mask::band::{suppressed_cells, validate_ratio};
use crate::utils::error::{FreqMaskError, Result};

/// Default patch edge length in pixels, matching the research setup.
pub const DEFAULT_PATCH_SIZE: u32 = 16;

/// Pixel-space patch masking augmenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchMaskGenerator {
    ratio: f64,
    patch_size: u32,
}

impl PatchMaskGenerator {
    /// Create a generator with the default patch size, validating the ratio
    /// at configuration time.
    pub fn new(ratio: f64) -> Result<Self> {
        Self::with_patch_size(ratio, DEFAULT_PATCH_SIZE)
    }

    /// Create a generator with a custom patch size.
    pub fn with_patch_size(ratio: f64, patch_size: u32) -> Result<Self> {
        validate_ratio(ratio)?;
        if patch_size == 0 {
            return Err(FreqMaskError::InvalidShape(
                "patch size must be positive".to_string(),
            ));
        }
        Ok(Self { ratio, patch_size })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Zero randomly chosen patches of the image.
    ///
    /// Patches on the right/bottom border are clipped to the image bounds,
    /// and the last selected patch is filled only partially so the total
    /// suppressed pixel count is exact. A nonzero ratio whose pixel count
    /// rounds to zero still masks a single pixel.
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
        if target == 0 {
            return Ok(out);
        }

        let ps = self.patch_size;
        let mut origins: Vec<(u32, u32)> = (0..height)
            .step_by(ps as usize)
            .flat_map(|y| (0..width).step_by(ps as usize).map(move |x| (x, y)))
            .collect();
        origins.shuffle(rng);

        let mut remaining = target;
        for (x0, y0) in origins {
            if remaining == 0 {
                break;
            }
            let pw = ps.min(width - x0);
            let ph = ps.min(height - y0);
            'patch: for y in y0..y0 + ph {
                for x in x0..x0 + pw {
                    if remaining == 0 {
                        break 'patch;
                    }
                    out.put_pixel(x, y, image::Rgb([0, 0, 0]));
                    remaining -= 1;
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(44)
    }

    fn white_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn zeroed_pixels(image: &RgbImage) -> usize {
        image.pixels().filter(|p| p.0 == [0, 0, 0]).count()
    }

    #[test]
    fn test_masked_area_is_exact() {
        let generator = PatchMaskGenerator::new(37.0).unwrap();
        let image = white_image(64, 64);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(zeroed_pixels(&out), (0.37f64 * 64.0 * 64.0) as usize);
    }

    #[test]
    fn test_non_divisible_dimensions() {
        // 50x34 is not a multiple of the patch size; border patches clip.
        let generator = PatchMaskGenerator::new(60.0).unwrap();
        let image = white_image(50, 34);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(zeroed_pixels(&out), (0.60f64 * 50.0 * 34.0) as usize);
        assert_eq!(out.dimensions(), (50, 34));
    }

    #[test]
    fn test_ratio_zero_is_identity() {
        let generator = PatchMaskGenerator::new(0.0).unwrap();
        let image = white_image(32, 32);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_ratio_hundred_blacks_out_image() {
        let generator = PatchMaskGenerator::new(100.0).unwrap();
        let image = white_image(40, 24);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(zeroed_pixels(&out), 40 * 24);
    }

    #[test]
    fn test_tiny_ratio_masks_at_least_one_pixel() {
        // 0.5% of 10x10 rounds down to zero pixels; the fallback still
        // masks one.
        let generator = PatchMaskGenerator::new(0.5).unwrap();
        let image = white_image(10, 10);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(zeroed_pixels(&out), 1);
    }

    #[test]
    fn test_seeded_determinism() {
        let generator = PatchMaskGenerator::new(45.0).unwrap();
        let image = white_image(48, 48);
        let mut rng_a = ChaCha8Rng::seed_from_u64(9);
        let mut rng_b = ChaCha8Rng::seed_from_u64(9);
        let a = generator.transform(&image, &mut rng_a).unwrap();
        let b = generator.transform(&image, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        assert!(PatchMaskGenerator::new(-3.0).is_err());
        assert!(PatchMaskGenerator::with_patch_size(50.0, 0).is_err());
    }
}
