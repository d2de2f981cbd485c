//! Photometric Corruption Module
//!
//! Simulates the in-the-wild degradations a deployed detector sees:
//! Gaussian blur and JPEG re-compression, each applied with a configured
//! probability and a parameter range. This is the corruption stage that
//! runs before the masking augmenter in the training pipeline.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// Configuration for the photometric corruption stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentorConfig {
    /// Probability of applying Gaussian blur (0.0 - 1.0)
    pub blur_prob: f32,
    /// Blur sigma range `[min, max]`
    pub blur_sig: [f32; 2],
    /// Probability of applying JPEG re-compression (0.0 - 1.0)
    pub jpg_prob: f32,
    /// JPEG quality range `[min, max]`
    pub jpg_qual: [u8; 2],
}

impl Default for AugmentorConfig {
    fn default() -> Self {
        Self::train()
    }
}

impl AugmentorConfig {
    /// Training preset: blur sigma drawn from [0, 3], quality from [30, 100].
    pub fn train() -> Self {
        Self {
            blur_prob: 0.1,
            blur_sig: [0.0, 3.0],
            jpg_prob: 0.1,
            jpg_qual: [30, 100],
        }
    }

    /// Validation preset: midpoint parameters, so corruption strength is
    /// fixed and evaluation stays comparable across runs.
    pub fn validation() -> Self {
        Self {
            blur_prob: 0.1,
            blur_sig: [1.5, 1.5],
            jpg_prob: 0.1,
            jpg_qual: [65, 65],
        }
    }

    /// Disable all corruption.
    pub fn none() -> Self {
        Self {
            blur_prob: 0.0,
            blur_sig: [0.0, 0.0],
            jpg_prob: 0.0,
            jpg_qual: [100, 100],
        }
    }
}

/// Applies the configured corruptions with per-call randomness.
#[derive(Debug, Clone)]
pub struct ImageAugmentor {
    config: AugmentorConfig,
}

impl ImageAugmentor {
    pub fn new(config: AugmentorConfig) -> Self {
        Self { config }
    }

    /// Apply blur and/or JPEG re-compression according to the configured
    /// probabilities.
    pub fn augment(&self, image: RgbImage, rng: &mut ChaCha8Rng) -> Result<RgbImage> {
        let mut result = image;

        if rng.gen::<f32>() < self.config.blur_prob {
            let sigma = rng.gen_range(self.config.blur_sig[0]..=self.config.blur_sig[1]);
            if sigma > 0.0 {
                result = image::imageops::blur(&result, sigma);
            }
        }

        if rng.gen::<f32>() < self.config.jpg_prob {
            let quality = rng.gen_range(self.config.jpg_qual[0]..=self.config.jpg_qual[1]);
            result = jpeg_compress(&result, quality)?;
        }

        Ok(result)
    }
}

/// Round-trip an image through an in-memory JPEG encode at the given
/// quality.
fn jpeg_compress(image: &RgbImage, quality: u8) -> Result<RgbImage> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);
    image.write_with_encoder(encoder)?;
    Ok(image::load_from_memory(&buffer)?.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(44)
    }

    fn sample_image() -> RgbImage {
        RgbImage::from_fn(32, 32, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8])
        })
    }

    #[test]
    fn test_disabled_augmentor_is_identity() {
        let augmentor = ImageAugmentor::new(AugmentorConfig::none());
        let image = sample_image();
        let out = augmentor.augment(image.clone(), &mut rng()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_jpeg_round_trip_preserves_shape() {
        let image = sample_image();
        let out = jpeg_compress(&image, 30).unwrap();
        assert_eq!(out.dimensions(), image.dimensions());
    }

    #[test]
    fn test_forced_corruption_is_deterministic_per_seed() {
        let config = AugmentorConfig {
            blur_prob: 1.0,
            blur_sig: [2.0, 2.0],
            jpg_prob: 1.0,
            jpg_qual: [50, 50],
        };
        let augmentor = ImageAugmentor::new(config);
        let image = sample_image();
        let mut rng_a = ChaCha8Rng::seed_from_u64(5);
        let mut rng_b = ChaCha8Rng::seed_from_u64(5);
        let a = augmentor.augment(image.clone(), &mut rng_a).unwrap();
        let b = augmentor.augment(image, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = AugmentorConfig::train();
        let json = serde_json::to_string(&config).unwrap();
        let back: AugmentorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
