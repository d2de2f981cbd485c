//! Frequency Masking Augmenter
//!
//! Composes the spectrum transform and the band selector into the single
//! per-sample augmentation used by the training pipeline:
//! forward FFT → mask selection → element-wise multiply → inverse FFT.
//!
//! The transform is a pure function of `(image, ratio, policy)` plus the
//! RNG state for the random-band policy; nothing persists across calls.

use image::RgbImage;
use rand_chacha::ChaCha8Rng;

use crate::mask::band::{select_mask, validate_ratio, BandPolicy};
use crate::mask::spectrum::Spectrum;
use crate::utils::error::Result;

/// Spectral augmenter removing `ratio` percent of frequency content
/// according to a band policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMaskGenerator {
    ratio: f64,
    policy: BandPolicy,
}

impl FrequencyMaskGenerator {
    /// Create a generator, validating the ratio at configuration time.
    pub fn new(ratio: f64, policy: BandPolicy) -> Result<Self> {
        validate_ratio(ratio)?;
        Ok(Self { ratio, policy })
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn policy(&self) -> BandPolicy {
        self.policy
    }

    /// Augment one image. One mask is drawn per invocation and broadcast
    /// across the three channels.
    pub fn transform(&self, image: &RgbImage, rng: &mut ChaCha8Rng) -> Result<RgbImage> {
        let mut spectrum = Spectrum::forward(image)?;
        let mask = select_mask(
            spectrum.height(),
            spectrum.width(),
            self.ratio,
            self.policy,
            rng,
        )?;
        spectrum.apply_mask(&mask)?;
        spectrum.inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FreqMaskError;
    use image::Rgb;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(44)
    }

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_ratio_zero_is_identity() {
        let generator = FrequencyMaskGenerator::new(0.0, BandPolicy::LowPass).unwrap();
        let image = gradient_image(32, 24);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_full_ratio_suppresses_everything() {
        let generator = FrequencyMaskGenerator::new(100.0, BandPolicy::LowPass).unwrap();
        let image = gradient_image(32, 32);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_constant_image_survives_low_pass() {
        // A constant image's energy sits entirely at the zero frequency,
        // which low-pass masking preserves.
        let image = RgbImage::from_pixel(64, 64, Rgb([1, 1, 1]));
        let generator = FrequencyMaskGenerator::new(15.0, BandPolicy::LowPass).unwrap();
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_constant_image_erased_by_high_pass() {
        let image = RgbImage::from_pixel(32, 32, Rgb([180, 90, 45]));
        let generator = FrequencyMaskGenerator::new(10.0, BandPolicy::HighPass).unwrap();
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_shape_preserved() {
        let generator = FrequencyMaskGenerator::new(40.0, BandPolicy::BandReject).unwrap();
        let image = gradient_image(37, 21);
        let out = generator.transform(&image, &mut rng()).unwrap();
        assert_eq!(out.dimensions(), (37, 21));
    }

    #[test]
    fn test_invalid_ratio_rejected_at_construction() {
        assert!(matches!(
            FrequencyMaskGenerator::new(120.0, BandPolicy::LowPass),
            Err(FreqMaskError::InvalidRatio(_))
        ));
    }

    #[test]
    fn test_random_band_seeded_determinism() {
        let generator = FrequencyMaskGenerator::new(30.0, BandPolicy::RandomBand).unwrap();
        let image = gradient_image(48, 48);
        let mut rng_a = ChaCha8Rng::seed_from_u64(3);
        let mut rng_b = ChaCha8Rng::seed_from_u64(3);
        let a = generator.transform(&image, &mut rng_a).unwrap();
        let b = generator.transform(&image, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }
}
