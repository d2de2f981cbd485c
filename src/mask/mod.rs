//! Masking augmentation module
//!
//! This module provides the frequency-domain and pixel-space masking
//! augmentations used to train universal deepfake detectors, plus the
//! dispatcher that resolves a `(mask_type, ratio)` configuration into the
//! single transform the data pipeline calls per sample:
//!
//! - `spectrum`: forward/inverse centered 2D FFT per channel
//! - `band`: frequency-grid mask construction (low-pass, high-pass,
//!   band-reject, random-band)
//! - `frequency`: the composed spectral augmenter
//! - `patch`: spatial patch masking baseline
//! - `pixel`: per-pixel masking baseline
//!
//! Configuration is validated when the augmenter is built, so an unknown
//! mask type or an out-of-range ratio fails before training starts rather
//! than on the first sample.
//!
//! ## Randomness contract
//!
//! Augmenters never hold RNG state; the caller threads a
//! [`ChaCha8Rng`] through every `transform` call. Parallel data-loading
//! workers must each seed an independent generator (e.g.
//! `ChaCha8Rng::seed_from_u64(base_seed + worker_id)`), otherwise random
//! band and patch placements correlate across workers.

pub mod band;
pub mod frequency;
pub mod patch;
pub mod pixel;
pub mod spectrum;

use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub use band::{select_mask, validate_ratio, BandPolicy, FrequencyMask};
pub use frequency::FrequencyMaskGenerator;
pub use patch::{PatchMaskGenerator, DEFAULT_PATCH_SIZE};
pub use pixel::PixelMaskGenerator;
pub use spectrum::Spectrum;

use crate::utils::error::{FreqMaskError, Result};

/// Masking policy family, resolved once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskType {
    /// Frequency-domain masking with the given band policy.
    Spectral(BandPolicy),
    /// Spatial patch masking.
    Patch,
    /// Per-pixel masking.
    Pixel,
    /// No masking (identity transform).
    None,
}

impl FromStr for MaskType {
    type Err = FreqMaskError;

    /// Parse a configuration tag.
    ///
    /// Plain `spectral` selects the random-band policy, matching the
    /// training default (`--band all`); the `spectral-*` variants pick an
    /// explicit policy. `nomask` is the legacy flag spelling for the
    /// identity transform.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "patch" => Ok(MaskType::Patch),
            "pixel" => Ok(MaskType::Pixel),
            "spectral" => Ok(MaskType::Spectral(BandPolicy::RandomBand)),
            "spectral-low" | "spectral_low" => Ok(MaskType::Spectral(BandPolicy::LowPass)),
            "spectral-high" | "spectral_high" => Ok(MaskType::Spectral(BandPolicy::HighPass)),
            "spectral-band" | "spectral_band" => Ok(MaskType::Spectral(BandPolicy::BandReject)),
            "spectral-random" | "spectral_random" => Ok(MaskType::Spectral(BandPolicy::RandomBand)),
            "none" | "identity" | "nomask" => Ok(MaskType::None),
            other => Err(FreqMaskError::UnknownMaskType(other.to_string())),
        }
    }
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskType::Spectral(BandPolicy::LowPass) => write!(f, "spectral-low"),
            MaskType::Spectral(BandPolicy::HighPass) => write!(f, "spectral-high"),
            MaskType::Spectral(BandPolicy::BandReject) => write!(f, "spectral-band"),
            MaskType::Spectral(BandPolicy::RandomBand) => write!(f, "spectral-random"),
            MaskType::Patch => write!(f, "patch"),
            MaskType::Pixel => write!(f, "pixel"),
            MaskType::None => write!(f, "none"),
        }
    }
}

/// The dispatched augmenter: one concrete transform per configuration,
/// used uniformly by the training and testing pipelines.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskGenerator {
    Frequency(FrequencyMaskGenerator),
    Patch(PatchMaskGenerator),
    Pixel(PixelMaskGenerator),
    Identity,
}

impl MaskGenerator {
    /// Resolve a mask type and ratio into a concrete augmenter.
    pub fn new(mask_type: MaskType, ratio: f64) -> Result<Self> {
        validate_ratio(ratio)?;
        match mask_type {
            MaskType::Spectral(policy) => {
                Ok(MaskGenerator::Frequency(FrequencyMaskGenerator::new(ratio, policy)?))
            }
            MaskType::Patch => Ok(MaskGenerator::Patch(PatchMaskGenerator::new(ratio)?)),
            MaskType::Pixel => Ok(MaskGenerator::Pixel(PixelMaskGenerator::new(ratio)?)),
            MaskType::None => Ok(MaskGenerator::Identity),
        }
    }

    /// Apply the augmentation to one image.
    ///
    /// Output shape and value range match the input; the identity variant
    /// returns an unmodified copy.
    pub fn transform(&self, image: &RgbImage, rng: &mut ChaCha8Rng) -> Result<RgbImage> {
        match self {
            MaskGenerator::Frequency(g) => g.transform(image, rng),
            MaskGenerator::Patch(g) => g.transform(image, rng),
            MaskGenerator::Pixel(g) => g.transform(image, rng),
            MaskGenerator::Identity => Ok(image.clone()),
        }
    }

    /// Whether this generator leaves images untouched.
    pub fn is_identity(&self) -> bool {
        matches!(self, MaskGenerator::Identity)
    }
}

/// Resolve a `(mask_type, ratio)` configuration into an augmenter,
/// failing fast on an unknown tag or out-of-range ratio.
///
/// This is the configuration-time entry point: call it once at startup and
/// reuse the returned generator for every sample.
pub fn get_augmenter(mask_type: &str, ratio: f64) -> Result<MaskGenerator> {
    validate_ratio(ratio)?;
    let mask_type: MaskType = mask_type.parse()?;
    MaskGenerator::new(mask_type, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(44)
    }

    #[test]
    fn test_unknown_mask_type_fails_fast() {
        let result = get_augmenter("bogus_type", 15.0);
        assert!(matches!(result, Err(FreqMaskError::UnknownMaskType(_))));
    }

    #[test]
    fn test_out_of_range_ratio_fails_fast() {
        assert!(matches!(
            get_augmenter("patch", 150.0),
            Err(FreqMaskError::InvalidRatio(_))
        ));
        assert!(matches!(
            get_augmenter("spectral", -1.0),
            Err(FreqMaskError::InvalidRatio(_))
        ));
        // Ratio range is checked even before the tag is parsed.
        assert!(matches!(
            get_augmenter("bogus_type", 150.0),
            Err(FreqMaskError::InvalidRatio(_))
        ));
    }

    #[test]
    fn test_mask_type_parsing() {
        assert_eq!(
            "spectral-low".parse::<MaskType>().unwrap(),
            MaskType::Spectral(BandPolicy::LowPass)
        );
        assert_eq!(
            "spectral".parse::<MaskType>().unwrap(),
            MaskType::Spectral(BandPolicy::RandomBand)
        );
        assert_eq!("PATCH".parse::<MaskType>().unwrap(), MaskType::Patch);
        assert_eq!("nomask".parse::<MaskType>().unwrap(), MaskType::None);
        assert_eq!("identity".parse::<MaskType>().unwrap(), MaskType::None);
    }

    #[test]
    fn test_display_round_trip() {
        for tag in [
            "spectral-low",
            "spectral-high",
            "spectral-band",
            "spectral-random",
            "patch",
            "pixel",
            "none",
        ] {
            let mask_type: MaskType = tag.parse().unwrap();
            assert_eq!(mask_type.to_string(), tag);
        }
    }

    #[test]
    fn test_identity_transform() {
        let augmenter = get_augmenter("none", 0.0).unwrap();
        assert!(augmenter.is_identity());
        let image = RgbImage::from_pixel(8, 8, Rgb([42, 43, 44]));
        let out = augmenter.transform(&image, &mut rng()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_end_to_end_uniform_image_low_pass() {
        // A 256x256 all-ones image keeps its energy at the zero frequency;
        // low-pass masking at 15% leaves it untouched.
        let image = RgbImage::from_pixel(256, 256, Rgb([1, 1, 1]));
        let augmenter = get_augmenter("spectral-low", 15.0).unwrap();
        let out = augmenter.transform(&image, &mut rng()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_dispatched_patch_masks_expected_area() {
        let augmenter = get_augmenter("patch", 50.0).unwrap();
        let image = RgbImage::from_pixel(32, 32, Rgb([255, 255, 255]));
        let out = augmenter.transform(&image, &mut rng()).unwrap();
        let zeroed = out.pixels().filter(|p| p.0 == [0, 0, 0]).count();
        assert_eq!(zeroed, 512);
    }
}
