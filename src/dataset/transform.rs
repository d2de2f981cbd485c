//! Transform Pipeline Module
//!
//! Composes the full per-sample path the data loaders run: resize,
//! optional photometric corruption, the dispatched masking augmentation,
//! and normalization to `[0, 1]` floats ready for tensorization.
//!
//! The pipeline is built once at startup from a [`TransformConfig`]; all
//! configuration errors (unknown mask type, out-of-range ratio) surface
//! there, before any image is processed.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::augmentation::{AugmentorConfig, ImageAugmentor};
use crate::mask::{get_augmenter, MaskGenerator};
use crate::utils::error::Result;

/// Configuration for the per-sample transform pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Target edge length; images are resized to `load_size x load_size`
    pub load_size: u32,
    /// Mask type tag (e.g. `spectral-low`, `patch`, `none`)
    pub mask_type: String,
    /// Percentage of frequency or pixel content to suppress
    pub ratio: f64,
    /// Photometric corruption stage; `None` disables it
    pub augmentor: Option<AugmentorConfig>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            load_size: crate::DEFAULT_LOAD_SIZE,
            mask_type: "spectral".to_string(),
            ratio: crate::DEFAULT_MASK_RATIO,
            augmentor: Some(AugmentorConfig::train()),
        }
    }
}

impl TransformConfig {
    /// Evaluation preset: no corruption, no masking.
    pub fn eval() -> Self {
        Self {
            load_size: crate::DEFAULT_LOAD_SIZE,
            mask_type: "none".to_string(),
            ratio: 0.0,
            augmentor: None,
        }
    }
}

/// The composed per-sample transform.
pub struct TransformPipeline {
    load_size: u32,
    augmentor: Option<ImageAugmentor>,
    mask: MaskGenerator,
}

impl TransformPipeline {
    /// Build the pipeline, validating the mask configuration up front.
    pub fn build(config: &TransformConfig) -> Result<Self> {
        let mask = get_augmenter(&config.mask_type, config.ratio)?;
        Ok(Self {
            load_size: config.load_size,
            augmentor: config.augmentor.clone().map(ImageAugmentor::new),
            mask,
        })
    }

    /// Run the spatial stages only: resize, corruption, masking.
    pub fn apply_rgb(&self, image: &DynamicImage, rng: &mut ChaCha8Rng) -> Result<RgbImage> {
        let mut result = image
            .resize_exact(self.load_size, self.load_size, FilterType::Triangle)
            .to_rgb8();
        if let Some(augmentor) = &self.augmentor {
            result = augmentor.augment(result, rng)?;
        }
        self.mask.transform(&result, rng)
    }

    /// Run the full pipeline, producing interleaved RGB floats in `[0, 1]`.
    pub fn apply(&self, image: &DynamicImage, rng: &mut ChaCha8Rng) -> Result<Vec<f32>> {
        Ok(normalize(&self.apply_rgb(image, rng)?))
    }
}

/// Normalize an image to `[0, 1]` interleaved floats.
pub fn normalize(image: &RgbImage) -> Vec<f32> {
    let (width, height) = image.dimensions();
    let mut data = Vec::with_capacity(3 * width as usize * height as usize);
    for pixel in image.pixels() {
        data.push(pixel.0[0] as f32 / 255.0);
        data.push(pixel.0[1] as f32 / 255.0);
        data.push(pixel.0[2] as f32 / 255.0);
    }
    data
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

    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(64, 48, |x, y| {
            Rgb([(x * 4) as u8, (y * 5) as u8, 77])
        }))
    }

    #[test]
    fn test_build_rejects_bad_mask_type() {
        let config = TransformConfig {
            mask_type: "bogus".to_string(),
            ..TransformConfig::default()
        };
        assert!(matches!(
            TransformPipeline::build(&config),
            Err(FreqMaskError::UnknownMaskType(_))
        ));
    }

    #[test]
    fn test_build_rejects_bad_ratio() {
        let config = TransformConfig {
            ratio: 200.0,
            ..TransformConfig::default()
        };
        assert!(matches!(
            TransformPipeline::build(&config),
            Err(FreqMaskError::InvalidRatio(_))
        ));
    }

    #[test]
    fn test_apply_output_shape_and_range() {
        let config = TransformConfig {
            load_size: 32,
            mask_type: "spectral-low".to_string(),
            ratio: 25.0,
            augmentor: None,
        };
        let pipeline = TransformPipeline::build(&config).unwrap();
        let data = pipeline.apply(&sample_image(), &mut rng()).unwrap();
        assert_eq!(data.len(), 3 * 32 * 32);
        assert!(data.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_eval_pipeline_matches_plain_resize() {
        let pipeline = TransformPipeline::build(&TransformConfig::eval()).unwrap();
        let image = sample_image();
        let expected = normalize(
            &image
                .resize_exact(256, 256, FilterType::Triangle)
                .to_rgb8(),
        );
        let data = pipeline.apply(&image, &mut rng()).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_normalize_range() {
        let image = RgbImage::from_pixel(4, 4, Rgb([0, 128, 255]));
        let data = normalize(&image);
        assert_eq!(data.len(), 48);
        assert_eq!(data[0], 0.0);
        assert!((data[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(data[2], 1.0);
    }
}
