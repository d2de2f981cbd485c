//! # Frequency Masking for Universal Deepfake Detection
//!
//! A Rust library implementing the frequency-domain masking augmentation
//! used to train universal synthetic-image detectors, together with the
//! pixel-space masking baselines it is compared against.
//!
//! ## How it works
//!
//! Each training image is transformed to its centered 2D Fourier spectrum,
//! a configurable percentage of frequency content is suppressed (low-pass,
//! high-pass, band-reject, or a randomly placed band), and the image is
//! reconstructed. Training on these band-limited images discourages the
//! detector from latching onto generator-specific frequency artifacts.
//!
//! ## Modules
//!
//! - `mask`: the augmentation core — spectrum transform, band selection,
//!   the spectral/patch/pixel augmenters, and the configuration dispatcher
//! - `dataset`: per-sample transform pipeline (resize, corruption, masking,
//!   normalization) for the consuming data loaders
//! - `utils`: error types and logging
//!
//! ## Quick Start
//!
//! ```rust
//! use freqmask::get_augmenter;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let augmenter = get_augmenter("spectral-low", 15.0).expect("valid configuration");
//! let mut rng = ChaCha8Rng::seed_from_u64(44);
//! let image = image::RgbImage::from_pixel(256, 256, image::Rgb([1, 1, 1]));
//! let augmented = augmenter.transform(&image, &mut rng).unwrap();
//! assert_eq!(augmented, image); // constant image energy is all at DC
//! ```

pub mod dataset;
pub mod mask;
pub mod utils;

// Re-export commonly used items for convenience
pub use dataset::augmentation::{AugmentorConfig, ImageAugmentor};
pub use dataset::transform::{normalize, TransformConfig, TransformPipeline};
pub use mask::{
    get_augmenter, select_mask, validate_ratio, BandPolicy, FrequencyMask,
    FrequencyMaskGenerator, MaskGenerator, MaskType, PatchMaskGenerator, PixelMaskGenerator,
    Spectrum,
};
pub use utils::error::{FreqMaskError, Result};

/// Default edge length images are resized to before masking
pub const DEFAULT_LOAD_SIZE: u32 = 256;

/// Default masking ratio (percent of content suppressed)
pub const DEFAULT_MASK_RATIO: f64 = 15.0;

/// Default random seed, matching the research configuration
pub const DEFAULT_SEED: u64 = 44;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
