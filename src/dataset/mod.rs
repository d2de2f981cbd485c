//! Dataset pipeline integration
//!
//! This module provides the pieces the external data loaders compose:
//!
//! - `augmentation`: photometric corruption (blur, JPEG re-compression)
//! - `transform`: the resize → corrupt → mask → normalize per-sample path
//!
//! Dataset I/O, batching, and distributed sampling belong to the consuming
//! training system; this crate only supplies the per-sample transform.
//! When data loading runs in parallel workers, give each worker its own
//! seeded `ChaCha8Rng` so random mask placements do not correlate.

pub mod augmentation;
pub mod transform;

pub use augmentation::{AugmentorConfig, ImageAugmentor};
pub use transform::{normalize, TransformConfig, TransformPipeline};
