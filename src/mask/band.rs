//! Band Selector Module
//!
//! Builds frequency-grid masks for the spectral augmenter. Masks live on
//! the centered grid produced by [`Spectrum::forward`](crate::mask::spectrum::Spectrum::forward),
//! where the zero-frequency bin sits at `(H/2, W/2)`.
//!
//! The `ratio` is the percentage of grid cells to suppress, never a
//! probability of applying the augmentation. Geometry is computed by ranking
//! every cell by its squared distance from the center (ties broken by linear
//! index), so suppressed counts are exact at the boundaries (`ratio = 0`
//! keeps everything, `ratio = 100` suppresses everything, corners included)
//! and monotone in `ratio` for every deterministic policy. A radius derived
//! from `area/pi` cannot reach the grid corners and would break the
//! `ratio = 100` contract.

use std::fmt;
use std::str::FromStr;

use image::GrayImage;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::utils::error::{FreqMaskError, Result};

/// Frequency-band suppression policy.
///
/// Pass-filter naming: the policy names what is *kept*. `LowPass` keeps the
/// low-frequency core and removes high frequencies, and so on. The legacy
/// `--band` training flag names bands by what is *removed*; see
/// [`BandPolicy::from_band_flag`] for that mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandPolicy {
    /// Suppress the cells farthest from center (keep low frequencies).
    LowPass,
    /// Suppress the cells closest to center (keep high frequencies).
    HighPass,
    /// Suppress an annulus of mid-range frequencies, keeping the innermost
    /// and outermost content.
    BandReject,
    /// Suppress a randomly placed contiguous rectangle, redrawn from the
    /// caller's RNG on every call so the detector cannot overfit to one
    /// fixed band across epochs.
    RandomBand,
}

impl BandPolicy {
    /// Map the legacy `--band` training flag, which names the band being
    /// *removed*: `low` removes low frequencies (high-pass), `mid` removes
    /// the middle annulus, `high` removes high frequencies (low-pass), and
    /// `all` (the training default) removes a randomly placed region.
    pub fn from_band_flag(band: &str) -> Result<Self> {
        match band.to_lowercase().as_str() {
            "low" => Ok(BandPolicy::HighPass),
            "mid" => Ok(BandPolicy::BandReject),
            "high" => Ok(BandPolicy::LowPass),
            "all" => Ok(BandPolicy::RandomBand),
            other => Err(FreqMaskError::UnknownBandPolicy(other.to_string())),
        }
    }
}

impl FromStr for BandPolicy {
    type Err = FreqMaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low-pass" | "low_pass" => Ok(BandPolicy::LowPass),
            "high-pass" | "high_pass" => Ok(BandPolicy::HighPass),
            "band-reject" | "band_reject" => Ok(BandPolicy::BandReject),
            "random-band" | "random_band" => Ok(BandPolicy::RandomBand),
            other => Err(FreqMaskError::UnknownBandPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for BandPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandPolicy::LowPass => write!(f, "low-pass"),
            BandPolicy::HighPass => write!(f, "high-pass"),
            BandPolicy::BandReject => write!(f, "band-reject"),
            BandPolicy::RandomBand => write!(f, "random-band"),
        }
    }
}

/// A real-valued mask over the centered frequency grid.
///
/// Values are `1.0` (keep) or `0.0` (suppress); the representation admits
/// soft masks but the built-in policies only emit hard ones. The mask shape
/// always equals the spectrum's spatial shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMask {
    height: usize,
    width: usize,
    data: Vec<f64>,
}

impl FrequencyMask {
    /// All-ones mask (no suppression).
    pub fn ones(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![1.0; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask weight at grid position `(y, x)`.
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// Row-major view of the mask weights.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Number of fully suppressed cells.
    pub fn suppressed_count(&self) -> usize {
        self.data.iter().filter(|&&w| w == 0.0).count()
    }

    /// Render as a grayscale image (white = keep, black = suppress).
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let w = self.get(y as usize, x as usize);
            image::Luma([(w.clamp(0.0, 1.0) * 255.0).round() as u8])
        })
    }

    fn suppress(&mut self, index: usize) {
        self.data[index] = 0.0;
    }
}

/// Validate a percentage ratio.
pub fn validate_ratio(ratio: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&ratio) || ratio.is_nan() {
        return Err(FreqMaskError::InvalidRatio(ratio));
    }
    Ok(())
}

/// Number of cells to suppress for a given ratio: `floor(ratio/100 * n)`.
pub(crate) fn suppressed_cells(ratio: f64, total: usize) -> usize {
    ((ratio / 100.0) * total as f64).floor() as usize
}

/// Build a frequency mask of shape `(height, width)` suppressing
/// `floor(ratio/100 * height * width)` cells according to `policy`.
///
/// Deterministic policies produce bit-identical masks for identical
/// `(height, width, ratio)`; `RandomBand` draws its geometry from `rng`.
///
/// # Errors
/// * [`FreqMaskError::InvalidShape`] for zero extents
/// * [`FreqMaskError::InvalidRatio`] for ratios outside `[0, 100]`
pub fn select_mask(
    height: usize,
    width: usize,
    ratio: f64,
    policy: BandPolicy,
    rng: &mut ChaCha8Rng,
) -> Result<FrequencyMask> {
    if height == 0 || width == 0 {
        return Err(FreqMaskError::InvalidShape(format!(
            "expected non-empty mask grid, got {}x{}",
            width, height
        )));
    }
    validate_ratio(ratio)?;

    let total = height * width;
    let k = suppressed_cells(ratio, total);
    let mut mask = FrequencyMask::ones(height, width);
    if k == 0 {
        return Ok(mask);
    }

    match policy {
        BandPolicy::LowPass => {
            let order = distance_order(height, width);
            for &index in &order[total - k..] {
                mask.suppress(index);
            }
        }
        BandPolicy::HighPass => {
            let order = distance_order(height, width);
            for &index in &order[..k] {
                mask.suppress(index);
            }
        }
        BandPolicy::BandReject => {
            let order = distance_order(height, width);
            let start = (total - k) / 2;
            for &index in &order[start..start + k] {
                mask.suppress(index);
            }
        }
        BandPolicy::RandomBand => {
            suppress_random_rect(&mut mask, k, rng);
        }
    }

    Ok(mask)
}

/// Cell indices sorted by squared distance from the centered zero-frequency
/// bin at `(H/2, W/2)`, ties broken by linear index for a deterministic
/// total order.
fn distance_order(height: usize, width: usize) -> Vec<usize> {
    let cy = (height / 2) as i64;
    let cx = (width / 2) as i64;
    let mut order: Vec<usize> = (0..height * width).collect();
    order.sort_unstable_by_key(|&i| {
        let dy = (i / width) as i64 - cy;
        let dx = (i % width) as i64 - cx;
        ((dy * dy + dx * dx) as u64, i)
    });
    order
}

/// Zero exactly `k` cells inside a randomly sized and placed rectangle.
///
/// Rectangle height is drawn uniformly from the feasible range, width is the
/// smallest that fits `k` cells, and the final row is filled partially so
/// the suppressed count is exact.
fn suppress_random_rect(mask: &mut FrequencyMask, k: usize, rng: &mut ChaCha8Rng) {
    let (height, width) = (mask.height(), mask.width());
    let min_h = k.div_ceil(width).max(1);
    let max_h = height.min(k);
    let rect_h = rng.gen_range(min_h..=max_h);
    let rect_w = k.div_ceil(rect_h).min(width);
    let y0 = rng.gen_range(0..=height - rect_h);
    let x0 = rng.gen_range(0..=width - rect_w);

    let mut remaining = k;
    'rows: for y in y0..y0 + rect_h {
        for x in x0..x0 + rect_w {
            if remaining == 0 {
                break 'rows;
            }
            mask.suppress(y * width + x);
            remaining -= 1;
        }
    }
}
