//! Spectrum Transform Module
//!
//! Forward and inverse 2D Fourier transforms for RGB images, with the
//! zero-frequency component shifted to the grid center. This is the
//! foundation the frequency masking augmenter builds on: masks are defined
//! on the centered grid and applied by element-wise multiplication before
//! the inverse transform reconstructs the spatial image.
//!
//! ## Conventions
//!
//! - Each channel is transformed independently at f64 precision; the
//!   spatial shape is preserved exactly (no padding or cropping).
//! - After the forward shift, the zero-frequency bin sits at `(H/2, W/2)`.
//! - The inverse transform normalizes by `1/(H*W)`, takes the real part
//!   (the imaginary residue is floating-point noise, silently discarded),
//!   clamps to `[0, 255]` and rounds back to `u8`.
//!
//! `inverse(forward(image))` reproduces `image` exactly after rounding.

use image::RgbImage;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::mask::band::FrequencyMask;
use crate::utils::error::{FreqMaskError, Result};

/// Centered complex frequency-domain representation of an RGB image.
///
/// Ephemeral: created by [`Spectrum::forward`], optionally masked, and
/// consumed by [`Spectrum::inverse`] within a single augmentation call.
#[derive(Debug, Clone)]
pub struct Spectrum {
    height: usize,
    width: usize,
    /// One centered plane per channel, row-major.
    planes: Vec<Vec<Complex<f64>>>,
}

impl Spectrum {
    /// Compute the centered 2D Fourier transform of each channel.
    ///
    /// # Errors
    /// Returns [`FreqMaskError::InvalidShape`] for zero-sized images.
    pub fn forward(image: &RgbImage) -> Result<Self> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(FreqMaskError::InvalidShape(format!(
                "expected non-empty image, got {}x{}",
                w, h
            )));
        }
        let (width, height) = (w as usize, h as usize);

        let mut planes = Vec::with_capacity(3);
        for channel in 0..3 {
            let mut plane: Vec<Complex<f64>> = image
                .pixels()
                .map(|p| Complex::new(p.0[channel] as f64, 0.0))
                .collect();
            fft2(&mut plane, height, width, false);
            plane = roll2d(&plane, height, width, height / 2, width / 2);
            planes.push(plane);
        }

        Ok(Self {
            height,
            width,
            planes,
        })
    }

    /// Spatial height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Spatial width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Magnitude of the frequency bin at centered grid position `(y, x)`,
    /// averaged over channels. Used for inspection and tests.
    pub fn magnitude(&self, y: usize, x: usize) -> f64 {
        let idx = y * self.width + x;
        self.planes.iter().map(|p| p[idx].norm()).sum::<f64>() / self.planes.len() as f64
    }

    /// Multiply every channel plane element-wise by the mask.
    ///
    /// # Errors
    /// Returns [`FreqMaskError::InvalidShape`] if the mask shape does not
    /// match the spectrum's spatial shape.
    pub fn apply_mask(&mut self, mask: &FrequencyMask) -> Result<()> {
        if mask.height() != self.height || mask.width() != self.width {
            return Err(FreqMaskError::InvalidShape(format!(
                "mask shape {}x{} does not match spectrum shape {}x{}",
                mask.width(),
                mask.height(),
                self.width,
                self.height
            )));
        }
        for plane in &mut self.planes {
            for (value, weight) in plane.iter_mut().zip(mask.as_slice()) {
                *value *= *weight;
            }
        }
        Ok(())
    }

    /// Reconstruct the spatial image from the (possibly masked) spectrum.
    pub fn inverse(self) -> Result<RgbImage> {
        let (height, width) = (self.height, self.width);
        let mut spatial = Vec::with_capacity(3);
        for mut plane in self.planes {
            // Undo the center shift before the inverse transform.
            plane = roll2d(
                &plane,
                height,
                width,
                height - height / 2,
                width - width / 2,
            );
            fft2(&mut plane, height, width, true);
            spatial.push(plane);
        }

        let mut image = RgbImage::new(width as u32, height as u32);
        for (i, pixel) in image.pixels_mut().enumerate() {
            for channel in 0..3 {
                let value = spatial[channel][i].re.clamp(0.0, 255.0).round();
                pixel.0[channel] = value as u8;
            }
        }
        Ok(image)
    }
}

/// In-place 2D FFT over a row-major plane: rows first, then columns via
/// transposition. The inverse path includes the `1/(H*W)` normalization
/// that rustfft leaves to the caller.
fn fft2(plane: &mut Vec<Complex<f64>>, height: usize, width: usize, inverse: bool) {
    let mut planner = FftPlanner::new();
    let row_fft = if inverse {
        planner.plan_fft_inverse(width)
    } else {
        planner.plan_fft_forward(width)
    };
    // rustfft processes the buffer in chunks of the planned length,
    // so one call covers every row.
    row_fft.process(plane);

    let mut transposed = transpose(plane, height, width);
    let col_fft = if inverse {
        planner.plan_fft_inverse(height)
    } else {
        planner.plan_fft_forward(height)
    };
    col_fft.process(&mut transposed);
    *plane = transpose(&transposed, width, height);

    if inverse {
        let scale = 1.0 / (height as f64 * width as f64);
        for value in plane.iter_mut() {
            *value *= scale;
        }
    }
}

fn transpose(plane: &[Complex<f64>], height: usize, width: usize) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::new(0.0, 0.0); plane.len()];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = plane[y * width + x];
        }
    }
    out
}

/// Circular shift of a row-major plane by `(dy, dx)`.
///
/// A shift of `(H/2, W/2)` moves the zero-frequency bin to the grid center;
/// shifting by the complement `(H - H/2, W - W/2)` undoes it, which differs
/// for odd extents.
fn roll2d(
    plane: &[Complex<f64>],
    height: usize,
    width: usize,
    dy: usize,
    dx: usize,
) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::new(0.0, 0.0); plane.len()];
    for y in 0..height {
        let ny = (y + dy) % height;
        for x in 0..width {
            let nx = (x + dx) % width;
            out[ny * width + nx] = plane[y * width + x];
        }
    }
    out
}
