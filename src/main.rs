//! Frequency Masking CLI
//!
//! Command-line front end for the masking augmentation library: apply a
//! configured augmentation to an image, or render a band policy's frequency
//! mask for inspection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use freqmask::utils::logging::{init_logging, LogConfig};
use freqmask::{select_mask, BandPolicy, MaskGenerator, MaskType, DEFAULT_SEED};

/// Frequency masking augmentation for universal deepfake detection
#[derive(Parser, Debug)]
#[command(name = "freqmask")]
#[command(version)]
#[command(about = "Frequency-domain masking augmentation toolkit", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the configured masking augmentation to an image
    Apply {
        /// Path to the input image
        #[arg(short, long)]
        input: String,

        /// Path for the augmented output image
        #[arg(short, long)]
        output: String,

        /// Mask type: spectral, spectral-low, spectral-high, spectral-band,
        /// spectral-random, patch, pixel, or none
        #[arg(short, long, default_value = "spectral")]
        mask_type: String,

        /// Band to remove for spectral masking: low, mid, high, or all
        /// (overrides the policy implied by --mask-type)
        #[arg(short, long)]
        band: Option<String>,

        /// Percentage of frequency or pixel content to remove (0-100)
        #[arg(short, long, default_value = "15")]
        ratio: f64,

        /// Random seed for reproducible mask placement
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Render a band policy's frequency mask as a grayscale image
    Preview {
        /// Band policy: low-pass, high-pass, band-reject, or random-band
        #[arg(short, long, default_value = "low-pass")]
        policy: String,

        /// Percentage of the frequency grid to remove (0-100)
        #[arg(short, long, default_value = "15")]
        ratio: f64,

        /// Mask grid width
        #[arg(long, default_value = "256")]
        width: usize,

        /// Mask grid height
        #[arg(long, default_value = "256")]
        height: usize,

        /// Path for the output PNG
        #[arg(short, long)]
        output: String,

        /// Random seed (only used by random-band)
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_logging(&log_config).map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Apply {
            input,
            output,
            mask_type,
            band,
            ratio,
            seed,
        } => apply(&input, &output, &mask_type, band.as_deref(), ratio, seed),
        Commands::Preview {
            policy,
            ratio,
            width,
            height,
            output,
            seed,
        } => preview(&policy, ratio, width, height, &output, seed),
    }
}

fn apply(
    input: &str,
    output: &str,
    mask_type: &str,
    band: Option<&str>,
    ratio: f64,
    seed: u64,
) -> Result<()> {
    // Resolve and validate configuration before touching the image.
    let resolved: MaskType = match band {
        Some(band_flag) if mask_type.starts_with("spectral") => {
            MaskType::Spectral(BandPolicy::from_band_flag(band_flag)?)
        }
        _ => mask_type.parse()?,
    };
    let augmenter = MaskGenerator::new(resolved, ratio)?;

    print_configuration(&[
        ("Mask Type", resolved.to_string()),
        ("Mask Ratio", format!("{}", ratio)),
        ("Seed", format!("{}", seed)),
        ("Input", input.to_string()),
        ("Output", output.to_string()),
    ]);

    let image = image::open(input)
        .with_context(|| format!("Failed to load image '{}'", input))?
        .to_rgb8();
    info!("Loaded {}x{} image", image.width(), image.height());

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let augmented = augmenter.transform(&image, &mut rng)?;
    augmented
        .save(output)
        .with_context(|| format!("Failed to save image '{}'", output))?;
    info!("Wrote augmented image to {}", output);

    Ok(())
}

fn preview(
    policy: &str,
    ratio: f64,
    width: usize,
    height: usize,
    output: &str,
    seed: u64,
) -> Result<()> {
    let policy: BandPolicy = policy.parse()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mask = select_mask(height, width, ratio, policy, &mut rng)?;

    print_configuration(&[
        ("Policy", policy.to_string()),
        ("Mask Ratio", format!("{}", ratio)),
        ("Grid", format!("{}x{}", width, height)),
        (
            "Suppressed",
            format!(
                "{} / {} cells",
                mask.suppressed_count(),
                mask.height() * mask.width()
            ),
        ),
    ]);

    mask.to_image()
        .save(output)
        .with_context(|| format!("Failed to save mask preview '{}'", output))?;
    info!("Wrote mask preview to {}", output);

    Ok(())
}

fn print_configuration(entries: &[(&str, String)]) {
    println!("\n{}", "Selected Configuration:".bold());
    println!("{}", "-".repeat(30));
    for (key, value) in entries {
        println!("{}: {}", key.cyan(), value);
    }
    println!("{}\n", "-".repeat(30));
}
