//! Colour-limit report for an image file.
//!
//! Loads an image, estimates display limits with the configured interval
//! method, prints the colour-bar histogram and optionally an ASCII preview,
//! and can write the normalized 8-bit rendering to a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use scaling::interval::DEFAULT_PERCENTILES;
use scaling::io::{load_sample, save_u8_image};
use scaling::{DisplayConfig, ImageDisplay, Method, Stretch};
use std::path::PathBuf;
use tracing::{info, warn};
use viz::histogram::{format_colour_histogram, HistogramConfig, Scale};
use viz::preview::{render_preview, PreviewConfig};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Estimate display colour limits for an image"
)]
struct Args {
    #[arg(help = "Image file (PNG, TIFF, JPEG)")]
    image: PathBuf,

    #[arg(
        short = 'm',
        long,
        help = "Interval method: auto, minmax, percentile, symmetric, zscale, manual"
    )]
    method: Option<String>,

    #[arg(long, help = "Lower percentile (selects the percentile method)")]
    lower: Option<f64>,

    #[arg(long, help = "Upper percentile (selects the percentile method)")]
    upper: Option<f64>,

    #[arg(
        short = 's',
        long,
        help = "Stretch: linear, sqrt, squared, power, powerdist, log, asinh, sinh, contrastbias, histeq"
    )]
    stretch: Option<String>,

    #[arg(short = 'c', long, help = "JSON display config file")]
    config: Option<PathBuf>,

    #[arg(short = 'b', long, help = "Maximum number of histogram bins")]
    bins: Option<usize>,

    #[arg(long, help = "Use a log10 scale for histogram bars")]
    log_hist: bool,

    #[arg(short = 'p', long, help = "Print an ASCII preview of the image")]
    preview: bool,

    #[arg(
        short = 'w',
        long,
        default_value = "64",
        help = "Preview width in characters"
    )]
    width: usize,

    #[arg(short = 'o', long, help = "Write the normalized 8-bit image to this path")]
    output: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<DisplayConfig> {
    let mut config = match &args.config {
        Some(path) => DisplayConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DisplayConfig {
            // linear bars unless --log-hist
            histogram: scaling::HistogramConfig {
                log: false,
                ..Default::default()
            },
            ..DisplayConfig::default()
        },
    };

    if let Some(name) = &args.method {
        config.interval = Method::from_name(name)?;
    }
    if args.lower.is_some() || args.upper.is_some() {
        let (default_lower, default_upper) = DEFAULT_PERCENTILES;
        config.interval = Method::Percentile {
            lower: args.lower.unwrap_or(default_lower),
            upper: args.upper.unwrap_or(default_upper),
        };
    }
    if let Some(name) = &args.stretch {
        config.stretch = Stretch::from_name(name)?;
    }
    if let Some(bins) = args.bins {
        config.histogram.bins = bins;
    }
    if args.log_hist {
        config.histogram.log = true;
    }
    config.show_sliders = false;

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    let sample = load_sample(&args.image)
        .with_context(|| format!("Failed to load image {}", args.image.display()))?;
    let (rows, cols) = sample.dim();
    info!(
        "Loaded {} ({}x{}, {:?}, {} valid pixels)",
        args.image.display(),
        cols,
        rows,
        sample.kind(),
        sample.valid_count()
    );

    let display = ImageDisplay::from_sample(sample, config)?;
    let estimate = display.estimate();
    if let Some(condition) = estimate.degenerate {
        warn!("{condition}");
    }
    info!("Interval method: {}", estimate.method);
    let stretch = display.norm().stretch();
    info!("Stretch: {}", stretch);

    println!("Colour limits ({}): {}", estimate.method, display.clim());
    println!();

    if let Some(histogram) = display.histogram() {
        let text_config = HistogramConfig {
            title: Some(format!("Histogram of {}", args.image.display())),
            scale: Scale::from_log(display.config().histogram.log),
            show_shades: display.config().show_colorbar,
            ..HistogramConfig::default()
        };
        print!(
            "{}",
            format_colour_histogram(histogram, display.clim(), &text_config)?
        );
    }

    if args.preview {
        let preview_config = PreviewConfig {
            width: args.width,
            ..PreviewConfig::default()
        };
        println!();
        print!("{}", render_preview(&display.levels(), &preview_config)?);
    }

    if let Some(output) = &args.output {
        save_u8_image(&display.to_u8(), output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Saved normalized image to {}", output.display());
    }

    Ok(())
}
