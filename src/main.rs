//! textspot - text detection heatmap inference for still images
//!
//! Runs a pretrained ONNX text-detection model over a single image, counts
//! heatmap cells above a confidence threshold, and optionally composites a
//! translucent red heatmap overlay onto the source image.

mod config;
mod error;
mod vision;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::DetectError;
use crate::vision::OnnxDetector;

/// Detect text in a still image with a pretrained ONNX heatmap model
#[derive(Parser, Debug)]
#[command(name = "textspot")]
#[command(about = "Detect text in a still image and optionally render a heatmap overlay")]
struct Args {
    /// TOML configuration file (built-in defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model file, overriding the configured path
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Source image file, overriding the configured path
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Composited output file, overriding the configured path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render the detection heatmap over the source image and write the result
    #[arg(long)]
    visualize: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        report_failure(&err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(model) = &args.model {
        config.paths.model = model.clone();
    }
    if let Some(image) = &args.image {
        config.paths.image = image.clone();
    }
    if let Some(output) = &args.output {
        config.paths.output = output.clone();
    }

    check_resources(&config.paths)?;

    let mut detector = OnnxDetector::load(&config.paths.model)?;
    let preprocess = config.detection.preprocess();

    if args.visualize {
        let outcome = vision::run_visualization(
            &mut detector,
            &config.paths.image,
            &config.paths.output,
            config.detection.overlay_threshold,
            &preprocess,
        )?;

        println!("Detected text pixels: {}", outcome.pixel_count);
        match outcome.output {
            Some(path) => println!("Overlay written to {}", path.display()),
            None => println!("No text above threshold; no output file written"),
        }
    } else {
        let outcome = vision::run_detection(
            &mut detector,
            &config.paths.image,
            config.detection.detect_threshold,
            &preprocess,
        )?;

        println!("Detected text pixels: {}", outcome.pixel_count);
        if outcome.text_found {
            println!(">> Text found in image");
        } else {
            println!(">> No text found in image");
        }
    }

    info!("Run complete");
    Ok(())
}

/// Both resources must exist before any processing starts.
fn check_resources(paths: &config::PathsConfig) -> Result<(), DetectError> {
    if !paths.model.exists() {
        return Err(DetectError::MissingModel(paths.model.clone()));
    }
    if !paths.image.exists() {
        return Err(DetectError::MissingImage(paths.image.clone()));
    }
    Ok(())
}

/// Report a terminal failure; nothing panics past this point.
fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<DetectError>() {
        Some(e @ (DetectError::MissingModel(_) | DetectError::MissingImage(_))) => {
            error!("{e}");
        }
        _ => error!("Run failed: {err:#}"),
    }
}
