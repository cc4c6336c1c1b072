//! Run Configuration
//!
//! Paths and detection parameters, optionally loaded from a TOML file.
//! Defaults match the shipped PaddleOCR-style detection model.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::vision::preprocess::PreprocessConfig;

/// Top-level settings for a single run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Filesystem locations
    pub paths: PathsConfig,
    /// Detection parameters
    pub detection: DetectionConfig,
}

/// Filesystem locations for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// ONNX detection model file
    pub model: PathBuf,
    /// Source image file
    pub image: PathBuf,
    /// Composited output file (visualize mode only)
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/det.onnx"),
            image: PathBuf::from("image/image_test.png"),
            output: PathBuf::from("result_overlay.png"),
        }
    }
}

/// Detection and preprocessing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Square resolution the image is stretched to before inference
    pub input_size: u32,
    /// Confidence cutoff for detect-only mode
    pub detect_threshold: f32,
    /// Confidence cutoff for the overlay (tuned separately from detect mode)
    pub overlay_threshold: f32,
    /// Per-channel normalization mean [R, G, B]
    pub mean: [f32; 3],
    /// Per-channel normalization std [R, G, B]
    pub std: [f32; 3],
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            input_size: 640,
            detect_threshold: 0.3,
            overlay_threshold: 0.5,
            // ImageNet-style normalization, as expected by the detection model
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

impl DetectionConfig {
    /// Preprocessing parameters derived from these settings
    pub fn preprocess(&self) -> PreprocessConfig {
        PreprocessConfig {
            input_size: self.input_size,
            mean: self.mean,
            std: self.std,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    Ok(config)
}
