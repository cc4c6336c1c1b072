//! Error taxonomy for the detection pipelines.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that terminate a detection run.
///
/// A zero-detection result is not one of these: it is a valid outcome that
/// short-circuits overlay output instead.
#[derive(Debug, Error)]
pub enum DetectError {
    /// Model file absent at the configured path, checked before any processing.
    #[error("model file not found at {0:?}")]
    MissingModel(PathBuf),

    /// Source image absent at the configured path, checked before any processing.
    #[error("image file not found at {0:?}")]
    MissingImage(PathBuf),

    /// Any failure inside model load or inference execution.
    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),

    /// The model produced no output tensor under the expected name.
    #[error("model output '{0}' missing from inference results")]
    MissingOutput(String),

    /// The model produced a heatmap with a shape other than [1, 1, S, S].
    #[error("unexpected model output shape {got:?}, expected [1, 1, {size}, {size}]")]
    OutputShape { got: Vec<i64>, size: usize },

    /// Image decode, resize, or encode failure.
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
}
