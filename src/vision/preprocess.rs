//! Image preprocessing for the detection model
//!
//! Stretches the source image to the model's square input resolution and
//! converts it into a normalized NCHW float tensor.

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

/// Preprocessing configuration
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Square resolution fed to the detection model (typically 640)
    pub input_size: u32,
    /// Mean values for normalization [R, G, B]
    pub mean: [f32; 3],
    /// Std values for normalization [R, G, B]
    pub std: [f32; 3],
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            input_size: 640,
            // ImageNet-style normalization used by PaddleOCR detection models
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// Normalize a single channel byte: (byte / 255 - mean) / std
pub fn normalize_byte(byte: u8, mean: f32, std: f32) -> f32 {
    (byte as f32 / 255.0 - mean) / std
}

/// Convert an interleaved RGB buffer (length 3 * S * S) to a [1, 3, S, S]
/// tensor with one contiguous plane per channel.
pub fn rgb_to_tensor(rgb: &[u8], config: &PreprocessConfig) -> Array4<f32> {
    let size = config.input_size as usize;
    debug_assert_eq!(rgb.len(), 3 * size * size);

    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for i in 0..size * size {
        let (y, x) = (i / size, i % size);
        for c in 0..3 {
            tensor[[0, c, y, x]] = normalize_byte(rgb[i * 3 + c], config.mean[c], config.std[c]);
        }
    }

    tensor
}

/// Full preprocessing: forced (non-aspect-preserving) resize to S x S, alpha
/// dropped, then HWC -> NCHW conversion with normalization.
pub fn prepare_image(image: &DynamicImage, config: &PreprocessConfig) -> Array4<f32> {
    let rgb = image
        .resize_exact(config.input_size, config.input_size, FilterType::Triangle)
        .to_rgb8();

    rgb_to_tensor(rgb.as_raw(), config)
}
