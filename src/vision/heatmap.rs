//! Detection heatmap produced by the model
//!
//! A flat grid of per-cell text confidence values in [0.0, 1.0], read-only
//! once produced by inference.

/// Probability heatmap at the model's input resolution
#[derive(Debug, Clone)]
pub struct Heatmap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Heatmap {
    /// Build a heatmap from a flat row-major buffer.
    ///
    /// Returns `None` if the buffer length does not match width * height.
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Confidence value at (x, y)
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    /// Count cells whose confidence strictly exceeds the threshold
    pub fn count_above(&self, threshold: f32) -> usize {
        self.data.iter().filter(|&&v| v > threshold).count()
    }

    /// Whether any cell exceeds the threshold
    pub fn has_text(&self, threshold: f32) -> bool {
        self.count_above(threshold) > 0
    }
}
