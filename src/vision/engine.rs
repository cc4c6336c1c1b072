//! ONNX Runtime inference for the detection model
//!
//! Loads a pretrained PaddleOCR-style detection model and runs single-image
//! inference, returning the probability heatmap.

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{debug, info};

use crate::error::DetectError;
use crate::vision::heatmap::Heatmap;

/// Narrow inference seam: accepts a [1, 3, S, S] tensor, returns an S x S
/// heatmap. Lets the pipeline run against a scripted stand-in under test.
pub trait TextDetector {
    fn infer(&mut self, input: Array4<f32>) -> Result<Heatmap, DetectError>;
}

/// Text detector backed by an ONNX Runtime session
pub struct OnnxDetector {
    session: Session,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl OnnxDetector {
    /// Load and compile the detection model from a file (CPU execution).
    pub fn load(model_path: &Path) -> Result<Self, DetectError> {
        info!("Loading ONNX model from {:?}", model_path);

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(model_path)?;

        let input_names: Vec<String> = session
            .inputs
            .iter()
            .map(|input| input.name.clone())
            .collect();

        let output_names: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();

        info!(
            "Model loaded. Inputs: {:?}, Outputs: {:?}",
            input_names, output_names
        );

        Ok(Self {
            session,
            input_names,
            output_names,
        })
    }
}

impl TextDetector for OnnxDetector {
    fn infer(&mut self, input: Array4<f32>) -> Result<Heatmap, DetectError> {
        let (_, _, height, width) = input.dim();

        let shape = [1_usize, 3, height, width];
        let (data, _) = input.into_raw_vec_and_offset();
        let value = ort::value::Value::from_array((shape.as_slice(), data))?;

        let output_name = self
            .output_names
            .first()
            .cloned()
            .ok_or_else(|| DetectError::MissingOutput("output".to_string()))?;

        // First input slot; detection models expose a single input
        debug!("Submitting tensor to input slot {:?}", self.input_names.first());
        let outputs = self.session.run(ort::inputs![value])?;
        let output = outputs
            .get(output_name.as_str())
            .ok_or(DetectError::MissingOutput(output_name))?;

        let (out_shape, out_data) = output.try_extract_tensor::<f32>()?;
        let dims: Vec<i64> = out_shape.iter().copied().collect();
        if dims != [1, 1, height as i64, width as i64] {
            return Err(DetectError::OutputShape {
                got: dims,
                size: height,
            });
        }

        Heatmap::from_raw(width as u32, height as u32, out_data.to_vec()).ok_or(
            DetectError::OutputShape {
                got: vec![1, 1, height as i64, width as i64],
                size: height,
            },
        )
    }
}
