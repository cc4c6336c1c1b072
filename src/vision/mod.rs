//! Text detection pipelines
//!
//! Two straight-line, single-threaded pipelines over a still image:
//! - detect: preprocess, infer, count heatmap cells above a threshold
//! - visualize: the same, plus overlay rendering and compositing onto the
//!   source image
//!
//! Each stage runs exactly once per invocation; data flows strictly forward.

pub mod engine;
pub mod heatmap;
pub mod overlay;
pub mod preprocess;

pub use engine::{OnnxDetector, TextDetector};
pub use heatmap::Heatmap;

use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::DetectError;
use preprocess::PreprocessConfig;

/// Result of the detect-only pipeline
#[derive(Debug)]
pub struct DetectionOutcome {
    /// Number of heatmap cells above the detection threshold
    pub pixel_count: usize,
    /// Whether any cell exceeded the threshold
    pub text_found: bool,
}

/// Result of the visualization pipeline
#[derive(Debug)]
pub struct VisualizationOutcome {
    /// Number of heatmap cells above the overlay threshold
    pub pixel_count: usize,
    /// Path of the composited output, `None` when nothing was detected
    pub output: Option<PathBuf>,
}

/// Run detection on an image file and report how many heatmap cells exceed
/// the threshold.
pub fn run_detection(
    detector: &mut dyn TextDetector,
    image_path: &Path,
    threshold: f32,
    config: &PreprocessConfig,
) -> Result<DetectionOutcome, DetectError> {
    let image = image::open(image_path)?;
    let heatmap = infer_heatmap(detector, &image, config)?;

    let pixel_count = heatmap.count_above(threshold);
    debug!(pixel_count, threshold, "detection scan complete");

    Ok(DetectionOutcome {
        pixel_count,
        text_found: heatmap.has_text(threshold),
    })
}

/// Run detection on an image file and, when anything is found, write the
/// composited heatmap overlay to `output_path`.
///
/// No file is written when the detection count is zero.
pub fn run_visualization(
    detector: &mut dyn TextDetector,
    image_path: &Path,
    output_path: &Path,
    threshold: f32,
    config: &PreprocessConfig,
) -> Result<VisualizationOutcome, DetectError> {
    let image = image::open(image_path)?;
    let heatmap = infer_heatmap(detector, &image, config)?;

    let pixel_count = heatmap.count_above(threshold);
    if pixel_count == 0 {
        info!("No cell above threshold {}; skipping overlay output", threshold);
        return Ok(VisualizationOutcome {
            pixel_count: 0,
            output: None,
        });
    }

    info!("Rendering overlay for {} detected cells", pixel_count);
    let overlay = overlay::render_overlay(&heatmap, threshold);
    let composited = overlay::composite_over(&image, &overlay);
    composited.save(output_path)?;

    Ok(VisualizationOutcome {
        pixel_count,
        output: Some(output_path.to_path_buf()),
    })
}

/// Preprocess the decoded image and invoke the detector once.
fn infer_heatmap(
    detector: &mut dyn TextDetector,
    image: &DynamicImage,
    config: &PreprocessConfig,
) -> Result<Heatmap, DetectError> {
    let tensor = preprocess::prepare_image(image, config);
    info!("Running inference...");
    detector.infer(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    /// Detector stand-in that returns a preset heatmap and records the input
    /// shape it was handed.
    struct ScriptedDetector {
        heatmap: Heatmap,
        seen_shape: Option<(usize, usize, usize, usize)>,
    }

    impl ScriptedDetector {
        fn new(heatmap: Heatmap) -> Self {
            Self {
                heatmap,
                seen_shape: None,
            }
        }
    }

    impl TextDetector for ScriptedDetector {
        fn infer(&mut self, input: Array4<f32>) -> Result<Heatmap, DetectError> {
            self.seen_shape = Some(input.dim());
            Ok(self.heatmap.clone())
        }
    }

    fn small_config() -> PreprocessConfig {
        PreprocessConfig {
            input_size: 4,
            ..Default::default()
        }
    }

    fn write_source_image(dir: &Path) -> PathBuf {
        let path = dir.join("source.png");
        image::RgbImage::from_pixel(8, 6, image::Rgb([0, 0, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn single_hot_heatmap() -> Heatmap {
        let mut data = vec![0.0; 16];
        data[5] = 0.9;
        Heatmap::from_raw(4, 4, data).unwrap()
    }

    #[test]
    fn test_detection_feeds_nchw_tensor() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = write_source_image(dir.path());

        let mut detector = ScriptedDetector::new(Heatmap::from_raw(4, 4, vec![0.0; 16]).unwrap());
        run_detection(&mut detector, &image_path, 0.3, &small_config()).unwrap();

        assert_eq!(detector.seen_shape, Some((1, 3, 4, 4)));
    }

    #[test]
    fn test_blank_heatmap_finds_no_text() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = write_source_image(dir.path());

        let mut detector = ScriptedDetector::new(Heatmap::from_raw(4, 4, vec![0.0; 16]).unwrap());
        let outcome = run_detection(&mut detector, &image_path, 0.3, &small_config()).unwrap();

        assert_eq!(outcome.pixel_count, 0);
        assert!(!outcome.text_found);
    }

    #[test]
    fn test_blank_heatmap_writes_no_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = write_source_image(dir.path());
        let output_path = dir.path().join("result.png");

        let mut detector = ScriptedDetector::new(Heatmap::from_raw(4, 4, vec![0.0; 16]).unwrap());
        let outcome = run_visualization(
            &mut detector,
            &image_path,
            &output_path,
            0.5,
            &small_config(),
        )
        .unwrap();

        assert_eq!(outcome.pixel_count, 0);
        assert!(outcome.output.is_none());
        assert!(!output_path.exists());
    }

    #[test]
    fn test_single_detection_counts_in_both_pipelines() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = write_source_image(dir.path());
        let output_path = dir.path().join("result.png");

        let mut detector = ScriptedDetector::new(single_hot_heatmap());
        let detect = run_detection(&mut detector, &image_path, 0.3, &small_config()).unwrap();
        assert_eq!(detect.pixel_count, 1);
        assert!(detect.text_found);

        let mut detector = ScriptedDetector::new(single_hot_heatmap());
        let visualize = run_visualization(
            &mut detector,
            &image_path,
            &output_path,
            0.5,
            &small_config(),
        )
        .unwrap();

        assert_eq!(visualize.pixel_count, 1);
        assert_eq!(visualize.output.as_deref(), Some(output_path.as_path()));
        assert!(output_path.exists());

        // Composite is written at the source image's dimensions
        let written = image::open(&output_path).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&written), (8, 6));
    }

    #[test]
    fn test_missing_image_is_reported_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("absent.png");
        let output_path = dir.path().join("result.png");

        let mut detector = ScriptedDetector::new(single_hot_heatmap());
        let result = run_visualization(
            &mut detector,
            &image_path,
            &output_path,
            0.5,
            &small_config(),
        );

        assert!(matches!(result, Err(DetectError::Image(_))));
        assert!(!output_path.exists());
    }
}
