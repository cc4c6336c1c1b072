//! Heatmap overlay rendering
//!
//! Turns the detection heatmap into a translucent red RGBA layer, stretches
//! it back to the source image's dimensions, and composites it on top.

use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::vision::heatmap::Heatmap;

/// Maximum overlay opacity; full confidence maps to alpha 200 of 255
const ALPHA_SCALE: f32 = 200.0;

/// Render the heatmap as an RGBA image at heatmap resolution.
///
/// Cells strictly above the threshold become red with alpha proportional to
/// confidence; everything else is fully transparent.
pub fn render_overlay(heatmap: &Heatmap, threshold: f32) -> RgbaImage {
    RgbaImage::from_fn(heatmap.width(), heatmap.height(), |x, y| {
        let value = heatmap.get(x, y);
        if value > threshold {
            Rgba([255, 0, 0, (value * ALPHA_SCALE).floor() as u8])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Stretch the overlay to the source image's dimensions and alpha-composite
/// it over the unmodified source.
pub fn composite_over(source: &DynamicImage, overlay: &RgbaImage) -> RgbaImage {
    let (width, height) = source.dimensions();
    let stretched = imageops::resize(overlay, width, height, FilterType::Triangle);

    let mut composited = source.to_rgba8();
    imageops::overlay(&mut composited, &stretched, 0, 0);
    composited
}
