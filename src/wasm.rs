//! WebAssembly exports for outline extraction.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! passed as flat RGBA bytes (length = width * height * 4).

use ndarray::ArrayView3;
use wasm_bindgen::prelude::*;

use crate::config::{ContourMode, OutlineConfig};
use crate::outline::{generate_outlines, outlines_to_flat, SegmentScratch, SpriteRect};

/// Generate sprite outlines from RGBA bytes.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width`, `height` - Buffer size in pixels
/// * `x`, `y`, `rect_width`, `rect_height` - Sprite rectangle in actual-image pixels
/// * `actual_width`, `actual_height` - Full image size (equal to the buffer size unless downscaled)
/// * `all_contours` - Also return the boundaries of holes
///
/// # Returns
/// Flat array: [num_polygons, len1, x1, y1, x2, y2, ..., len2, ...]
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn extract_outlines_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    x: f32,
    y: f32,
    rect_width: f32,
    rect_height: f32,
    actual_width: usize,
    actual_height: usize,
    all_contours: bool,
) -> Result<Vec<f32>, JsError> {
    let pixels = ArrayView3::from_shape((height, width, 4), data)
        .map_err(|e| JsError::new(&format!("invalid dimensions: {e}")))?;

    let contours = if all_contours {
        ContourMode::All
    } else {
        ContourMode::Outer
    };
    let config = OutlineConfig::default().with_contours(contours);

    let polygons = generate_outlines(
        pixels,
        (actual_width, actual_height),
        SpriteRect::new(x, y, rect_width, rect_height),
        &config,
        &mut SegmentScratch::new(),
    )
    .map_err(|e| JsError::new(&e.to_string()))?;

    Ok(outlines_to_flat(&polygons))
}
