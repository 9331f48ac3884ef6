//! Pixel Outline
//!
//! Pixel-exact polygon outlines for sprites, with Python bindings via PyO3
//! and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are `(height, width, channels)` u8 arrays. Opacity is read from:
//! - **Alpha mask**: (height, width, 1) - the single channel
//! - **Gray + alpha**: (height, width, 2) - channel 1
//! - **RGB**: (height, width, 3) - every pixel is opaque
//! - **RGBA**: (height, width, 4) - channel 3
//!
//! A pixel is opaque when its alpha exceeds the configured threshold
//! (0 by default). Row `y` of the array is lattice row `y`.
//!
//! ## Pipeline
//! 1. Flood fill finds every 4-connected opaque region of a sprite rectangle.
//! 2. Boundary sides are merged into maximal straight runs while filling.
//! 3. Runs are walked into closed outlines with one winding for all outlines.
//! 4. Outlines are mapped into sprite-centered units of the actual image,
//!    undoing any downscale of the buffer.

pub mod config;
pub mod error;
pub mod outline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{load_config, ContourMode, OutlineConfig};
pub use error::OutlineError;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::PyReadonlyArray3;
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::config::{ContourMode, OutlineConfig};
    use crate::error::OutlineError;
    use crate::outline::{generate_outlines, trace_outlines, AlphaView, PixelRect, SegmentScratch, SpriteRect};

    fn to_py_err(err: OutlineError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn contour_mode(all_contours: bool) -> ContourMode {
        if all_contours {
            ContourMode::All
        } else {
            ContourMode::Outer
        }
    }

    /// Generate sprite outlines from an image.
    ///
    /// # Arguments
    /// * `image` - Image with 1, 2, 3 or 4 channels (height, width, channels)
    /// * `x`, `y`, `width`, `height` - Sprite rectangle in actual-image pixels
    /// * `actual_width`, `actual_height` - Full image size if `image` is a downscaled copy
    /// * `all_contours` - Also return the boundaries of holes
    ///
    /// # Returns
    /// List of polygons, each a list of (x, y) tuples centered on the sprite
    #[pyfunction]
    #[pyo3(signature = (image, x, y, width, height, actual_width=None, actual_height=None, all_contours=false))]
    #[allow(clippy::too_many_arguments)]
    pub fn extract_outlines<'py>(
        image: PyReadonlyArray3<'py, u8>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        actual_width: Option<usize>,
        actual_height: Option<usize>,
        all_contours: bool,
    ) -> PyResult<Vec<Vec<(f32, f32)>>> {
        let pixels = image.as_array();
        let (buffer_height, buffer_width, _) = pixels.dim();
        let actual_size = (
            actual_width.unwrap_or(buffer_width),
            actual_height.unwrap_or(buffer_height),
        );
        let config = OutlineConfig::default().with_contours(contour_mode(all_contours));
        let polygons = generate_outlines(
            pixels,
            actual_size,
            SpriteRect::new(x, y, width, height),
            &config,
            &mut SegmentScratch::new(),
        )
        .map_err(to_py_err)?;

        Ok(polygons
            .into_iter()
            .map(|polygon| polygon.into_iter().map(|p| (p.x, p.y)).collect())
            .collect())
    }

    /// Trace region outlines in integer lattice coordinates.
    ///
    /// Coordinates are relative to the rectangle's first pixel; no scaling or
    /// centering is applied.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, width, height, all_contours=false))]
    pub fn extract_lattice_outlines<'py>(
        image: PyReadonlyArray3<'py, u8>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        all_contours: bool,
    ) -> PyResult<Vec<Vec<(i32, i32)>>> {
        let alpha = AlphaView::new(image.as_array(), 0).map_err(to_py_err)?;
        let outlines = trace_outlines(
            &alpha,
            PixelRect::new(x, y, width, height),
            contour_mode(all_contours),
            &mut SegmentScratch::new(),
        )
        .map_err(to_py_err)?;

        Ok(outlines
            .into_iter()
            .map(|outline| outline.into_points().into_iter().map(|p| (p.x, p.y)).collect())
            .collect())
    }

    /// Pixel Outline extension module
    #[pymodule]
    pub fn pixel_outline(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(extract_outlines, m)?)?;
        m.add_function(wrap_pyfunction!(extract_lattice_outlines, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixel_outline;
