//! Mapping lattice outlines into sprite-local coordinates.
//!
//! The pixel buffer may be a downscaled ("capped") copy of the actual image,
//! for example when a platform limits texture sizes. Outlines are traced in
//! capped pixels and mapped back to actual-image units centered on the
//! sprite rectangle.

use serde::{Deserialize, Serialize};

use super::edge::Outline;
use super::segment::PixelRect;
use crate::error::OutlineError;

/// A vertex in sprite-local space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A closed polygon in sprite-local space.
pub type Polygon = Vec<Point>;

/// Ratio of the buffer size to the actual image size, per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceScale {
    pub x: f32,
    pub y: f32,
}

impl SourceScale {
    pub fn identity() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    pub fn from_dimensions(
        capped_width: usize,
        capped_height: usize,
        actual_width: usize,
        actual_height: usize,
    ) -> Result<Self, OutlineError> {
        if capped_width == 0 || capped_height == 0 || actual_width == 0 || actual_height == 0 {
            return Err(OutlineError::InvalidScale {
                capped_width,
                capped_height,
                actual_width,
                actual_height,
            });
        }
        Ok(Self {
            x: capped_width as f32 / actual_width as f32,
            y: capped_height as f32 / actual_height as f32,
        })
    }
}

/// A sprite's rectangle in actual-image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SpriteRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The buffer pixels covered by this rectangle, edges rounded to the
    /// nearest capped pixel.
    ///
    /// When the rectangle is not aligned to the capped grid the mapped outline
    /// may be off by up to half a capped pixel, since the rounding offset is
    /// not carried into [`map_outlines`].
    pub fn to_pixel_rect(&self, scale: SourceScale) -> PixelRect {
        let x0 = (self.x * scale.x).round() as i32;
        let y0 = (self.y * scale.y).round() as i32;
        let x1 = ((self.x + self.width) * scale.x).round() as i32;
        let y1 = ((self.y + self.height) * scale.y).round() as i32;
        PixelRect::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }

    /// Corners of this rectangle's size re-centered on the origin.
    pub fn centered_bounds(&self) -> (Point, Point) {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        (Point::new(-hw, -hh), Point::new(hw, hh))
    }
}

/// Clamp `p` into the axis-aligned box `[min, max]`.
#[inline]
pub fn cap_point_to_rect(p: Point, min: Point, max: Point) -> Point {
    Point::new(p.x.min(max.x).max(min.x), p.y.min(max.y).max(min.y))
}

/// Map lattice outlines traced in capped pixels of `target`'s scanned
/// rectangle into `target`-centered actual-image units.
///
/// Vertex count and order are preserved.
pub fn map_outlines(outlines: &[Outline], scale: SourceScale, target: &SpriteRect) -> Vec<Polygon> {
    let (min, max) = target.centered_bounds();
    outlines
        .iter()
        .map(|outline| {
            outline
                .points()
                .iter()
                .map(|v| {
                    let p = Point::new(v.x as f32 / scale.x + min.x, v.y as f32 / scale.y + min.y);
                    cap_point_to_rect(p, min, max)
                })
                .collect()
        })
        .collect()
}

/// Flatten polygons for FFI.
///
/// Format: `[num_polygons, len_1, x1, y1, x2, y2, ..., len_2, ...]`
pub fn outlines_to_flat(polygons: &[Polygon]) -> Vec<f32> {
    let mut result = Vec::with_capacity(1 + polygons.iter().map(|p| 1 + p.len() * 2).sum::<usize>());
    result.push(polygons.len() as f32);

    for polygon in polygons {
        result.push(polygon.len() as f32);
        for point in polygon {
            result.push(point.x);
            result.push(point.y);
        }
    }

    result
}
