//! Connected-component segmentation of opaque pixels.
//!
//! The scan walks a rectangle of the pixel buffer row by row and grows a
//! [`Region`] from every opaque pixel not yet claimed, using an explicit
//! worklist so stack depth does not depend on region size. Boundary sides are
//! pushed into the region's edge set as they are discovered.

use log::debug;
use ndarray::ArrayView3;

use super::lattice::{PixelCoord, Side};
use super::region::Region;
use crate::error::OutlineError;

/// Binary opacity lookup over an image of shape `(height, width, channels)`.
///
/// The alpha channel is the last channel of gray+alpha and RGBA images, the
/// only channel of a single-channel mask; RGB images are fully opaque.
#[derive(Clone, Copy, Debug)]
pub struct AlphaView<'a> {
    pixels: ArrayView3<'a, u8>,
    channel: Option<usize>,
    threshold: u8,
}

impl<'a> AlphaView<'a> {
    pub fn new(pixels: ArrayView3<'a, u8>, threshold: u8) -> Result<Self, OutlineError> {
        let channel = match pixels.dim().2 {
            1 => Some(0),
            2 => Some(1),
            3 => None,
            4 => Some(3),
            other => return Err(OutlineError::UnsupportedChannels(other)),
        };
        Ok(Self {
            pixels,
            channel,
            threshold,
        })
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    #[inline]
    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        match self.channel {
            Some(c) => self.pixels[[y, x, c]] > self.threshold,
            None => true,
        }
    }
}

/// An integer rectangle of the pixel buffer: `x`/`y` is the first column/row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether a local coordinate falls inside the rectangle.
    #[inline]
    pub fn contains_local(&self, p: PixelCoord) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }
}

/// One visited flag per buffer pixel.
#[derive(Clone, Debug, Default)]
pub struct VisitedMask {
    cells: Vec<bool>,
    width: usize,
    height: usize,
}

impl VisitedMask {
    /// Clear all flags and size the mask for a `width` x `height` buffer.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.cells.clear();
        self.cells.resize(width * height, false);
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn is_visited(&self, index: usize) -> bool {
        self.cells[index]
    }

    #[inline]
    pub fn mark(&mut self, index: usize) {
        self.cells[index] = true;
    }

    /// Buffer index of pixel `(x, y)`, if it lies inside the buffer.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Count pixels of `rect` (clipped to the buffer) that were never visited.
    pub fn unvisited_in(&self, rect: PixelRect) -> usize {
        let mut count = 0;
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                if let Some(idx) = self.index_of(x, y) {
                    if !self.cells[idx] {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

/// Reusable buffers for [`segment`].
///
/// Owned by the caller so repeated extractions avoid reallocating, while
/// independent extractions (one scratch each) can run on different threads.
#[derive(Clone, Debug, Default)]
pub struct SegmentScratch {
    visited: VisitedMask,
}

impl SegmentScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> &VisitedMask {
        &self.visited
    }
}

/// A local coordinate resolved against the buffer.
#[derive(Clone, Copy)]
struct Cell {
    index: usize,
    x: usize,
    y: usize,
}

struct Grid<'v, 'a> {
    alpha: &'v AlphaView<'a>,
    rect: PixelRect,
}

impl Grid<'_, '_> {
    /// Resolve `p` if it is inside the buffer, regardless of the rectangle.
    #[inline]
    fn in_buffer(&self, p: PixelCoord, visited: &VisitedMask) -> Option<Cell> {
        let x = self.rect.x + p.x;
        let y = self.rect.y + p.y;
        visited.index_of(x, y).map(|index| Cell {
            index,
            x: x as usize,
            y: y as usize,
        })
    }

    /// Resolve `p` if it is inside both the rectangle and the buffer.
    #[inline]
    fn in_rect(&self, p: PixelCoord, visited: &VisitedMask) -> Option<Cell> {
        if !self.rect.contains_local(p) {
            return None;
        }
        self.in_buffer(p, visited)
    }

    #[inline]
    fn is_opaque(&self, cell: Cell) -> bool {
        self.alpha.is_opaque(cell.x, cell.y)
    }
}

/// Find every 4-connected opaque region inside `rect`.
///
/// Regions come back in the order their first pixel is met by a row-major
/// scan; their edges are expressed in lattice coordinates local to `rect`.
pub fn segment(alpha: &AlphaView<'_>, rect: PixelRect, scratch: &mut SegmentScratch) -> Vec<Region> {
    let visited = &mut scratch.visited;
    visited.reset(alpha.width(), alpha.height());

    let grid = Grid { alpha, rect };
    let mut regions = Vec::new();

    for y in 0..rect.height {
        for x in 0..rect.width {
            let start = PixelCoord::new(x, y);
            let Some(cell) = grid.in_buffer(start, visited) else {
                continue;
            };
            if visited.is_visited(cell.index) {
                continue;
            }
            if !grid.is_opaque(cell) {
                visited.mark(cell.index);
                continue;
            }

            let mut region = Region::new(start);
            grow(&grid, visited, &mut region);
            regions.push(region);
        }
    }

    debug!(
        "segment: {} regions in {}x{} rect at ({}, {})",
        regions.len(),
        rect.width,
        rect.height,
        rect.x,
        rect.y
    );
    regions
}

/// Convenience wrapper around [`segment`] with freshly allocated scratch.
pub fn segment_regions(alpha: &AlphaView<'_>, rect: PixelRect) -> Vec<Region> {
    segment(alpha, rect, &mut SegmentScratch::new())
}

/// Drain the region's worklist, absorbing opaque pixels and recording the
/// sides that face anything else.
fn grow(grid: &Grid<'_, '_>, visited: &mut VisitedMask, region: &mut Region) {
    while let Some(pt) = region.next_pending() {
        let Some(cell) = grid.in_rect(pt, visited) else {
            continue;
        };
        if visited.is_visited(cell.index) {
            continue;
        }
        visited.mark(cell.index);
        if !grid.is_opaque(cell) {
            continue;
        }
        region.add_pixel();

        for side in Side::ALL {
            let neighbor = pt.neighbor(side);
            let inside = grid.in_rect(neighbor, visited).filter(|&n| grid.is_opaque(n));
            match inside {
                Some(n) => {
                    if !visited.is_visited(n.index) {
                        region.push_pending(neighbor);
                    }
                }
                None => {
                    region.add_edge(pt.side_edge(side));
                    if let Some(n) = grid.in_buffer(neighbor, visited) {
                        visited.mark(n.index);
                    }
                }
            }
        }
    }
}
