//! A single connected component of opaque pixels.

use std::collections::VecDeque;

use super::edge::{Edge, EdgeSet, Outline};
use super::lattice::PixelCoord;
use crate::config::ContourMode;
use crate::error::OutlineError;

/// One 4-connected group of opaque pixels and its boundary.
#[derive(Clone, Debug, Default)]
pub struct Region {
    edges: EdgeSet,
    pending: VecDeque<PixelCoord>,
    pixel_count: usize,
}

impl Region {
    /// Start a region whose flood fill begins at `seed`.
    pub fn new(seed: PixelCoord) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(seed);
        Self {
            edges: EdgeSet::new(),
            pending,
            pixel_count: 0,
        }
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    /// Number of opaque pixels absorbed into the region.
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// A region is complete once nothing is left to expand.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn next_pending(&mut self) -> Option<PixelCoord> {
        self.pending.pop_front()
    }

    pub(crate) fn push_pending(&mut self, coord: PixelCoord) {
        self.pending.push_back(coord);
    }

    pub(crate) fn add_pixel(&mut self) {
        self.pixel_count += 1;
    }

    pub(crate) fn add_edge(&mut self, edge: Edge) {
        self.edges.insert(edge);
    }

    /// Trace the region's boundary.
    ///
    /// With [`ContourMode::Outer`] the result holds exactly one outline (the
    /// outer boundary); with [`ContourMode::All`] hole boundaries follow it.
    pub fn outlines(&self, mode: ContourMode) -> Result<Vec<Outline>, OutlineError> {
        match mode {
            ContourMode::Outer => Ok(vec![self.edges.extract_outline()?]),
            ContourMode::All => self.edges.extract_outlines(),
        }
    }
}
