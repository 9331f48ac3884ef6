//! Pixel-exact outlines of opaque sprite regions.
//!
//! This module turns the alpha channel of a sprite into polygons:
//! - **Segmentation**: flood fill of 4-connected opaque pixels (`segment.rs`)
//! - **Edge merging**: boundary sides merged into straight runs as they are found (`edge.rs`)
//! - **Tracing**: runs walked into closed, consistently wound outlines (`edge.rs`)
//! - **Mapping**: lattice outlines rescaled into sprite-local space (`mapping.rs`)
//!
//! `generate.rs` chains the stages per sprite and `sink.rs` stores the results.

pub mod edge;
pub mod generate;
pub mod lattice;
pub mod mapping;
pub mod region;
pub mod segment;
pub mod sink;

#[cfg(test)]
mod fixtures;

pub use edge::{Edge, EdgeSet, Outline};
pub use generate::{generate_outlines, trace_outlines, OutlineGenerator, PixelBuffer, PixelSource, SpriteGeometry};
pub use lattice::{CornerPoint, PixelCoord, Side};
pub use mapping::{cap_point_to_rect, map_outlines, outlines_to_flat, Point, Polygon, SourceScale, SpriteRect};
pub use region::Region;
pub use segment::{segment, segment_regions, AlphaView, PixelRect, SegmentScratch, VisitedMask};
pub use sink::{OutlineModel, SpriteId, SpriteOutlineList};
