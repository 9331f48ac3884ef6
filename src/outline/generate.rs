//! The segment → trace → map pipeline for sprites.

use log::{debug, error, warn};
use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::edge::Outline;
use super::mapping::{map_outlines, Polygon, SourceScale, SpriteRect};
use super::segment::{segment, AlphaView, PixelRect, SegmentScratch};
use super::sink::{OutlineModel, SpriteId, SpriteOutlineList};
use crate::config::{ContourMode, OutlineConfig};
use crate::error::OutlineError;

/// Pixel data an outline can be generated from.
///
/// `pixels` has shape `(height, width, channels)`. The buffer may be smaller
/// than the image it stands for; `actual_size` reports the full size.
pub trait PixelSource {
    /// Sources that cannot be read are rejected before `pixels` is called.
    fn is_readable(&self) -> bool {
        true
    }

    fn pixels(&self) -> ArrayView3<'_, u8>;

    fn width(&self) -> usize {
        self.pixels().dim().1
    }

    fn height(&self) -> usize {
        self.pixels().dim().0
    }

    /// `(width, height)` of the full-size image.
    fn actual_size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

impl PixelSource for Array3<u8> {
    fn pixels(&self) -> ArrayView3<'_, u8> {
        self.view()
    }
}

/// An owned pixel buffer with readability and full-size metadata.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    data: Array3<u8>,
    readable: bool,
    actual_size: (usize, usize),
}

impl PixelBuffer {
    /// A readable buffer whose actual size equals its own size.
    pub fn new(data: Array3<u8>) -> Self {
        let (height, width, _) = data.dim();
        Self {
            data,
            readable: true,
            actual_size: (width, height),
        }
    }

    /// Declare that this buffer is a downscaled copy of a larger image.
    pub fn with_actual_size(mut self, width: usize, height: usize) -> Self {
        self.actual_size = (width, height);
        self
    }

    pub fn with_readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }
}

impl PixelSource for PixelBuffer {
    fn is_readable(&self) -> bool {
        self.readable
    }

    fn pixels(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    fn actual_size(&self) -> (usize, usize) {
        self.actual_size
    }
}

/// A named sprite rectangle on a shared pixel source.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteGeometry {
    pub id: SpriteId,
    pub rect: SpriteRect,
}

impl SpriteGeometry {
    pub fn new(id: impl Into<SpriteId>, rect: SpriteRect) -> Self {
        Self { id: id.into(), rect }
    }
}

/// Trace the lattice outlines of every region of `rect`.
///
/// Regions are traced in discovery order. The first region whose boundary
/// cannot be closed aborts the whole call.
pub fn trace_outlines(
    alpha: &AlphaView<'_>,
    rect: PixelRect,
    mode: ContourMode,
    scratch: &mut SegmentScratch,
) -> Result<Vec<Outline>, OutlineError> {
    let regions = segment(alpha, rect, scratch);
    let mut outlines = Vec::with_capacity(regions.len());
    for region in &regions {
        outlines.extend(region.outlines(mode)?);
    }
    Ok(outlines)
}

/// Generates sprite outlines, reusing its scratch buffers between calls.
#[derive(Debug, Default)]
pub struct OutlineGenerator {
    config: OutlineConfig,
    scratch: SegmentScratch,
}

impl OutlineGenerator {
    pub fn new(config: OutlineConfig) -> Self {
        Self {
            config,
            scratch: SegmentScratch::new(),
        }
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Outlines of one sprite, in sprite-centered actual-image units.
    ///
    /// If any region of the sprite has a boundary that cannot be closed, the
    /// whole sprite fails with [`OutlineError::MalformedEdgeCycle`] and no
    /// outlines are returned for it.
    pub fn generate<S>(&mut self, source: &S, rect: SpriteRect) -> Result<Vec<Polygon>, OutlineError>
    where
        S: PixelSource + ?Sized,
    {
        generate_with(&self.config, source, rect, &mut self.scratch)
    }

    /// Outlines of several sprites sharing one pixel source.
    ///
    /// Results keep the order of `sprites`. Each sprite has its own scratch,
    /// so a failure in one never affects the others.
    pub fn generate_all<S>(
        &self,
        source: &S,
        sprites: &[SpriteGeometry],
    ) -> Vec<(SpriteId, Result<Vec<Polygon>, OutlineError>)>
    where
        S: PixelSource + Sync + ?Sized,
    {
        let run = |sprite: &SpriteGeometry| {
            let mut scratch = SegmentScratch::new();
            let result = generate_with(&self.config, source, sprite.rect, &mut scratch);
            (sprite.id.clone(), result)
        };

        if self.config.parallel {
            sprites.par_iter().map(run).collect()
        } else {
            sprites.iter().map(run).collect()
        }
    }

    /// Generate a batch and store the successful results in `model`.
    ///
    /// Existing tessellation detail of a sprite is kept. Returns how many
    /// sprites were updated.
    pub fn generate_into<S>(&self, source: &S, sprites: &[SpriteGeometry], model: &mut OutlineModel) -> usize
    where
        S: PixelSource + Sync + ?Sized,
    {
        let mut updated = 0;
        for (id, result) in self.generate_all(source, sprites) {
            match result {
                Ok(polygons) => {
                    let detail = model.get(&id).map(|l| l.tessellation_detail()).unwrap_or(0.0);
                    let mut list = SpriteOutlineList::with_outlines(id, polygons);
                    list.set_tessellation_detail(detail);
                    model.insert(list);
                    updated += 1;
                }
                Err(err) => warn!("skipping outline for sprite {id}: {err}"),
            }
        }
        updated
    }
}

fn generate_with<S>(
    config: &OutlineConfig,
    source: &S,
    rect: SpriteRect,
    scratch: &mut SegmentScratch,
) -> Result<Vec<Polygon>, OutlineError>
where
    S: PixelSource + ?Sized,
{
    if !source.is_readable() {
        error!("pixel source is not readable");
        return Err(OutlineError::UnreadablePixelSource);
    }
    generate_outlines(source.pixels(), source.actual_size(), rect, config, scratch)
}

/// Outlines of the sprite at `rect` (actual-image pixels) in a buffer that
/// stands for an image of `actual_size`.
pub fn generate_outlines(
    pixels: ArrayView3<'_, u8>,
    actual_size: (usize, usize),
    rect: SpriteRect,
    config: &OutlineConfig,
    scratch: &mut SegmentScratch,
) -> Result<Vec<Polygon>, OutlineError> {
    let (height, width, _) = pixels.dim();
    let (actual_width, actual_height) = actual_size;
    let scale = SourceScale::from_dimensions(width, height, actual_width, actual_height)?;

    let alpha = AlphaView::new(pixels, config.alpha_threshold)?;
    let pixel_rect = rect.to_pixel_rect(scale);
    let outlines = trace_outlines(&alpha, pixel_rect, config.contours, scratch)?;

    debug!(
        "generate: {} outlines, {} vertices for sprite rect {:?}",
        outlines.len(),
        outlines.iter().map(Outline::len).sum::<usize>(),
        rect
    );
    Ok(map_outlines(&outlines, scale, &rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::fixtures::rgba_image;

    fn sheet() -> Array3<u8> {
        // Two 3x2 sprites side by side
        rgba_image(&[
            "##..#.", //
            "#...##",
        ])
    }

    #[test]
    fn test_generate_single_sprite() {
        let mut generator = OutlineGenerator::new(OutlineConfig::default());
        let polygons = generator
            .generate(&sheet(), SpriteRect::new(0.0, 0.0, 3.0, 2.0))
            .unwrap();
        assert_eq!(polygons.len(), 1);
        // L-shaped tromino
        assert_eq!(polygons[0].len(), 6);
        for p in &polygons[0] {
            assert!(p.x >= -1.5 && p.x <= 1.5);
            assert!(p.y >= -1.0 && p.y <= 1.0);
        }
    }

    #[test]
    fn test_unreadable_source() {
        let source = PixelBuffer::new(sheet()).with_readable(false);
        let mut generator = OutlineGenerator::new(OutlineConfig::default());
        let err = generator
            .generate(&source, SpriteRect::new(0.0, 0.0, 3.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, OutlineError::UnreadablePixelSource));
    }

    #[test]
    fn test_capped_source() {
        // Buffer is half the size of the actual 12x4 image.
        let source = PixelBuffer::new(sheet()).with_actual_size(12, 4);
        let mut generator = OutlineGenerator::new(OutlineConfig::default());
        let polygons = generator
            .generate(&source, SpriteRect::new(6.0, 0.0, 6.0, 4.0))
            .unwrap();
        assert_eq!(polygons.len(), 1);
        let max_x = polygons[0].iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let min_y = polygons[0].iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert_eq!(max_x, 3.0);
        assert_eq!(min_y, -2.0);
    }

    #[test]
    fn test_batch_parallel_matches_sequential() {
        let sprites = vec![
            SpriteGeometry::new("left", SpriteRect::new(0.0, 0.0, 3.0, 2.0)),
            SpriteGeometry::new("right", SpriteRect::new(3.0, 0.0, 3.0, 2.0)),
        ];
        let image = sheet();
        let parallel = OutlineGenerator::new(OutlineConfig::default().with_parallel(true))
            .generate_all(&image, &sprites);
        let sequential = OutlineGenerator::new(OutlineConfig::default().with_parallel(false))
            .generate_all(&image, &sprites);

        assert_eq!(parallel.len(), 2);
        for ((id_a, a), (id_b, b)) in parallel.iter().zip(&sequential) {
            assert_eq!(id_a, id_b);
            assert_eq!(a.as_ref().unwrap(), b.as_ref().unwrap());
        }
        assert_eq!(parallel[0].0, SpriteId::from("left"));
    }

    #[test]
    fn test_generate_into_keeps_detail_and_skips_failures() {
        let sprites = vec![SpriteGeometry::new("left", SpriteRect::new(0.0, 0.0, 3.0, 2.0))];
        let mut model = OutlineModel::new();
        let mut existing = SpriteOutlineList::new("left");
        existing.set_tessellation_detail(0.25);
        model.insert(existing);

        let generator = OutlineGenerator::new(OutlineConfig::default());
        assert_eq!(generator.generate_into(&sheet(), &sprites, &mut model), 1);
        let list = model.get(&SpriteId::from("left")).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.tessellation_detail(), 0.25);

        let unreadable = PixelBuffer::new(sheet()).with_readable(false);
        let mut empty = OutlineModel::new();
        assert_eq!(generator.generate_into(&unreadable, &sprites, &mut empty), 0);
        assert!(empty.is_empty());
    }
}
