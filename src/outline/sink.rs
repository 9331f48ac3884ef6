//! Per-sprite storage for generated outlines.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::mapping::{cap_point_to_rect, Point, Polygon};

/// Identifies a sprite within a sheet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(pub String);

impl From<&str> for SpriteId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for SpriteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The outlines of one sprite plus its tessellation detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteOutlineList {
    sprite_id: SpriteId,
    outlines: Vec<Polygon>,
    #[serde(deserialize_with = "deserialize_detail")]
    tessellation_detail: f32,
}

fn clamp_detail(detail: f32) -> f32 {
    if detail.is_nan() {
        0.0
    } else {
        detail.clamp(0.0, 1.0)
    }
}

fn deserialize_detail<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_detail)
}

impl SpriteOutlineList {
    pub fn new(sprite_id: impl Into<SpriteId>) -> Self {
        Self::with_outlines(sprite_id, Vec::new())
    }

    pub fn with_outlines(sprite_id: impl Into<SpriteId>, outlines: Vec<Polygon>) -> Self {
        Self {
            sprite_id: sprite_id.into(),
            outlines,
            tessellation_detail: 0.0,
        }
    }

    pub fn sprite_id(&self) -> &SpriteId {
        &self.sprite_id
    }

    pub fn outlines(&self) -> &[Polygon] {
        &self.outlines
    }

    pub fn set_outlines(&mut self, outlines: Vec<Polygon>) {
        self.outlines = outlines;
    }

    pub fn tessellation_detail(&self) -> f32 {
        self.tessellation_detail
    }

    /// Stored clamped to `[0, 1]`; NaN becomes 0.
    pub fn set_tessellation_detail(&mut self, detail: f32) {
        self.tessellation_detail = clamp_detail(detail);
    }

    pub fn get(&self, index: usize) -> Option<&Polygon> {
        self.outlines.get(index)
    }

    /// Replace the outline at `index`. Returns false if out of range.
    pub fn set(&mut self, index: usize, outline: Polygon) -> bool {
        match self.outlines.get_mut(index) {
            Some(slot) => {
                *slot = outline;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    /// Copy of the outlines with every vertex clamped to a `width` x `height`
    /// rectangle centered at the origin.
    pub fn to_capped(&self, width: f32, height: f32) -> Vec<Polygon> {
        let max = Point::new(width * 0.5, height * 0.5);
        let min = Point::new(-max.x, -max.y);
        self.outlines
            .iter()
            .map(|outline| outline.iter().map(|&p| cap_point_to_rect(p, min, max)).collect())
            .collect()
    }
}

/// Outline lists for every sprite of a sheet, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineModel {
    lists: Vec<SpriteOutlineList>,
}

impl OutlineModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteOutlineList> + '_ {
        self.lists.iter()
    }

    pub fn get_index(&self, index: usize) -> Option<&SpriteOutlineList> {
        self.lists.get(index)
    }

    pub fn get(&self, id: &SpriteId) -> Option<&SpriteOutlineList> {
        self.lists.iter().find(|l| &l.sprite_id == id)
    }

    pub fn get_mut(&mut self, id: &SpriteId) -> Option<&mut SpriteOutlineList> {
        self.lists.iter_mut().find(|l| &l.sprite_id == id)
    }

    /// Store `list`, replacing the entry for the same sprite if there is one.
    pub fn insert(&mut self, list: SpriteOutlineList) {
        match self.get_mut(&list.sprite_id) {
            Some(existing) => *existing = list,
            None => self.lists.push(list),
        }
    }
}
