//! Pixel cells, lattice corners and the sides between them.
//!
//! A pixel `(x, y)` covers the unit square spanned by the lattice points
//! `(x, y)` and `(x + 1, y + 1)`. "Top" is the `+y` direction, which is the
//! next buffer row down for images stored top-to-bottom.

use serde::{Deserialize, Serialize};

use super::edge::Edge;

/// A pixel cell in the scanned rectangle's local frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: i32,
    pub y: i32,
}

/// A lattice point at a pixel corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CornerPoint {
    pub x: i32,
    pub y: i32,
}

impl CornerPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The four edge-adjacent directions of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Visiting order used by the flood fill.
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];
}

impl PixelCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn bottom_left(self) -> CornerPoint {
        CornerPoint::new(self.x, self.y)
    }

    #[inline]
    pub fn top_left(self) -> CornerPoint {
        CornerPoint::new(self.x, self.y + 1)
    }

    #[inline]
    pub fn bottom_right(self) -> CornerPoint {
        CornerPoint::new(self.x + 1, self.y)
    }

    #[inline]
    pub fn top_right(self) -> CornerPoint {
        CornerPoint::new(self.x + 1, self.y + 1)
    }

    /// Corners in the order bottom-left, top-left, bottom-right, top-right.
    pub fn corners(self) -> [CornerPoint; 4] {
        [
            self.bottom_left(),
            self.top_left(),
            self.bottom_right(),
            self.top_right(),
        ]
    }

    /// The pixel sharing `side` with this one.
    #[inline]
    pub fn neighbor(self, side: Side) -> PixelCoord {
        match side {
            Side::Left => PixelCoord::new(self.x - 1, self.y),
            Side::Right => PixelCoord::new(self.x + 1, self.y),
            Side::Top => PixelCoord::new(self.x, self.y + 1),
            Side::Bottom => PixelCoord::new(self.x, self.y - 1),
        }
    }

    /// The unit segment separating this pixel from its neighbor on `side`.
    #[inline]
    pub fn side_edge(self, side: Side) -> Edge {
        match side {
            Side::Left => Edge::new(self.bottom_left(), self.top_left()),
            Side::Right => Edge::new(self.bottom_right(), self.top_right()),
            Side::Top => Edge::new(self.top_left(), self.top_right()),
            Side::Bottom => Edge::new(self.bottom_left(), self.bottom_right()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners() {
        let p = PixelCoord::new(2, 5);
        assert_eq!(
            p.corners(),
            [
                CornerPoint::new(2, 5),
                CornerPoint::new(2, 6),
                CornerPoint::new(3, 5),
                CornerPoint::new(3, 6),
            ]
        );
    }

    #[test]
    fn test_neighbors_are_edge_adjacent() {
        let p = PixelCoord::new(0, 0);
        assert_eq!(p.neighbor(Side::Left), PixelCoord::new(-1, 0));
        assert_eq!(p.neighbor(Side::Right), PixelCoord::new(1, 0));
        assert_eq!(p.neighbor(Side::Top), PixelCoord::new(0, 1));
        assert_eq!(p.neighbor(Side::Bottom), PixelCoord::new(0, -1));
    }

    #[test]
    fn test_side_edge_is_shared_with_neighbor() {
        let p = PixelCoord::new(3, 4);
        let opposite = |side| match side {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        };
        for side in Side::ALL {
            let n = p.neighbor(side);
            assert_eq!(p.side_edge(side), n.side_edge(opposite(side)));
        }
    }

    #[test]
    fn test_side_edges_are_unit_length() {
        let p = PixelCoord::new(-1, 7);
        for side in Side::ALL {
            assert_eq!(p.side_edge(side).length(), 1);
        }
        assert!(p.side_edge(Side::Left).is_vertical());
        assert!(p.side_edge(Side::Top).is_horizontal());
    }
}
