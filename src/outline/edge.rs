//! Boundary edges of a region and the closed outlines they form.
//!
//! Edges are merged as they are inserted, so an [`EdgeSet`] holds the maximal
//! straight runs of a boundary and walking it yields one vertex per corner
//! rather than one per pixel side.

use std::collections::{HashMap, HashSet};

use super::lattice::CornerPoint;
use crate::error::OutlineError;

/// An axis-aligned boundary segment between two lattice points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub v0: CornerPoint,
    pub v1: CornerPoint,
}

impl Edge {
    pub const fn new(v0: CornerPoint, v1: CornerPoint) -> Self {
        Self { v0, v1 }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.v0.y == self.v1.y
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.v0.x == self.v1.x
    }

    /// Number of unit pixel sides covered by this edge.
    pub fn length(&self) -> i32 {
        (self.v1.x - self.v0.x).abs() + (self.v1.y - self.v0.y).abs()
    }

    /// The endpoint opposite `p`, if `p` is an endpoint.
    #[inline]
    pub fn other_end(&self, p: CornerPoint) -> Option<CornerPoint> {
        if self.v0 == p {
            Some(self.v1)
        } else if self.v1 == p {
            Some(self.v0)
        } else {
            None
        }
    }

    /// True if `p` lies on this edge, endpoints included.
    pub fn covers(&self, p: CornerPoint) -> bool {
        let (x0, x1) = (self.v0.x.min(self.v1.x), self.v0.x.max(self.v1.x));
        let (y0, y1) = (self.v0.y.min(self.v1.y), self.v0.y.max(self.v1.y));
        p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1
    }

    /// Join two collinear edges meeting end to end.
    ///
    /// Returns `None` unless both edges have the same orientation, share
    /// exactly one endpoint, and continue away from it in opposite directions.
    pub fn try_combine(&self, other: &Edge) -> Option<Edge> {
        let same_orientation = (self.is_horizontal() && other.is_horizontal())
            || (self.is_vertical() && other.is_vertical());
        if !same_orientation {
            return None;
        }

        let (shared, a, b) = if self.v0 == other.v0 {
            (self.v0, self.v1, other.v1)
        } else if self.v0 == other.v1 {
            (self.v0, self.v1, other.v0)
        } else if self.v1 == other.v1 {
            (self.v1, self.v0, other.v0)
        } else if self.v1 == other.v0 {
            (self.v1, self.v0, other.v1)
        } else {
            return None;
        };

        // Overlapping runs would point the same way from the shared corner.
        let da = (a.x - shared.x).signum() + (a.y - shared.y).signum();
        let db = (b.x - shared.x).signum() + (b.y - shared.y).signum();
        if da == 0 || da == db {
            return None;
        }

        Some(Edge::new(a, b))
    }
}

/// A closed polygon in lattice coordinates.
///
/// Vertices are listed so that [`Outline::signed_area`] is positive: clockwise
/// on screen when `y` grows downward, counter-clockwise when it grows upward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outline {
    points: Vec<CornerPoint>,
}

impl Outline {
    /// Wrap a walked vertex cycle, normalizing its winding.
    pub fn from_cycle(mut points: Vec<CornerPoint>) -> Self {
        normalize_winding(&mut points);
        Self { points }
    }

    pub fn points(&self) -> &[CornerPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<CornerPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices: the outline encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Shoelace area, positive for normalized outlines.
    pub fn signed_area(&self) -> f64 {
        0.5 * shoelace_sum(&self.points) as f64
    }

    /// Consecutive vertex pairs, including the closing pair.
    pub fn segments(&self) -> impl Iterator<Item = (CornerPoint, CornerPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

fn shoelace_sum(points: &[CornerPoint]) -> i64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum()
}

/// Index of the vertex with minimum `y`, ties broken by maximum `x`.
fn pivot_index(points: &[CornerPoint]) -> usize {
    let mut idx = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let best = points[idx];
        if p.y < best.y || (p.y == best.y && p.x > best.x) {
            idx = i;
        }
    }
    idx
}

/// Reverse `points` unless the turn at the extreme vertex is clockwise in the
/// `y`-down sense.
fn normalize_winding(points: &mut [CornerPoint]) {
    let n = points.len();
    if n < 3 {
        return;
    }

    let idx = pivot_index(points);
    let pivot = points[idx];
    let prev = points[(idx + n - 1) % n];
    let next = points[(idx + 1) % n];

    let cross = (prev.x - pivot.x) as i64 * (next.y - pivot.y) as i64
        - (prev.y - pivot.y) as i64 * (next.x - pivot.x) as i64;
    if cross >= 0 {
        points.reverse();
    }
}

/// Boundary edges of one region, merged on insert.
///
/// Edges live in slots so that removal during merging keeps the indices held
/// by the per-corner lookup valid. Slot order, and with it every walk over the
/// set, depends only on the insertion sequence.
///
/// Runs are not merged through a corner where the boundary touches itself
/// diagonally. Such a corner keeps four edges ending at it, so the walk can
/// pick the turn that keeps each cycle from crossing itself.
#[derive(Clone, Debug, Default)]
pub struct EdgeSet {
    slots: Vec<Option<Edge>>,
    free: Vec<usize>,
    by_corner: HashMap<CornerPoint, Vec<usize>>,
    /// Corners some stored edge was merged through.
    joints: HashSet<CornerPoint>,
    len: usize,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stored edges in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.slots.iter().flatten()
    }

    /// Total number of unit pixel sides covered by the stored edges.
    pub fn perimeter(&self) -> usize {
        self.iter().map(|e| e.length() as usize).sum()
    }

    /// Add a boundary segment, merging it with collinear neighbors.
    pub fn insert(&mut self, edge: Edge) {
        for corner in [edge.v0, edge.v1] {
            self.split_at(corner);
        }

        let mut edge = edge;
        while let Some((slot, shared, merged)) = self.find_combinable(&edge) {
            self.remove(slot);
            self.joints.insert(shared);
            edge = merged;
        }
        self.store(edge);
    }

    /// Cut the edge merged through `corner` back into two runs ending there.
    fn split_at(&mut self, corner: CornerPoint) {
        if !self.joints.remove(&corner) {
            return;
        }
        let through = self.slots.iter().position(|slot| {
            slot.is_some_and(|e| e.covers(corner) && e.other_end(corner).is_none())
        });
        let Some(slot) = through else {
            return;
        };
        if let Some(edge) = self.slots[slot] {
            self.remove(slot);
            self.store(Edge::new(edge.v0, corner));
            self.store(Edge::new(corner, edge.v1));
        }
    }

    fn has_crossing_edge(&self, corner: CornerPoint, edge: &Edge) -> bool {
        self.by_corner.get(&corner).is_some_and(|slots| {
            slots.iter().any(|&s| {
                self.slots[s].is_some_and(|other| other.is_horizontal() != edge.is_horizontal())
            })
        })
    }

    fn find_combinable(&self, edge: &Edge) -> Option<(usize, CornerPoint, Edge)> {
        for corner in [edge.v0, edge.v1] {
            let Some(slots) = self.by_corner.get(&corner) else {
                continue;
            };
            if self.has_crossing_edge(corner, edge) {
                continue;
            }
            for &slot in slots {
                if let Some(candidate) = &self.slots[slot] {
                    if let Some(merged) = candidate.try_combine(edge) {
                        return Some((slot, corner, merged));
                    }
                }
            }
        }
        None
    }

    fn store(&mut self, edge: Edge) {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(edge);
                slot
            }
            None => {
                self.slots.push(Some(edge));
                self.slots.len() - 1
            }
        };
        self.by_corner.entry(edge.v0).or_default().push(slot);
        self.by_corner.entry(edge.v1).or_default().push(slot);
        self.len += 1;
    }

    fn remove(&mut self, slot: usize) {
        let Some(edge) = self.slots[slot].take() else {
            return;
        };
        for corner in [edge.v0, edge.v1] {
            if let Some(slots) = self.by_corner.get_mut(&corner) {
                slots.retain(|&s| s != slot);
                if slots.is_empty() {
                    self.by_corner.remove(&corner);
                }
            }
        }
        self.free.push(slot);
        self.len -= 1;
    }

    /// The lowest corner (minimum `y`, then `x`) with unused edges, and the
    /// first of those edges.
    ///
    /// No edge of the cycle through that corner lies below or left of it, so
    /// the cycle encloses the pixel above and right of the corner.
    fn cycle_start(&self, used: &[bool]) -> Option<(CornerPoint, usize)> {
        self.by_corner
            .iter()
            .filter_map(|(corner, slots)| {
                let slot = slots.iter().copied().filter(|&s| !used[s]).min()?;
                Some((*corner, slot))
            })
            .min_by_key(|(corner, _)| (corner.y, corner.x))
    }

    /// The unused edge to leave `current` by after arriving from `prev`.
    ///
    /// At a corner with several unused edges the walk turns left or right as
    /// `turn_left` says, relative to `y` pointing up.
    fn next_slot(&self, prev: CornerPoint, current: CornerPoint, turn_left: bool, used: &[bool]) -> Option<usize> {
        let slots = self.by_corner.get(&current)?;
        let open = move || slots.iter().copied().filter(move |&s| !used[s]);
        if open().nth(1).is_none() {
            return open().next();
        }

        let dx = (current.x - prev.x).signum();
        let dy = (current.y - prev.y).signum();
        let turn = if turn_left { (-dy, dx) } else { (dy, -dx) };
        open()
            .find(|&s| {
                self.slots[s]
                    .and_then(|e| e.other_end(current))
                    .is_some_and(|n| ((n.x - current.x).signum(), (n.y - current.y).signum()) == turn)
            })
            .or_else(|| open().next())
    }

    /// Walk one closed cycle from its lowest corner, consuming its edges.
    ///
    /// `hole` cycles enclose pixels outside the region. At corners where the
    /// boundary touches itself the walk keeps to the outside pixels, so each
    /// cycle goes around one connected piece of them.
    fn walk_cycle(
        &self,
        start: CornerPoint,
        first: usize,
        hole: bool,
        used: &mut [bool],
    ) -> Result<Vec<CornerPoint>, OutlineError> {
        let malformed = |at: CornerPoint, walked: usize| OutlineError::MalformedEdgeCycle {
            x: at.x,
            y: at.y,
            walked,
        };

        let Some(first_end) = self.slots[first].and_then(|e| e.other_end(start)) else {
            return Err(malformed(start, 0));
        };
        used[first] = true;

        // Leaving along the bottom row puts the enclosed pixel on the left.
        let inside_left = first_end.y == start.y;
        let turn_left = inside_left == hole;

        let mut prev = start;
        let mut current = first_end;
        let mut outline = vec![start, first_end];
        let mut walked = 1;

        loop {
            let slot = self
                .next_slot(prev, current, turn_left, used)
                .ok_or_else(|| malformed(current, walked))?;
            used[slot] = true;
            walked += 1;

            let next = self.slots[slot]
                .and_then(|e| e.other_end(current))
                .ok_or_else(|| malformed(current, walked))?;
            if next == start {
                return Ok(outline);
            }
            outline.push(next);
            prev = current;
            current = next;
        }
    }

    /// Trace the outer boundary cycle.
    ///
    /// Edges belonging to other cycles (holes) are ignored. An empty set
    /// yields an empty outline.
    pub fn extract_outline(&self) -> Result<Outline, OutlineError> {
        let mut used = vec![false; self.slots.len()];
        match self.cycle_start(&used) {
            Some((start, first)) => Ok(Outline::from_cycle(self.walk_cycle(start, first, false, &mut used)?)),
            None => Ok(Outline::from_cycle(Vec::new())),
        }
    }

    /// Trace every cycle: the outer boundary first, then each hole in order
    /// of its lowest corner.
    ///
    /// Holes meeting only at a corner are separate cycles.
    pub fn extract_outlines(&self) -> Result<Vec<Outline>, OutlineError> {
        let mut used = vec![false; self.slots.len()];
        let mut outlines = Vec::new();
        while let Some((start, first)) = self.cycle_start(&used) {
            let hole = !outlines.is_empty();
            outlines.push(Outline::from_cycle(self.walk_cycle(start, first, hole, &mut used)?));
        }
        Ok(outlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(x: i32, y: i32) -> CornerPoint {
        CornerPoint::new(x, y)
    }

    fn e(x0: i32, y0: i32, x1: i32, y1: i32) -> Edge {
        Edge::new(cp(x0, y0), cp(x1, y1))
    }

    #[test]
    fn test_combine_collinear() {
        assert_eq!(e(0, 0, 1, 0).try_combine(&e(1, 0, 2, 0)), Some(e(0, 0, 2, 0)));
        assert_eq!(e(1, 0, 2, 0).try_combine(&e(0, 0, 1, 0)), Some(e(2, 0, 0, 0)));
        assert_eq!(e(0, 0, 0, 1).try_combine(&e(0, 2, 0, 1)), Some(e(0, 0, 0, 2)));
    }

    #[test]
    fn test_combine_rejects_corners_and_gaps() {
        // Perpendicular edges meeting at a corner
        assert_eq!(e(0, 0, 1, 0).try_combine(&e(1, 0, 1, 1)), None);
        // Collinear but not touching
        assert_eq!(e(0, 0, 1, 0).try_combine(&e(2, 0, 3, 0)), None);
        // Parallel on different rows
        assert_eq!(e(0, 0, 1, 0).try_combine(&e(0, 1, 1, 1)), None);
        // Overlapping runs from the same corner
        assert_eq!(e(0, 0, 1, 0).try_combine(&e(0, 0, 2, 0)), None);
    }

    #[test]
    fn test_insert_merges_chain() {
        let mut set = EdgeSet::new();
        set.insert(e(0, 0, 1, 0));
        set.insert(e(2, 0, 3, 0));
        assert_eq!(set.len(), 2);
        // Bridges both runs
        set.insert(e(1, 0, 2, 0));
        assert_eq!(set.len(), 1);
        let edge = *set.iter().next().unwrap();
        assert_eq!(edge.length(), 3);
        assert!(edge.covers(cp(0, 0)) && edge.covers(cp(3, 0)));
    }

    #[test]
    fn test_insert_keeps_corners() {
        let mut set = EdgeSet::new();
        set.insert(e(0, 0, 1, 0));
        set.insert(e(1, 0, 1, 1));
        assert_eq!(set.len(), 2);
        assert_eq!(set.perimeter(), 2);
    }

    #[test]
    fn test_no_merge_through_diagonal_touch() {
        let mut set = EdgeSet::new();
        // Vertical runs meet at (1, 1) before anything else touches it
        set.insert(e(1, 0, 1, 1));
        set.insert(e(1, 1, 1, 2));
        assert_eq!(set.len(), 1);
        // A crossing edge splits the run again
        set.insert(e(0, 1, 1, 1));
        set.insert(e(1, 1, 2, 1));
        assert_eq!(set.len(), 4);

        for edge in [e(0, 0, 1, 0), e(0, 0, 0, 1), e(1, 2, 2, 2), e(2, 1, 2, 2)] {
            set.insert(edge);
        }
        assert_eq!(set.len(), 8);
        assert_eq!(set.iter().filter(|edge| edge.other_end(cp(1, 1)).is_some()).count(), 4);

        // Two squares touching at a corner, walked as one boundary
        let outline = set.extract_outline().unwrap();
        assert_eq!(outline.len(), 8);
        assert_eq!(outline.signed_area(), 2.0);
    }

    #[test]
    fn test_unit_square_outline() {
        let mut set = EdgeSet::new();
        set.insert(e(0, 0, 0, 1));
        set.insert(e(1, 0, 1, 1));
        set.insert(e(0, 1, 1, 1));
        set.insert(e(0, 0, 1, 0));
        let outline = set.extract_outline().unwrap();
        assert_eq!(outline.len(), 4);
        assert!(outline.signed_area() > 0.0);
        assert!((outline.signed_area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_winding_is_independent_of_insert_order() {
        let edges = [e(0, 0, 2, 0), e(2, 0, 2, 1), e(2, 1, 0, 1), e(0, 1, 0, 0)];
        let mut forward = EdgeSet::new();
        let mut backward = EdgeSet::new();
        for edge in edges {
            forward.insert(edge);
        }
        for edge in edges.iter().rev() {
            backward.insert(Edge::new(edge.v1, edge.v0));
        }
        let a = forward.extract_outline().unwrap();
        let b = backward.extract_outline().unwrap();
        assert!(a.signed_area() > 0.0);
        assert!(b.signed_area() > 0.0);
        assert_eq!(a.signed_area(), b.signed_area());
    }

    #[test]
    fn test_broken_cycle_is_error() {
        let mut set = EdgeSet::new();
        set.insert(e(0, 0, 1, 0));
        set.insert(e(1, 0, 1, 1));
        set.insert(e(1, 1, 0, 1));
        let err = set.extract_outline().unwrap_err();
        assert!(matches!(err, OutlineError::MalformedEdgeCycle { .. }));
    }

    #[test]
    fn test_empty_set() {
        let set = EdgeSet::new();
        assert!(set.extract_outline().unwrap().is_empty());
        assert!(set.extract_outlines().unwrap().is_empty());
    }

    #[test]
    fn test_pivot_prefers_max_x_on_lowest_row() {
        let pts = [cp(0, 1), cp(0, 0), cp(3, 0), cp(3, 1)];
        assert_eq!(pivot_index(&pts), 2);
    }

    #[test]
    fn test_degenerate_outline_is_kept() {
        let outline = Outline::from_cycle(vec![cp(0, 0), cp(1, 0)]);
        assert!(outline.is_degenerate());
        assert_eq!(outline.points(), &[cp(0, 0), cp(1, 0)]);
    }
}
