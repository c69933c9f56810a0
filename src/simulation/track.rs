//! Track walls and their spatial index.
//!
//! A track is an arena of immutable wall segments plus a bounding-volume
//! tree built over their boxes at load time. The tree is read-only for the
//! track's entire lifetime.

use ndarray::Array1;

use super::aabb::{AabbTree, BoundingBox};

/// One static wall: an immutable pair of 2D endpoints.
#[derive(Debug, Clone)]
pub struct WallSegment {
    /// First endpoint.
    pub a: Array1<f64>,
    /// Second endpoint.
    pub b: Array1<f64>,
}

impl WallSegment {
    /// Creates a segment between two points.
    pub fn new(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            a: Array1::from_vec(vec![a.0, a.1]),
            b: Array1::from_vec(vec![b.0, b.1]),
        }
    }

    /// Tightest box around the segment (degenerate for axis-aligned walls).
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&[self.a.clone(), self.b.clone()])
    }
}

/// The static track: wall segments and their bounding-volume tree.
#[derive(Debug, Clone, Default)]
pub struct Track {
    segments: Vec<WallSegment>,
    tree: AabbTree,
}

impl Track {
    /// Creates a track with no walls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a track from one connected polyline; each consecutive point
    /// pair becomes a wall segment.
    pub fn from_polyline(points: &[(f64, f64)]) -> Self {
        let mut track = Self::new();
        track.add_polyline(points);
        track
    }

    /// Appends a polyline's segments to the track. A track file may contain
    /// several disconnected chains.
    pub fn add_polyline(&mut self, points: &[(f64, f64)]) {
        for pair in points.windows(2) {
            self.add_wall(pair[0], pair[1]);
        }
        tracing::debug!(segments = self.segments.len(), "track walls indexed");
    }

    /// Adds a single wall segment and indexes it.
    pub fn add_wall(&mut self, a: (f64, f64), b: (f64, f64)) {
        let segment = WallSegment::new(a, b);
        let bb = segment.bounds();
        let index = self.segments.len();
        self.segments.push(segment);
        self.tree.insert(bb, index);
    }

    /// All wall segments, in insertion order. Query results index into this
    /// slice.
    pub fn segments(&self) -> &[WallSegment] {
        &self.segments
    }

    /// Number of wall segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the track has no walls.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Batched candidate lookup: for each query box, the indices of every
    /// wall whose box strictly overlaps it.
    pub fn query(&self, boxes: &[BoundingBox]) -> Vec<Vec<usize>> {
        self.tree.query(boxes)
    }

    /// Bounding box of the whole track, if it has any walls.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.tree.bounds()
    }
}
