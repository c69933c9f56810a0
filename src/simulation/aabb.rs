//! Bounding boxes and a bounding-volume tree for wall segment queries.
//!
//! The tree is built once per track load by incremental insertion and is
//! read-only afterward. Queries are batched: one depth-first traversal
//! serves every live vehicle's box in a tick, rather than re-walking the
//! tree per vehicle.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box. May be degenerate (zero area).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum x coordinate.
    pub min_x: f64,
    /// Minimum y coordinate.
    pub min_y: f64,
    /// Maximum x coordinate.
    pub max_x: f64,
    /// Maximum y coordinate.
    pub max_y: f64,
}

impl BoundingBox {
    /// Builds the tightest box enclosing all of `points`.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty.
    pub fn from_points(points: &[Array1<f64>]) -> Self {
        let first = &points[0];
        let mut bb = Self {
            min_x: first[0],
            min_y: first[1],
            max_x: first[0],
            max_y: first[1],
        };
        for p in &points[1..] {
            bb.min_x = bb.min_x.min(p[0]);
            bb.min_y = bb.min_y.min(p[1]);
            bb.max_x = bb.max_x.max(p[0]);
            bb.max_y = bb.max_y.max(p[1]);
        }
        bb
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// Strict overlap test: boxes that merely touch at an edge do NOT
    /// intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.max_x > other.min_x
            && self.min_x < other.max_x
            && self.max_y > other.min_y
            && self.min_y < other.max_y
    }
}

/// Marginal cost of growing `existing` to also cover `new_bb`.
fn cost(existing: &BoundingBox, new_bb: &BoundingBox) -> f64 {
    existing.union(new_bb).area() - existing.area()
}

/// A node of the bounding-volume tree.
#[derive(Debug, Clone)]
enum Node {
    /// Terminal node referencing one stored item.
    Leaf {
        bb: BoundingBox,
        /// Index into the caller's item arena.
        item: usize,
    },
    /// Interior node with exactly two children.
    Branch {
        bb: BoundingBox,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn bb(&self) -> &BoundingBox {
        match self {
            Node::Leaf { bb, .. } | Node::Branch { bb, .. } => bb,
        }
    }
}

/// Bounding-volume tree over axis-aligned boxes, keyed by item index.
///
/// An empty tree answers every query with empty results; a single-leaf tree
/// has that leaf as its root with no branch wrapping.
#[derive(Debug, Clone, Default)]
pub struct AabbTree {
    root: Option<Node>,
    len: usize,
}

impl AabbTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored leaves.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no leaves have been inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bounding box of the whole tree, if any leaf is stored.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.root.as_ref().map(|node| *node.bb())
    }

    /// Inserts one leaf, descending greedily into whichever child grows the
    /// least by absorbing the new box. Exact cost ties descend into the left
    /// child.
    pub fn insert(&mut self, bb: BoundingBox, item: usize) {
        let leaf = Node::Leaf { bb, item };
        self.root = match self.root.take() {
            None => Some(leaf),
            Some(existing) => Some(Self::insert_into(existing, leaf)),
        };
        self.len += 1;
    }

    /// Inserts `leaf` below `node`, returning the grown subtree. Each frame
    /// of the recursion recomputes its node's box on the way back up, which
    /// refits every ancestor on the descent path.
    fn insert_into(node: Node, leaf: Node) -> Node {
        match node {
            // A leaf in the descent path is replaced in place by a branch
            // holding the old leaf and the new one.
            Node::Leaf { .. } => {
                let bb = node.bb().union(leaf.bb());
                Node::Branch {
                    bb,
                    left: Box::new(node),
                    right: Box::new(leaf),
                }
            }
            Node::Branch { left, right, .. } => {
                let left_cost = cost(left.bb(), leaf.bb());
                let right_cost = cost(right.bb(), leaf.bb());

                let (left, right) = if left_cost <= right_cost {
                    (Box::new(Self::insert_into(*left, leaf)), right)
                } else {
                    (left, Box::new(Self::insert_into(*right, leaf)))
                };

                let bb = left.bb().union(right.bb());
                Node::Branch { bb, left, right }
            }
        }
    }

    /// Batched query: for each input box, collects every stored item whose
    /// leaf box strictly overlaps it.
    ///
    /// One stack-based traversal serves all input boxes; a branch is
    /// descended once if any box overlaps it. Result order per box is
    /// traversal order (left child is pushed first, so the right child is
    /// visited first), not spatially sorted.
    pub fn query(&self, boxes: &[BoundingBox]) -> Vec<Vec<usize>> {
        let mut hits: Vec<Vec<usize>> = vec![Vec::new(); boxes.len()];

        let Some(root) = &self.root else {
            return hits;
        };

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { bb, item } => {
                    for (hit_list, query_bb) in hits.iter_mut().zip(boxes) {
                        if bb.intersects(query_bb) {
                            hit_list.push(*item);
                        }
                    }
                }
                Node::Branch { bb, left, right } => {
                    if boxes.iter().any(|query_bb| bb.intersects(query_bb)) {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }

        hits
    }
}
