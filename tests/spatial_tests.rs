#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use raceline::simulation::aabb::{AabbTree, BoundingBox};

fn bb(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

/// Deterministic pseudo-random boxes without pulling an RNG into the test.
fn scattered_boxes(count: usize) -> Vec<BoundingBox> {
    (0..count)
        .map(|i| {
            let x = ((i * 37) % 100) as f64;
            let y = ((i * 61) % 100) as f64;
            let w = ((i * 13) % 20) as f64 + 1.0;
            let h = ((i * 29) % 20) as f64 + 1.0;
            bb(x, y, x + w, y + h)
        })
        .collect()
}

#[test]
fn test_empty_tree_queries() {
    let tree = AabbTree::new();
    assert!(tree.is_empty());
    assert!(tree.bounds().is_none());

    let hits = tree.query(&[bb(0.0, 0.0, 10.0, 10.0)]);
    assert_eq!(hits.len(), 1);
    assert!(hits[0].is_empty());
}

#[test]
fn test_single_leaf_tree() {
    let mut tree = AabbTree::new();
    tree.insert(bb(0.0, 0.0, 5.0, 5.0), 0);

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.bounds(), Some(bb(0.0, 0.0, 5.0, 5.0)));

    let hits = tree.query(&[bb(1.0, 1.0, 2.0, 2.0), bb(10.0, 10.0, 12.0, 12.0)]);
    assert_eq!(hits[0], vec![0]);
    assert!(hits[1].is_empty());
}

#[test]
fn test_root_bounds_equal_union_of_all_leaves() {
    let boxes = scattered_boxes(100);
    let mut tree = AabbTree::new();

    let mut expected: Option<BoundingBox> = None;
    for (i, item_bb) in boxes.iter().enumerate() {
        tree.insert(*item_bb, i);
        expected = Some(match expected {
            None => *item_bb,
            Some(total) => total.union(item_bb),
        });

        // The invariant holds after every insertion, not just at the end
        assert_eq!(tree.bounds(), expected);
    }
}

#[test]
fn test_query_matches_brute_force() {
    let boxes = scattered_boxes(150);
    let mut tree = AabbTree::new();
    for (i, item_bb) in boxes.iter().enumerate() {
        tree.insert(*item_bb, i);
    }

    let queries = vec![
        bb(0.0, 0.0, 30.0, 30.0),
        bb(50.0, 50.0, 80.0, 90.0),
        bb(95.0, 0.0, 120.0, 120.0),
        bb(-10.0, -10.0, -1.0, -1.0),
        bb(0.0, 0.0, 120.0, 120.0),
    ];

    let batched = tree.query(&queries);
    assert_eq!(batched.len(), queries.len());

    for (query_bb, mut hits) in queries.iter().zip(batched) {
        let mut expected: Vec<usize> = boxes
            .iter()
            .enumerate()
            .filter(|(_, item_bb)| item_bb.intersects(query_bb))
            .map(|(i, _)| i)
            .collect();

        // Tree results arrive in traversal order; compare as sets
        hits.sort_unstable();
        expected.sort_unstable();
        assert_eq!(hits, expected);
    }
}

#[test]
fn test_touching_edges_do_not_intersect() {
    let left = bb(0.0, 0.0, 5.0, 5.0);
    let right = bb(5.0, 0.0, 10.0, 5.0);
    let above = bb(0.0, 5.0, 5.0, 10.0);
    let corner = bb(5.0, 5.0, 10.0, 10.0);

    assert!(!left.intersects(&right));
    assert!(!left.intersects(&above));
    assert!(!left.intersects(&corner));

    let mut tree = AabbTree::new();
    tree.insert(left, 0);
    let hits = tree.query(&[right, above, corner, bb(4.0, 4.0, 6.0, 6.0)]);
    assert!(hits[0].is_empty());
    assert!(hits[1].is_empty());
    assert!(hits[2].is_empty());
    assert_eq!(hits[3], vec![0]);
}

#[test]
fn test_intersects_is_symmetric() {
    let boxes = scattered_boxes(40);
    for a in &boxes {
        for b in &boxes {
            assert_eq!(a.intersects(b), b.intersects(a));
        }
    }
}

#[test]
fn test_degenerate_boxes() {
    // A horizontal wall segment has a zero-height box; it still overlaps
    // queries that straddle it
    let wall = bb(0.0, 10.0, 100.0, 10.0);
    let straddling = bb(40.0, 5.0, 60.0, 15.0);
    let beside = bb(40.0, 11.0, 60.0, 15.0);

    assert_eq!(wall.area(), 0.0);
    assert!(wall.intersects(&straddling));
    assert!(!wall.intersects(&beside));

    let mut tree = AabbTree::new();
    tree.insert(wall, 7);
    let hits = tree.query(&[straddling, beside]);
    assert_eq!(hits[0], vec![7]);
    assert!(hits[1].is_empty());
}

#[test]
fn test_from_points() {
    let points = vec![
        ndarray::Array1::from_vec(vec![3.0, -1.0]),
        ndarray::Array1::from_vec(vec![-2.0, 4.0]),
        ndarray::Array1::from_vec(vec![0.0, 0.0]),
    ];
    let bounds = BoundingBox::from_points(&points);
    assert_eq!(bounds, bb(-2.0, -1.0, 3.0, 4.0));
}
