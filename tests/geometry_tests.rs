#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use raceline::simulation::geometry::{
    Orientation, intersection_point, orientation, segments_intersect,
};

fn point(x: f64, y: f64) -> Array1<f64> {
    Array1::from_vec(vec![x, y])
}

#[test]
fn test_orientation_winding() {
    let origin = point(0.0, 0.0);
    let right = point(1.0, 0.0);
    let up = point(1.0, 1.0);

    assert_eq!(orientation(&origin, &up, &right), Orientation::Clockwise);
    assert_eq!(
        orientation(&origin, &right, &up),
        Orientation::CounterClockwise
    );
    assert_eq!(
        orientation(&origin, &right, &point(2.0, 0.0)),
        Orientation::Collinear
    );
}

#[test]
fn test_crossing_segments() {
    let p1 = point(0.0, 0.0);
    let p2 = point(10.0, 10.0);
    let p3 = point(0.0, 10.0);
    let p4 = point(10.0, 0.0);

    assert!(segments_intersect(&p1, &p2, &p3, &p4));

    let crossing = intersection_point(&p1, &p2, &p3, &p4).expect("segments cross");
    assert_eq!(crossing[0], 5.0);
    assert_eq!(crossing[1], 5.0);
}

#[test]
fn test_parallel_offset_segments() {
    let p1 = point(0.0, 0.0);
    let p2 = point(10.0, 0.0);
    let p3 = point(0.0, 1.0);
    let p4 = point(10.0, 1.0);

    assert!(!segments_intersect(&p1, &p2, &p3, &p4));
    assert!(intersection_point(&p1, &p2, &p3, &p4).is_none());
}

#[test]
fn test_collinear_overlapping_returns_nearer_endpoint() {
    // Ray from the origin along +x; the wall occupies [5, 15] on the axis
    let p1 = point(0.0, 0.0);
    let p2 = point(10.0, 0.0);
    let p3 = point(5.0, 0.0);
    let p4 = point(15.0, 0.0);

    let hit = intersection_point(&p1, &p2, &p3, &p4).expect("collinear overlap");
    assert_eq!(hit[0], 5.0);
    assert_eq!(hit[1], 0.0);

    // Same wall listed in the reversed direction: still the nearer endpoint
    let hit = intersection_point(&p1, &p2, &p4, &p3).expect("collinear overlap");
    assert_eq!(hit[0], 5.0);
    assert_eq!(hit[1], 0.0);
}

#[test]
fn test_collinear_disjoint_segments() {
    let p1 = point(0.0, 0.0);
    let p2 = point(10.0, 0.0);
    let p3 = point(11.0, 0.0);
    let p4 = point(20.0, 0.0);

    assert!(intersection_point(&p1, &p2, &p3, &p4).is_none());

    // Reversed second segment behaves the same
    assert!(intersection_point(&p1, &p2, &p4, &p3).is_none());
}

#[test]
fn test_segments_sharing_an_endpoint() {
    // p2 coincides with p3. The orientation test sees a collinear triple on
    // each side, so a non-collinear configuration counts as intersecting.
    let p1 = point(0.0, 0.0);
    let p2 = point(10.0, 0.0);
    let p3 = point(10.0, 0.0);
    let p4 = point(10.0, 10.0);

    assert!(segments_intersect(&p1, &p2, &p3, &p4));

    // If all four points are collinear, every orientation matches and the
    // shared endpoint does not count as a crossing.
    let p4_inline = point(20.0, 0.0);
    assert!(!segments_intersect(&p1, &p2, &p3, &p4_inline));
}

#[test]
fn test_crossing_at_segment_interior_parameters() {
    // Lines would cross at x = 15, beyond the first segment's reach
    let p1 = point(0.0, 0.0);
    let p2 = point(10.0, 0.0);
    let p3 = point(15.0, -5.0);
    let p4 = point(15.0, 5.0);

    assert!(!segments_intersect(&p1, &p2, &p3, &p4));
    assert!(intersection_point(&p1, &p2, &p3, &p4).is_none());
}

#[test]
fn test_sensor_ray_against_offset_wall() {
    // A downward ray against a horizontal wall halfway along its reach
    let origin = point(50.0, 20.0);
    let ray_end = point(50.0, -20.0);
    let wall_a = point(0.0, 0.0);
    let wall_b = point(100.0, 0.0);

    let hit = intersection_point(&origin, &ray_end, &wall_a, &wall_b).expect("wall ahead");
    assert_eq!(hit[0], 50.0);
    assert_eq!(hit[1], 0.0);
}
