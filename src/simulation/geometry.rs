//! Exact line-segment geometry predicates for collision detection.
//!
//! All functions are total: degenerate inputs (zero-length segments, exactly
//! parallel or collinear pairs) are resolved by explicit branches, never by a
//! floating-point exception.

use ndarray::Array1;

/// Winding order of three points in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The points turn left.
    CounterClockwise,
    /// The points turn right.
    Clockwise,
    /// The points lie on one line.
    Collinear,
}

/// 2D cross product of two vectors.
#[inline]
fn cross(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

/// Returns the winding order of points `p1`, `p2`, `p3`.
///
/// Uses the sign of the cross product `(p3 - p1) x (p2 - p1)`; an exact zero
/// is [`Orientation::Collinear`].
pub fn orientation(p1: &Array1<f64>, p2: &Array1<f64>, p3: &Array1<f64>) -> Orientation {
    let ccw = (p3[1] - p1[1]) * (p2[0] - p1[0]) - (p2[1] - p1[1]) * (p3[0] - p1[0]);
    if ccw > 0.0 {
        Orientation::CounterClockwise
    } else if ccw < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns `true` if segment `p1p2` intersects segment `p3p4`.
///
/// Existence test only; see [`intersection_point`] to locate the point.
pub fn segments_intersect(
    p1: &Array1<f64>,
    p2: &Array1<f64>,
    p3: &Array1<f64>,
    p4: &Array1<f64>,
) -> bool {
    orientation(p1, p3, p4) != orientation(p2, p3, p4)
        && orientation(p1, p2, p3) != orientation(p1, p2, p4)
}

/// Computes the intersection point of segment `p1p2` with segment `p3p4`.
///
/// If the segments properly cross, returns the crossing point. If they are
/// collinear and overlapping, returns the endpoint of `p3p4` nearer to `p1`.
/// Otherwise returns `None`.
///
/// Precondition: `p1` is the ray origin and must not itself lie between `p3`
/// and `p4`; callers cast rays outward from a point known to be off the wall.
///
/// # Returns
///
/// The intersection point, or `None` if the segments do not meet.
pub fn intersection_point(
    p1: &Array1<f64>,
    p2: &Array1<f64>,
    p3: &Array1<f64>,
    p4: &Array1<f64>,
) -> Option<Array1<f64>> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let pd = p3 - p1;

    let dc = cross(&d1, &d2);

    if dc == 0.0 {
        // Parallel but not collinear
        if cross(&pd, &d1) != 0.0 {
            return None;
        }

        // Collinear: project both endpoints of p3p4 onto the p1p2 line.
        // A zero-length p1p2 makes these NaN and falls through to None.
        let d1_sq = d1.dot(&d1);
        let t1 = pd.dot(&d1) / d1_sq;
        let p = d1.dot(&d2);
        let t2 = t1 + p / d1_sq;

        // p < 0 means p3p4 runs against p1p2's direction
        let overlapping = if p < 0.0 {
            t2 <= 1.0 && 0.0 <= t1
        } else {
            t1 <= 1.0 && 0.0 <= t2
        };

        if overlapping {
            let to_p3 = p3 - p1;
            let to_p4 = p4 - p1;
            let mag1 = to_p3.dot(&to_p3).sqrt();
            let mag2 = to_p4.dot(&to_p4).sqrt();
            if mag1 < mag2 {
                Some(p3.clone())
            } else {
                Some(p4.clone())
            }
        } else {
            None
        }
    } else {
        // Cramer's rule for the two segment parameters
        let m1 = cross(&pd, &d2) / dc;
        let m2 = cross(&pd, &d1) / dc;

        if (0.0..=1.0).contains(&m1) && (0.0..=1.0).contains(&m2) {
            Some(p1 + &(&d1 * m1))
        } else {
            None
        }
    }
}
