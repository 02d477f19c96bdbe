use super::{Point3, TOLERANCE};

/// Returns the minimum distance from `p` to the line segment from `a` to `b`.
///
/// The projection parameter onto `ab` is clamped to `[0, 1]`. A segment
/// shorter than [`TOLERANCE`] degenerates to the point distance `|p - a|`.
#[must_use]
pub fn point_to_segment_dist(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();

    if len_sq < TOLERANCE * TOLERANCE {
        return (p - a).norm();
    }

    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}

/// Approximates the distance between segments `p1p2` and `p3p4`.
///
/// Takes the minimum of the four endpoint-to-opposite-segment distances.
/// This is not the true segment-segment distance: when both closest points
/// are interior to their segments (two segments crossing in an X, for
/// instance) the result overstates the real gap.
#[must_use]
pub fn segment_to_segment_dist_approx(p1: &Point3, p2: &Point3, p3: &Point3, p4: &Point3) -> f64 {
    let d1 = point_to_segment_dist(p1, p3, p4);
    let d2 = point_to_segment_dist(p2, p3, p4);
    let d3 = point_to_segment_dist(p3, p1, p2);
    let d4 = point_to_segment_dist(p4, p1, p2);
    d1.min(d2).min(d3).min(d4)
}

/// Returns the minimum distance from `p` to any segment of the polyline
/// `points`, or `None` if it has fewer than two points.
#[must_use]
pub fn point_to_polyline_dist(p: &Point3, points: &[Point3]) -> Option<f64> {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(p, &w[0], &w[1]))
        .reduce(f64::min)
}

/// Returns the minimum distance from `p` to any point in `points`, or `None`
/// if `points` is empty.
#[must_use]
pub fn min_point_dist(p: &Point3, points: &[Point3]) -> Option<f64> {
    points.iter().map(|q| (p - q).norm()).reduce(f64::min)
}

/// Returns the index and distance of the point in `points` nearest to `p`.
///
/// Ties resolve to the lowest index.
#[must_use]
pub fn nearest_point(p: &Point3, points: &[Point3]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, q) in points.iter().enumerate() {
        let d = (p - q).norm();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-10;

    fn pt(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    // ── point_to_segment_dist tests ──

    #[test]
    fn segment_dist_perpendicular_projection() {
        // (1, 1, 0) to (0,0,0)→(2,0,0). Closest at (1,0,0).
        let d = point_to_segment_dist(&pt(1.0, 1.0, 0.0), &pt(0.0, 0.0, 0.0), &pt(2.0, 0.0, 0.0));
        assert_abs_diff_eq!(d, 1.0, epsilon = TOL);
    }

    #[test]
    fn segment_dist_out_of_plane() {
        let d = point_to_segment_dist(&pt(1.0, 0.0, 3.0), &pt(0.0, 0.0, 0.0), &pt(2.0, 0.0, 0.0));
        assert_abs_diff_eq!(d, 3.0, epsilon = TOL);
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        let d = point_to_segment_dist(&pt(-1.0, 0.0, 0.0), &pt(0.0, 0.0, 0.0), &pt(2.0, 0.0, 0.0));
        assert_abs_diff_eq!(d, 1.0, epsilon = TOL);
        let d = point_to_segment_dist(&pt(5.0, 4.0, 0.0), &pt(0.0, 0.0, 0.0), &pt(2.0, 0.0, 0.0));
        assert_abs_diff_eq!(d, 5.0, epsilon = TOL);
    }

    #[test]
    fn segment_dist_on_segment() {
        let d = point_to_segment_dist(&pt(1.0, 0.0, 0.0), &pt(0.0, 0.0, 0.0), &pt(2.0, 0.0, 0.0));
        assert!(d.abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        let a = pt(0.0, 0.0, 0.0);
        let d = point_to_segment_dist(&pt(3.0, 4.0, 0.0), &a, &a);
        assert_abs_diff_eq!(d, 5.0, epsilon = TOL);
    }

    // ── segment_to_segment_dist_approx tests ──

    #[test]
    fn parallel_segments_gap() {
        let d = segment_to_segment_dist_approx(
            &pt(0.0, 0.0, 0.0),
            &pt(2.0, 0.0, 0.0),
            &pt(0.0, 1.0, 0.0),
            &pt(2.0, 1.0, 0.0),
        );
        assert_abs_diff_eq!(d, 1.0, epsilon = TOL);
    }

    #[test]
    fn touching_segments_are_zero_apart() {
        let d = segment_to_segment_dist_approx(
            &pt(0.0, 0.0, 0.0),
            &pt(1.0, 0.0, 0.0),
            &pt(1.0, 0.0, 0.0),
            &pt(1.0, 5.0, 0.0),
        );
        assert!(d.abs() < TOL, "d={d}");
    }

    #[test]
    fn interior_crossing_is_overstated() {
        // Segments cross at (1, 0, 0) but no endpoint lies near the other segment.
        let d = segment_to_segment_dist_approx(
            &pt(0.0, 0.0, 0.0),
            &pt(2.0, 0.0, 0.0),
            &pt(1.0, -1.0, 0.0),
            &pt(1.0, 1.0, 0.0),
        );
        assert_abs_diff_eq!(d, 1.0, epsilon = TOL);
    }

    // ── helpers ──

    #[test]
    fn polyline_dist_takes_nearest_segment() {
        let pts = [pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(1.0, 1.0, 0.0)];
        let d = point_to_polyline_dist(&pt(1.5, 0.5, 0.0), &pts);
        assert_abs_diff_eq!(d.unwrap_or(f64::NAN), 0.5, epsilon = TOL);
        assert!(point_to_polyline_dist(&pt(0.0, 0.0, 0.0), &pts[..1]).is_none());
    }

    #[test]
    fn nearest_point_prefers_lowest_index_on_tie() {
        let pts = [pt(-1.0, 0.0, 0.0), pt(1.0, 0.0, 0.0)];
        let (i, d) = nearest_point(&pt(0.0, 0.0, 0.0), &pts).unwrap_or((9, 0.0));
        assert_eq!(i, 0);
        assert_abs_diff_eq!(d, 1.0, epsilon = TOL);
        assert!(nearest_point(&pt(0.0, 0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn min_point_dist_empty_is_none() {
        assert!(min_point_dist(&pt(0.0, 0.0, 0.0), &[]).is_none());
        let d = min_point_dist(&pt(0.0, 0.0, 0.0), &[pt(0.0, 3.0, 4.0), pt(0.0, 0.0, 2.0)]);
        assert_eq!(d, Some(2.0));
    }
}
