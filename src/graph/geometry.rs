//! Projection and geodesic helpers shared by graph insertion and routing.
//!
//! Candidate edges are compared by the true geodesic distance from the query
//! point to its projection, so the projection metric is consistent with the
//! edge weights Dijkstra sums.

use geo::{HaversineBearing, HaversineDistance, Point};

/// Great-circle distance between two points, in meters.
pub fn distance_m(a: Point<f64>, b: Point<f64>) -> f64 {
    a.haversine_distance(&b)
}

/// Initial bearing from `a` toward `b`, in degrees clockwise from north.
/// Drives the direction arrow in consuming UIs.
pub fn bearing_deg(a: Point<f64>, b: Point<f64>) -> f64 {
    a.haversine_bearing(b)
}

/// Closest point to `p` on the segment `a`–`b`.
///
/// Computed in the local equirectangular lon/lat plane with the projection
/// parameter clamped to `[0, 1]`, so the result is an endpoint whenever the
/// perpendicular foot falls outside the segment. A zero-length segment
/// yields `a` — never a division by zero.
pub fn closest_point_on_segment(a: Point<f64>, b: Point<f64>, p: Point<f64>) -> Point<f64> {
    let dx = b.x() - a.x();
    let dy = b.y() - a.y();
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a;
    }

    let t = ((p.x() - a.x()) * dx + (p.y() - a.y()) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);
    Point::new(a.x() + t * dx, a.y() + t * dy)
}
