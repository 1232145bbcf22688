//! Corner detector — finds convex corners of a planar ring via
//! simplify-then-map, then normalizes the corner list so the ring
//! starts at a corner.
//!
//! A corner is a vertex where the ring's heading turns at least 45°
//! to the right; detecting that directly on a noisy boundary finds far
//! too many spurious corners, so detection runs on a 10m-simplified
//! copy of the ring and the results are mapped back onto the original
//! vertex indices.

use crate::geometry::simplify::simplify;
use crate::geometry::types::{cross, dot, Corners, PlanarPoint, PlanarPolygon, PlanarRing};
use crate::units::Length;

/// Aggressive tolerance used only for corner detection, distinct from
/// the caller-supplied tolerance used to clean the inset geometry.
const CORNER_DETECTION_TOLERANCE: Length = Length::metres(10.0);

/// A turn of at least this many degrees to the right counts as a corner.
const CORNER_ANGLE_THRESHOLD_DEGREES: f64 = -45.0;

/// Corners of an already-simplified ring, as indices into
/// `ring`'s unique vertices (`0..n`, `n = ring.len() - 1`).
pub fn corners_simp(ring: &PlanarRing) -> Vec<usize> {
    let n = ring.unique_len();
    if n == 0 {
        return vec![];
    }

    let mut out = vec![];
    let mut prev = ring.point(0).sub(ring.point(n - 1));
    for i in 0..n {
        let curr = ring.point((i + 1) % ring.len()).sub(ring.point(i));
        let theta = turn_angle_degrees(prev, curr);
        if theta <= CORNER_ANGLE_THRESHOLD_DEGREES {
            out.push(i);
        }
        prev = curr;
    }
    out
}

/// The signed turn angle in degrees from vector `prev` to vector
/// `curr`. `cross`/`dot` are both area-valued (Length × Length), so
/// their ratio inside `atan2` is dimensionless and the result is a
/// genuine angle, not a length-derived quantity.
fn turn_angle_degrees(prev: PlanarPoint, curr: PlanarPoint) -> f64 {
    cross(prev, curr).atan2(dot(prev, curr)).to_degrees()
}

/// Maps corner indices found on `simp` back onto `orig`.
///
/// Scans `orig` forward from a moving cursor for each simplified
/// corner point and takes the closest original vertex, so two
/// simplified corners can never claim the same original vertex.
pub fn map_corners(orig: &PlanarRing, simp: &PlanarRing, simp_corners: &[usize]) -> Vec<usize> {
    let n = orig.unique_len();
    if n == 0 {
        return vec![];
    }

    let mut out = vec![];
    let mut start = 0usize;
    for &sc in simp_corners {
        let target = simp.point(sc);
        let mut best_i = start;
        let mut best_d = orig.point(start % n).distance_squared_to(target);
        for offset in 1..n {
            let i = (start + offset) % n;
            let d = orig.point(i).distance_squared_to(target);
            if d < best_d {
                best_d = d;
                best_i = i;
            }
        }
        out.push(best_i);
        start = (best_i + 1) % n;
    }

    out.sort_unstable();
    out.dedup();
    out
}

/// Corners of `ring`, via simplify-then-map.
pub fn corners(ring: &PlanarRing) -> Vec<usize> {
    let poly = crate::geometry::types::Polygon::new(ring.clone(), vec![]);
    let simplified = simplify(&poly, CORNER_DETECTION_TOLERANCE)
        .map(|p| p.outer)
        .unwrap_or_else(|_| ring.clone());
    let simp_corners = corners_simp(&simplified);
    map_corners(ring, &simplified, &simp_corners)
}

/// Normalizes `ring`/`corners` so the ring begins at a corner
/// and the corner list has at least two entries. Returns the
/// (possibly rotated) ring together with the adjusted corner list.
pub fn adjust(ring: &PlanarRing, corners: &[usize]) -> (PlanarRing, Corners) {
    let n = ring.unique_len();
    assert!(n > 0, "adjust called on a degenerate ring");

    let mut unique: Vec<PlanarPoint> = ring.0[..n].to_vec();
    let mut idx: Vec<usize> = corners.to_vec();

    if idx.is_empty() {
        idx.push(0);
    } else if idx[0] != 0 {
        let forward_shift = idx[0];
        let backward_shift = n - idx[idx.len() - 1];

        if forward_shift <= backward_shift {
            unique.rotate_left(forward_shift);
            idx = idx.iter().map(|&c| c - forward_shift).collect();
        } else {
            let dropped = idx.pop().unwrap();
            unique.rotate_left(dropped);
            idx = idx.iter().map(|&c| c + backward_shift).collect();
            idx.insert(0, 0);
        }
    }

    if idx.len() < 2 {
        let origin = unique[0];
        let farthest = (0..n)
            .max_by(|&a, &b| {
                unique[a]
                    .distance_to(origin)
                    .meters()
                    .partial_cmp(&unique[b].distance_to(origin).meters())
                    .unwrap()
            })
            .unwrap();
        idx.push(farthest);
    }

    idx.sort_unstable();
    idx.dedup();

    let mut closed = unique.clone();
    closed.push(closed[0]);

    (PlanarRing::new(closed), Corners::new(idx))
}

/// Corner-lists for a polygon: `[outer, inner0, inner1, ...]`, each
/// already passed through `adjust`. The returned polygon's rings are
/// rotated to match the adjusted corner lists, so callers must use the
/// returned rings (not the input `polygon`'s) together with the
/// returned corner lists.
pub fn polygon_corners(polygon: &PlanarPolygon) -> (PlanarPolygon, Vec<Corners>) {
    let (outer, outer_corners) = adjust(&polygon.outer, &corners(&polygon.outer));
    let mut inners = vec![];
    let mut all_corners = vec![outer_corners];
    for hole in &polygon.inners {
        let (rotated, hole_corners) = adjust(hole, &corners(hole));
        inners.push(rotated);
        all_corners.push(hole_corners);
    }
    (
        crate::geometry::types::Polygon::new(outer, inners),
        all_corners,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::types::Ring;

    fn square() -> PlanarRing {
        Ring::new(vec![
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(100.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(100.0), Length::metres(100.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(100.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
        ])
    }

    #[test]
    fn square_has_four_corners() {
        let c = corners_simp(&square());
        assert_eq!(c.len(), 4);
        assert_eq!(c, vec![0, 1, 2, 3]);
    }

    #[test]
    fn map_corners_is_monotonic_and_deduplicated() {
        let orig = square();
        let simp = square();
        let simp_corners = corners_simp(&simp);
        let mapped = map_corners(&orig, &simp, &simp_corners);
        assert_eq!(mapped, vec![0, 1, 2, 3]);
    }

    #[test]
    fn adjust_rotates_ring_so_first_corner_is_zero() {
        let ring = square();
        let (rotated, adjusted) = adjust(&ring, &[2]);
        assert_eq!(adjusted.0[0], 0);
        assert!(adjusted.len() >= 2);
        assert!(rotated.is_closed());
    }

    #[test]
    fn adjust_appends_farthest_point_when_only_one_corner() {
        let ring = square();
        let (_, adjusted) = adjust(&ring, &[0]);
        assert_eq!(adjusted.len(), 2);
        assert_eq!(adjusted.0[1], 2);
    }

    #[test]
    fn adjust_postcondition_holds() {
        let ring = square();
        let (rotated, adjusted) = adjust(&ring, &corners(&ring));
        assert_eq!(adjusted.0[0], 0);
        assert!(adjusted.len() >= 2);
        for w in adjusted.0.windows(2) {
            assert!(w[0] < w[1]);
        }
        for &c in &adjusted.0 {
            assert!(c < rotated.unique_len());
        }
    }
}
