//! Swath extractor — partitions a ring into open polyline swaths
//! between consecutive corners, duplicating the shared corner vertex
//! at each join.

use crate::geometry::types::{Corners, MultiPath, Path, PlanarPoint, PlanarRing};

/// Splits `ring` into paths at `corners`. `corners` must already
/// satisfy the `adjust` postcondition: `corners[0] == 0`, strictly
/// increasing, at least two entries, every index `< ring.unique_len()`.
pub fn extract_swaths(ring: &PlanarRing, corners: &Corners) -> MultiPath<PlanarPoint> {
    assert!(!corners.is_empty(), "extract_swaths requires corners[0] == 0");
    assert_eq!(corners.0[0], 0, "extract_swaths requires corners[0] == 0");

    let n = ring.unique_len();
    let mut paths = vec![];

    for w in corners.0.windows(2) {
        let (start, end) = (w[0], w[1]);
        paths.push(Path::new(ring.0[start..=end].to_vec()));
    }

    let last = *corners.0.last().unwrap();
    let mut tail: Vec<PlanarPoint> = ring.0[last..n].to_vec();
    tail.push(ring.point(0));
    paths.push(Path::new(tail));

    MultiPath::new(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::types::Ring;
    use crate::units::Length;

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
    fn square_with_four_corners_yields_four_swaths() {
        let ring = square();
        let corners = Corners::new(vec![0, 1, 2, 3]);
        let swaths = extract_swaths(&ring, &corners);
        assert_eq!(swaths.paths.len(), 4);
        for path in &swaths.paths {
            assert_eq!(path.len(), 2);
        }
    }

    #[test]
    fn swaths_cover_the_ring_exactly_once() {
        let ring = square();
        let corners = Corners::new(vec![0, 2]);
        let swaths = extract_swaths(&ring, &corners);
        assert_eq!(swaths.paths.len(), 2);

        let mut covered = vec![];
        for path in &swaths.paths {
            for &p in &path.0 {
                if covered.last() != Some(&p) {
                    covered.push(p);
                }
            }
        }
        if covered.last() == covered.first() && covered.len() > 1 {
            covered.pop();
        }
        assert_eq!(covered.len(), ring.unique_len());
        assert_eq!(covered[0], ring.point(0));
    }

    #[test]
    fn corner_vertex_is_shared_between_adjacent_swaths() {
        let ring = square();
        let corners = Corners::new(vec![0, 1, 2, 3]);
        let swaths = extract_swaths(&ring, &corners);
        assert_eq!(swaths.paths[0].0.last(), swaths.paths[1].0.first());
    }
}
