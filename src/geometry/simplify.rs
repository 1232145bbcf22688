//! Simplification — Douglas-Peucker smoothing of a buffered ring,
//! with a halving-tolerance retry when the simplified ring turns out
//! self-intersecting or too short to be a polygon.
//!
//! `geo::Simplify` does the actual Ramer-Douglas-Peucker work; this
//! module only adds the retry loop and the orientation/validity
//! bookkeeping that `geo`'s algorithm doesn't do on its own.

use geo::{Simplify, Validation};

use crate::error::{InsetError, Result};
use crate::geometry::types::{PlanarPolygon, Polygon};
use crate::units::Length;

/// Below this tolerance, simplification is skipped entirely and the
/// input is returned unchanged rather than retried forever.
const MIN_TOLERANCE: Length = Length::metres(0.01);

/// Simplifies `polygon` at `tolerance`, halving the tolerance and
/// retrying whenever the result is invalid because of a self-
/// intersection or degenerate ring. Wrong orientation is not retried —
/// that is corrected by the caller, not smoothed away here. Any other
/// validity problem (not finite, hole escaping the exterior, ...) is
/// fatal and returned immediately.
pub fn simplify(polygon: &PlanarPolygon, tolerance: Length) -> Result<PlanarPolygon> {
    if tolerance.meters() < MIN_TOLERANCE.meters() {
        return Err(InsetError::InvalidInput(format!(
            "simplify tolerance {tolerance} is below the {MIN_TOLERANCE} minimum"
        )));
    }

    let mut current_tolerance = tolerance;
    loop {
        let candidate = simplify_once(polygon, current_tolerance);

        let geo_poly: geo::Polygon<f64> = (&candidate).into();
        if geo_poly.is_valid() {
            return Ok(candidate);
        }

        if !is_retryable(&geo_poly) {
            let report = geo_poly
                .explain_invalidity()
                .map(|r| format!("{r:?}"))
                .unwrap_or_else(|| "invalid geometry".to_string());
            return Err(InsetError::Geometry(format!(
                "simplification produced an invalid polygon: {report}"
            )));
        }

        current_tolerance = current_tolerance / 2.0;
        if current_tolerance.meters() < MIN_TOLERANCE.meters() {
            return Ok(polygon.clone());
        }
    }
}

fn simplify_once(polygon: &PlanarPolygon, tolerance: Length) -> PlanarPolygon {
    let geo_poly: geo::Polygon<f64> = polygon.into();
    let simplified = geo_poly.simplify(&tolerance.meters());
    Polygon::new(
        simplified.exterior().into(),
        simplified.interiors().iter().map(|r| r.into()).collect(),
    )
}

/// Self-intersections and too-few-points are the two problem kinds
/// Douglas-Peucker can itself introduce by collapsing vertices; every
/// other `Problem` variant reflects a defect already present in the
/// input and retrying at a coarser tolerance cannot fix it.
fn is_retryable(geo_poly: &geo::Polygon<f64>) -> bool {
    use geo::algorithm::validation::Problem;

    match geo_poly.explain_invalidity() {
        None => false,
        Some(report) => report
            .0
            .iter()
            .all(|p| matches!(p.0, Problem::SelfIntersection | Problem::TooFewPoints)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::types::{PlanarPoint, Ring};

    fn noisy_square(side: f64, jitter: f64) -> PlanarPolygon {
        let half = side / 2.0;
        let mut pts = vec![];
        let corners = [
            (-half, -half),
            (-half + jitter, -half),
            (half - jitter, -half),
            (half, -half),
            (half, half),
            (-half, half),
        ];
        for (x, y) in corners {
            pts.push(PlanarPoint::new(Length::metres(x), Length::metres(y)));
        }
        pts.push(pts[0]);
        Polygon::new(Ring::new(pts), vec![])
    }

    #[test]
    fn simplify_reduces_vertex_count() {
        let poly = noisy_square(100.0, 0.5);
        let simplified = simplify(&poly, Length::metres(1.0)).unwrap();
        assert!(simplified.outer.len() <= poly.outer.len());
    }

    #[test]
    fn tolerance_below_minimum_is_rejected() {
        let poly = noisy_square(100.0, 0.5);
        assert!(simplify(&poly, Length::metres(0.001)).is_err());
    }

    /// A self-intersecting bowtie has too few points for Douglas-Peucker
    /// to simplify away, so it stays invalid at every tolerance down to
    /// the minimum; the retry loop must give up and hand back the
    /// original ring rather than erroring.
    #[test]
    fn self_intersecting_ring_falls_back_to_the_original() {
        let ring = Ring::new(vec![
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(100.0), Length::metres(100.0)),
            PlanarPoint::new(Length::metres(100.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(100.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
        ]);
        let poly = Polygon::new(ring, vec![]);
        let result = simplify(&poly, Length::metres(0.1)).unwrap();
        assert_eq!(result.outer, poly.outer);
    }

    #[test]
    fn simplify_is_idempotent_on_a_clean_square() {
        let ring = Ring::new(vec![
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(50.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(50.0), Length::metres(50.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(50.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
        ]);
        let poly = Polygon::new(ring, vec![]);
        let simplified = simplify(&poly, Length::metres(0.5)).unwrap();
        assert_eq!(simplified.outer.len(), poly.outer.len());
    }
}
