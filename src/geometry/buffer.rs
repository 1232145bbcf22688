//! Buffer engine — computes the inset of a planar polygon.
//!
//! Built on `geo`'s `Buffer` trait, the same algorithm family the
//! upstream `geo` crate ships for both inward and outward offsets: a
//! negative distance shrinks the polygon, which is exactly what an
//! inset is. Round joins and caps are used throughout since field
//! boundaries have no natural "square end" the way a stroked line
//! would.

use geo::orient::{Direction, Orient};
use geo::{Buffer, BufferStyle, LineCap, LineJoin, Validation, Winding};

use crate::error::{InsetError, Result};
use crate::geometry::types::{PlanarMultiPolygon, PlanarPolygon};
use crate::units::Length;

/// 32 segments per full circle, matching the join/cap angle `geo` uses
/// by default for its own round joins.
const JOIN_ANGLE_RADIANS: f64 = std::f64::consts::TAU / 32.0;

/// Shrinks `polygon` inward by `offset`. `offset` must be at least 1m;
/// smaller insets are rejected rather than silently rounded, since an
/// inset below a metre is almost always a unit-conversion bug upstream.
///
/// An inset that consumes the whole polygon (offset larger than the
/// polygon's width) is not an error: it yields an empty multipolygon.
pub fn inset(polygon: &PlanarPolygon, offset: Length) -> Result<PlanarMultiPolygon> {
    if offset.meters() < 1.0 {
        return Err(InsetError::InvalidInput(format!(
            "inset offset {offset} is below the 1m minimum"
        )));
    }

    let geo_poly: geo::Polygon<f64> = polygon.into();
    if let Err(report) = geo_poly.check_validity() {
        return Err(InsetError::Geometry(format!(
            "input polygon is not valid: {report}"
        )));
    }

    let style = BufferStyle::new(-offset.meters())
        .line_join(LineJoin::Round(JOIN_ANGLE_RADIANS))
        .line_cap(LineCap::Round(JOIN_ANGLE_RADIANS));
    let buffered = geo_poly.buffer_with_style(style);

    let corrected = correct_orientation(buffered);
    check_validity_postcondition(&corrected)?;

    Ok((&corrected).into())
}

/// Checks the geometry's OGC validity and reports a retryable-looking
/// error, distinguishing self-intersections / too-few-points (which
/// `geometry::simplify` retries at a coarser tolerance) is the caller's
/// job; this function only surfaces the underlying problem text.
trait CheckValidity {
    fn check_validity(&self) -> std::result::Result<(), String>;
}

impl CheckValidity for geo::Polygon<f64> {
    fn check_validity(&self) -> std::result::Result<(), String> {
        if self.is_valid() {
            Ok(())
        } else {
            match self.explain_invalidity() {
                Some(report) => Err(format!("{report:?}")),
                None => Err("invalid geometry".to_string()),
            }
        }
    }
}

fn check_validity_postcondition(mp: &geo::MultiPolygon<f64>) -> Result<()> {
    for poly in mp {
        if !poly.is_valid() {
            let report = poly
                .explain_invalidity()
                .map(|r| format!("{r:?}"))
                .unwrap_or_else(|| "invalid geometry".to_string());
            return Err(InsetError::Geometry(format!(
                "buffer produced an invalid polygon: {report}"
            )));
        }
    }
    Ok(())
}

/// `geo`'s validity check does not flag wrong ring orientation, so this
/// is a separate, non-fatal correction pass: outer rings are forced
/// counter-clockwise and inner rings clockwise.
fn correct_orientation(mp: geo::MultiPolygon<f64>) -> geo::MultiPolygon<f64> {
    geo::MultiPolygon::new(
        mp.into_iter()
            .map(|poly| {
                if poly.exterior().is_cw() {
                    poly.orient(Direction::Default)
                } else {
                    poly
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::types::{PlanarPoint, Polygon, Ring};
    use geo::Area;

    fn square(side: f64) -> PlanarPolygon {
        let half = side / 2.0;
        let ring = Ring::new(vec![
            PlanarPoint::new(Length::metres(-half), Length::metres(-half)),
            PlanarPoint::new(Length::metres(half), Length::metres(-half)),
            PlanarPoint::new(Length::metres(half), Length::metres(half)),
            PlanarPoint::new(Length::metres(-half), Length::metres(half)),
            PlanarPoint::new(Length::metres(-half), Length::metres(-half)),
        ]);
        Polygon::new(ring, vec![])
    }

    #[test]
    fn inset_shrinks_a_square() {
        let poly = square(100.0);
        let result = inset(&poly, Length::metres(10.0)).unwrap();
        assert_eq!(result.polygons.len(), 1);
        let geo_poly: geo::Polygon<f64> = (&result.polygons[0]).into();
        let area = geo_poly.unsigned_area();
        assert!(area < 100.0 * 100.0);
        assert!(area > 70.0 * 70.0);
    }

    #[test]
    fn inset_larger_than_polygon_is_empty_not_an_error() {
        let poly = square(10.0);
        let result = inset(&poly, Length::metres(100.0)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn offset_below_one_metre_is_rejected() {
        let poly = square(100.0);
        assert!(inset(&poly, Length::metres(0.5)).is_err());
    }

    #[test]
    fn result_rings_are_correctly_oriented() {
        let poly = square(100.0);
        let result = inset(&poly, Length::metres(5.0)).unwrap();
        let geo_poly: geo::Polygon<f64> = (&result.polygons[0]).into();
        assert!(geo_poly.exterior().is_ccw());
    }
}
