//! Inset orchestrator — composes the projector, buffer engine,
//! simplifier, corner detector, and swath extractor into the public
//! `boundary_swaths` operation.

use crate::error::Result;
use crate::geometry::buffer::inset as buffer_inset;
use crate::geometry::corners::polygon_corners;
use crate::geometry::projector::Projection;
use crate::geometry::simplify::simplify;
use crate::geometry::swath::extract_swaths;
use crate::geometry::types::{GeoPolygon, MultiPath, PlanarPolygon};
use crate::units::Length;

/// Default cleanup tolerance applied to the inset geometry before
/// corner detection.
pub const DEFAULT_TOLERANCE: Length = Length::metres(0.10);

/// The swaths produced for a single result polygon of an inset: one
/// outer-ring swath set plus one per hole, in order. A field boundary
/// with multiple disjoint parts (or a buffer that splits a part into
/// several polygons) yields one `PolygonSwaths` per resulting polygon;
/// the field-naming rules in `model.rs` consume this per-polygon
/// grouping directly.
#[derive(Debug, Clone)]
pub struct PolygonSwaths<P> {
    pub outer: MultiPath<P>,
    pub holes: Vec<MultiPath<P>>,
}

/// Computes the inset swaths of a geographic polygon: projects to a
/// local planar frame, insets, simplifies, detects corners, extracts
/// swaths per ring, and projects the results back to geographic
/// coordinates.
pub fn boundary_swaths(
    polygon_geo: &GeoPolygon,
    offset: Length,
    tolerance: Length,
) -> Result<Vec<PolygonSwaths<crate::geometry::types::LatLon>>> {
    let proj = Projection::make_projection(polygon_geo)?;
    let poly_xy = proj.forward_polygon(polygon_geo)?;

    let planar = boundary_swaths_planar(&poly_xy, offset, tolerance)?;

    planar
        .into_iter()
        .map(|ps| {
            Ok(PolygonSwaths {
                outer: proj.inverse_multipath(&ps.outer)?,
                holes: ps
                    .holes
                    .iter()
                    .map(|h| proj.inverse_multipath(h))
                    .collect::<Result<Vec<_>>>()?,
            })
        })
        .collect()
}

/// Same operation on a polygon already in a planar frame, skipping
/// the projection steps — for callers (tests, S1-S4) that work
/// directly in metres.
pub fn boundary_swaths_planar(
    polygon_xy: &PlanarPolygon,
    offset: Length,
    tolerance: Length,
) -> Result<Vec<PolygonSwaths<crate::geometry::types::PlanarPoint>>> {
    let inset_mp = buffer_inset(polygon_xy, offset)?;
    if inset_mp.is_empty() {
        return Ok(vec![]);
    }

    let mut output = vec![];
    for polygon in &inset_mp.polygons {
        let simplified = simplify(polygon, tolerance)?;
        let (rotated, corner_lists) = polygon_corners(&simplified);

        let outer = extract_swaths(&rotated.outer, &corner_lists[0]);
        let holes = rotated
            .inners
            .iter()
            .zip(corner_lists.iter().skip(1))
            .map(|(hole, hole_corners)| extract_swaths(hole, hole_corners))
            .collect();

        output.push(PolygonSwaths { outer, holes });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::types::{LatLon, PlanarPoint, Polygon, Ring};
    use crate::units::Angle;

    fn planar_square(side: f64) -> PlanarPolygon {
        let ring = Ring::new(vec![
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(side), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(side), Length::metres(side)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(side)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
        ]);
        Polygon::new(ring, vec![])
    }

    /// Unit square, small inset, no corner-rotation needed.
    #[test]
    fn unit_square_small_inset_yields_four_swaths() {
        let poly = planar_square(100.0);
        let swaths = boundary_swaths_planar(&poly, Length::metres(5.0), Length::metres(0.1))
            .unwrap();
        assert_eq!(swaths.len(), 1);
        assert_eq!(swaths[0].outer.paths.len(), 4);
        assert!(swaths[0].holes.is_empty());

        let mut covered = vec![];
        for path in &swaths[0].outer.paths {
            for &p in &path.0 {
                if covered.last() != Some(&p) {
                    covered.push(p);
                }
            }
        }
        if covered.len() > 1 && covered.first() == covered.last() {
            covered.pop();
        }
        assert_eq!(covered.len(), 4);
        for p in &covered {
            assert!((p.x.meters() - 5.0).abs() < 1e-6 || (p.x.meters() - 95.0).abs() < 1e-6);
            assert!((p.y.meters() - 5.0).abs() < 1e-6 || (p.y.meters() - 95.0).abs() < 1e-6);
        }
    }

    /// A narrow rectangle collapses to an empty output list.
    #[test]
    fn narrow_rectangle_collapses_to_empty() {
        let ring = Ring::new(vec![
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(200.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(200.0), Length::metres(8.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(8.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
        ]);
        let poly = Polygon::new(ring, vec![]);
        let swaths =
            boundary_swaths_planar(&poly, Length::metres(5.0), Length::metres(0.1)).unwrap();
        assert!(swaths.is_empty());
    }

    /// A square with a centred square hole produces an outer and an
    /// inner swath set.
    #[test]
    fn square_with_hole_yields_outer_and_inner_swaths() {
        let outer = Ring::new(vec![
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(100.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(100.0), Length::metres(100.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(100.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
        ]);
        let hole = Ring::new(vec![
            PlanarPoint::new(Length::metres(40.0), Length::metres(40.0)),
            PlanarPoint::new(Length::metres(40.0), Length::metres(60.0)),
            PlanarPoint::new(Length::metres(60.0), Length::metres(60.0)),
            PlanarPoint::new(Length::metres(60.0), Length::metres(40.0)),
            PlanarPoint::new(Length::metres(40.0), Length::metres(40.0)),
        ]);
        let poly = Polygon::new(outer, vec![hole]);
        let swaths =
            boundary_swaths_planar(&poly, Length::metres(2.0), Length::metres(0.1)).unwrap();
        assert_eq!(swaths.len(), 1);
        assert_eq!(swaths[0].outer.paths.len(), 4);
        assert_eq!(swaths[0].holes.len(), 1);
        assert_eq!(swaths[0].holes[0].paths.len(), 4);
    }

    /// A regular pentagon (circumradius 50 m) offset by 2 m keeps its
    /// five sharp corners and yields one swath per side.
    #[test]
    fn regular_pentagon_yields_five_swaths() {
        let radius = 50.0;
        let mut points = vec![];
        for k in 0..5 {
            let theta = (90.0 - (k as f64) * 72.0).to_radians();
            points.push(PlanarPoint::new(
                Length::metres(radius * theta.cos()),
                Length::metres(radius * theta.sin()),
            ));
        }
        points.push(points[0]);
        let poly = Polygon::new(Ring::new(points), vec![]);

        let swaths =
            boundary_swaths_planar(&poly, Length::metres(2.0), Length::metres(0.1)).unwrap();
        assert_eq!(swaths.len(), 1);
        assert_eq!(swaths[0].outer.paths.len(), 5);
        assert!(swaths[0].holes.is_empty());
    }

    /// A geographic polygon near 45°N round-trips through the
    /// projector and lands within the expected bounding box.
    #[test]
    fn geographic_square_round_trips_and_stays_in_bbox() {
        let half_side_deg = 0.00045;
        let lat0 = 45.0;
        let lon0 = 0.0;
        let pts = vec![
            (lat0 - half_side_deg, lon0 - half_side_deg),
            (lat0 - half_side_deg, lon0 + half_side_deg),
            (lat0 + half_side_deg, lon0 + half_side_deg),
            (lat0 + half_side_deg, lon0 - half_side_deg),
            (lat0 - half_side_deg, lon0 - half_side_deg),
        ];
        let ring = Ring::new(
            pts.into_iter()
                .map(|(lat, lon)| LatLon {
                    lat: Angle::degrees(lat),
                    lon: Angle::degrees(lon),
                })
                .collect(),
        );
        let poly = Polygon::new(ring, vec![]);

        let swaths = boundary_swaths(&poly, Length::metres(5.0), Length::metres(0.1)).unwrap();
        assert_eq!(swaths.len(), 1);
        for path in &swaths[0].outer.paths {
            for p in &path.0 {
                assert!(p.lat.as_degrees() >= lat0 - half_side_deg);
                assert!(p.lat.as_degrees() <= lat0 + half_side_deg);
                assert!(p.lon.as_degrees() >= lon0 - half_side_deg);
                assert!(p.lon.as_degrees() <= lon0 + half_side_deg);
            }
        }
    }
}
