//! WKT output codec.
//!
//! One tab-separated line per boundary part and per swath:
//! `<field_name>\t<part_name>\t<WKT>`. Boundaries are named `"Boundary"`
//! or `"Boundary F<k>"` when a field has more than one part; swath
//! names come from `FarmDb::inset`'s naming pass and are used as-is.

use std::io::Write;

use geo::{Coord, LineString};
use wkt::ToWkt;

use crate::error::Result;
use crate::geometry::{GeoMultiPath, GeoPolygon, LatLon};
use crate::model::FarmDb;

/// Serializes every field in `db` to tab-separated WKT lines.
pub fn write_wkt(db: &FarmDb, mut out: impl Write) -> Result<()> {
    for field in &db.fields {
        let parts = field.boundary.polygons.len();
        for (i, part) in field.boundary.polygons.iter().enumerate() {
            let part_name = if parts > 1 {
                format!("Boundary F{}", i + 1)
            } else {
                "Boundary".to_string()
            };
            writeln!(
                out,
                "{}\t{}\t{}",
                field.name,
                part_name,
                polygon_to_wkt(part)
            )?;
        }

        for group in &field.swaths {
            writeln!(
                out,
                "{}\t{}\t{}",
                field.name,
                group.name,
                multipath_to_wkt(&group.paths)
            )?;
        }
    }
    Ok(())
}

fn polygon_to_wkt(poly: &GeoPolygon) -> String {
    let geo_poly = geo::Polygon::new(
        ring_to_linestring(&poly.outer.0),
        poly.inners.iter().map(|r| ring_to_linestring(&r.0)).collect(),
    );
    geo_poly.to_wkt().to_string()
}

/// A field has at most one swath geometry per WKT line, so a
/// `MultiPath` with more than one open polyline is emitted as the WKT
/// `MULTILINESTRING`; a single path is emitted as `LINESTRING`.
fn multipath_to_wkt(mp: &GeoMultiPath) -> String {
    let lines: Vec<LineString<f64>> = mp.paths.iter().map(|p| path_to_linestring(&p.0)).collect();
    if lines.len() == 1 {
        lines[0].to_wkt().to_string()
    } else {
        geo::MultiLineString::new(lines).to_wkt().to_string()
    }
}

fn ring_to_linestring(points: &[LatLon]) -> LineString<f64> {
    LineString::from(
        points
            .iter()
            .map(|p| Coord {
                x: p.lon.as_degrees(),
                y: p.lat.as_degrees(),
            })
            .collect::<Vec<_>>(),
    )
}

fn path_to_linestring(points: &[LatLon]) -> LineString<f64> {
    ring_to_linestring(points)
}
