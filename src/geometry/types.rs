//! Core geometry vocabulary: points, rings, polygons, paths — all
//! carrying `Length`/`Angle` rather than bare `f64`, generic over the
//! point type so the same container shapes serve geographic (`LatLon`)
//! and planar (`PlanarPoint`) data.
//!
//! These are the types every public core operation speaks in. They are
//! deliberately *not* `geo_types` re-exports: conversion to/from
//! `geo_types::{LineString, Polygon, MultiPolygon}<f64>` happens at the
//! boundary of each algorithm that needs to call into the `geo` crate
//! (buffer, simplify, validity, winding), per the "convert to a
//! canonical planar point type at the projection boundary" strategy.

use crate::error::{InsetError, Result};
use crate::units::{Angle, Length};

/// A geodetic point. `lat` must lie in `[-90, 90]`, `lon` in `(-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: Angle,
    pub lon: Angle,
}

impl LatLon {
    pub fn new(lat: Angle, lon: Angle) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat.as_degrees()) {
            return Err(InsetError::InvalidInput(format!(
                "latitude {} out of range [-90, 90]",
                lat.as_degrees()
            )));
        }
        if !(lon.as_degrees() > -180.0 && lon.as_degrees() <= 180.0) {
            return Err(InsetError::InvalidInput(format!(
                "longitude {} out of range (-180, 180]",
                lon.as_degrees()
            )));
        }
        Ok(LatLon { lat, lon })
    }
}

/// A point in a local planar frame, in metres from the projection origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarPoint {
    pub x: Length,
    pub y: Length,
}

impl PlanarPoint {
    pub fn new(x: Length, y: Length) -> Self {
        PlanarPoint { x, y }
    }

    /// Vector difference `self - other`.
    pub fn sub(self, other: PlanarPoint) -> PlanarPoint {
        PlanarPoint::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_to(self, other: PlanarPoint) -> Length {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_squared_to(self, other: PlanarPoint) -> f64 {
        let dx = (self.x - other.x).meters();
        let dy = (self.y - other.y).meters();
        dx * dx + dy * dy
    }
}

/// 2-D cross product of two planar vectors, treated as `f64` (area-valued).
pub fn cross(a: PlanarPoint, b: PlanarPoint) -> f64 {
    a.x.meters() * b.y.meters() - a.y.meters() * b.x.meters()
}

/// 2-D dot product of two planar vectors, treated as `f64` (area-valued).
pub fn dot(a: PlanarPoint, b: PlanarPoint) -> f64 {
    a.x.meters() * b.x.meters() + a.y.meters() * b.y.meters()
}

/// An ordered sequence of points forming a simple closed ring:
/// `first == last`, at least 4 points.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring<P>(pub Vec<P>);

impl<P: Copy> Ring<P> {
    pub fn new(points: Vec<P>) -> Self {
        Ring(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of unique vertices (ring length minus the closing duplicate).
    pub fn unique_len(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn point(&self, i: usize) -> P {
        self.0[i]
    }
}

impl Ring<PlanarPoint> {
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(a), Some(b)) => *a == *b,
            _ => false,
        }
    }
}

/// Outer ring plus zero or more inner rings (holes).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<P> {
    pub outer: Ring<P>,
    pub inners: Vec<Ring<P>>,
}

impl<P: Copy> Polygon<P> {
    pub fn new(outer: Ring<P>, inners: Vec<Ring<P>>) -> Self {
        Polygon { outer, inners }
    }
}

/// A set of polygons with pairwise-disjoint interiors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon<P> {
    pub polygons: Vec<Polygon<P>>,
}

impl<P> MultiPolygon<P> {
    pub fn new(polygons: Vec<Polygon<P>>) -> Self {
        MultiPolygon { polygons }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// An open polyline of at least 2 vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<P>(pub Vec<P>);

impl<P> Path<P> {
    pub fn new(points: Vec<P>) -> Self {
        Path(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A set of open polylines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPath<P> {
    pub paths: Vec<Path<P>>,
}

impl<P> MultiPath<P> {
    pub fn new(paths: Vec<Path<P>>) -> Self {
        MultiPath { paths }
    }
}

/// Ascending, unique indices into a ring, each referring to a corner.
/// After `adjust`, `corners[0] == 0` and `len() >= 2`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Corners(pub Vec<usize>);

impl Corners {
    pub fn new(indices: Vec<usize>) -> Self {
        Corners(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub type GeoRing = Ring<LatLon>;
pub type GeoPolygon = Polygon<LatLon>;
pub type GeoMultiPolygon = MultiPolygon<LatLon>;
pub type GeoPath = Path<LatLon>;
pub type GeoMultiPath = MultiPath<LatLon>;

pub type PlanarRing = Ring<PlanarPoint>;
pub type PlanarPolygon = Polygon<PlanarPoint>;
pub type PlanarMultiPolygon = MultiPolygon<PlanarPoint>;
pub type PlanarPath = Path<PlanarPoint>;
pub type PlanarMultiPath = MultiPath<PlanarPoint>;

// --- Conversions to/from geo_types, used at algorithm boundaries ---

impl From<&PlanarRing> for geo::LineString<f64> {
    fn from(ring: &PlanarRing) -> Self {
        geo::LineString::from(
            ring.0
                .iter()
                .map(|p| geo::Coord {
                    x: p.x.meters(),
                    y: p.y.meters(),
                })
                .collect::<Vec<_>>(),
        )
    }
}

impl From<&geo::LineString<f64>> for PlanarRing {
    fn from(ls: &geo::LineString<f64>) -> Self {
        Ring::new(
            ls.coords()
                .map(|c| PlanarPoint::new(Length::metres(c.x), Length::metres(c.y)))
                .collect(),
        )
    }
}

impl From<&PlanarPolygon> for geo::Polygon<f64> {
    fn from(poly: &PlanarPolygon) -> Self {
        geo::Polygon::new(
            (&poly.outer).into(),
            poly.inners.iter().map(|r| r.into()).collect(),
        )
    }
}

impl From<&geo::Polygon<f64>> for PlanarPolygon {
    fn from(poly: &geo::Polygon<f64>) -> Self {
        Polygon::new(
            poly.exterior().into(),
            poly.interiors().iter().map(|r| r.into()).collect(),
        )
    }
}

impl From<&PlanarMultiPolygon> for geo::MultiPolygon<f64> {
    fn from(mp: &PlanarMultiPolygon) -> Self {
        geo::MultiPolygon::new(mp.polygons.iter().map(|p| p.into()).collect())
    }
}

impl From<&geo::MultiPolygon<f64>> for PlanarMultiPolygon {
    fn from(mp: &geo::MultiPolygon<f64>) -> Self {
        MultiPolygon::new(mp.iter().map(|p| p.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latlon_rejects_out_of_range_latitude() {
        assert!(LatLon::new(Angle::degrees(91.0), Angle::degrees(0.0)).is_err());
    }

    #[test]
    fn latlon_rejects_out_of_range_longitude() {
        assert!(LatLon::new(Angle::degrees(0.0), Angle::degrees(-180.0)).is_err());
        assert!(LatLon::new(Angle::degrees(0.0), Angle::degrees(180.0)).is_ok());
    }

    #[test]
    fn planar_ring_round_trips_through_geo_types() {
        let ring = Ring::new(vec![
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(10.0), Length::metres(0.0)),
            PlanarPoint::new(Length::metres(10.0), Length::metres(10.0)),
            PlanarPoint::new(Length::metres(0.0), Length::metres(0.0)),
        ]);
        let ls: geo::LineString<f64> = (&ring).into();
        let back: PlanarRing = (&ls).into();
        assert_eq!(ring, back);
    }

    #[test]
    fn cross_and_dot_match_scalar_formulas() {
        let a = PlanarPoint::new(Length::metres(1.0), Length::metres(0.0));
        let b = PlanarPoint::new(Length::metres(0.0), Length::metres(1.0));
        assert_eq!(cross(a, b), 1.0);
        assert_eq!(dot(a, b), 0.0);
    }
}
