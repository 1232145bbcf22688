//! Projector — builds a local planar projection from a geographic
//! polygon and transforms points/rings/polygons/paths between the
//! geographic and planar frames.
//!
//! Follows the same `proj::Proj` usage pattern as the GeoPackage
//! reprojection path: a PROJ definition string names the target CRS,
//! `Proj::new_known_crs` builds the transform, and `.convert((x, y))`
//! does the pointwise work. Here the target is always a one-off
//! azimuthal equidistant CRS centred on the polygon's own envelope, so
//! forward and inverse need two independently-built `Proj` handles,
//! one per direction, rather than a single cached one.

use proj::Proj;

use crate::error::{InsetError, Result};
use crate::geometry::types::{
    GeoMultiPath, GeoPath, GeoPolygon, GeoRing, LatLon, MultiPath, Path, PlanarMultiPath,
    PlanarPath, PlanarPoint, PlanarPolygon, PlanarRing, Polygon, Ring,
};
use crate::units::{Angle, Length};

pub struct Projection {
    origin: LatLon,
    forward: Proj,
    inverse: Proj,
}

impl Projection {
    /// Builds an azimuthal-equidistant projection on the WGS-84
    /// ellipsoid, centred on `poly_geo`'s envelope centroid.
    pub fn make_projection(poly_geo: &GeoPolygon) -> Result<Self> {
        if poly_geo.outer.is_empty() {
            return Err(InsetError::Projection(
                "cannot project an empty polygon".into(),
            ));
        }

        let origin = envelope_centroid(poly_geo);
        let def = format!(
            "+proj=aeqd +lat_0={} +lon_0={} +ellps=WGS84 +units=m +no_defs",
            origin.lat.as_degrees(),
            origin.lon.as_degrees()
        );

        let forward = Proj::new_known_crs("EPSG:4326", &def, None)
            .map_err(|e| InsetError::Projection(format!("failed to build forward projection {def}: {e}")))?;
        let inverse = Proj::new_known_crs(&def, "EPSG:4326", None)
            .map_err(|e| InsetError::Projection(format!("failed to build inverse projection {def}: {e}")))?;

        Ok(Projection {
            origin,
            forward,
            inverse,
        })
    }

    pub fn origin(&self) -> LatLon {
        self.origin
    }

    pub fn forward_point(&self, geo: LatLon) -> Result<PlanarPoint> {
        let (x, y): (f64, f64) = self
            .forward
            .convert((geo.lon.as_degrees(), geo.lat.as_degrees()))
            .map_err(|e| InsetError::Projection(e.to_string()))?;
        Ok(PlanarPoint::new(Length::metres(x), Length::metres(y)))
    }

    pub fn inverse_point(&self, planar: PlanarPoint) -> Result<LatLon> {
        let (lon, lat): (f64, f64) = self
            .inverse
            .convert((planar.x.meters(), planar.y.meters()))
            .map_err(|e| InsetError::Projection(e.to_string()))?;
        LatLon::new(Angle::degrees(lat), Angle::degrees(lon))
    }

    pub fn forward_ring(&self, ring: &GeoRing) -> Result<PlanarRing> {
        let points = ring
            .0
            .iter()
            .map(|p| self.forward_point(*p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Ring::new(points))
    }

    pub fn inverse_ring(&self, ring: &PlanarRing) -> Result<GeoRing> {
        let points = ring
            .0
            .iter()
            .map(|p| self.inverse_point(*p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Ring::new(points))
    }

    pub fn forward_polygon(&self, poly: &GeoPolygon) -> Result<PlanarPolygon> {
        let outer = self.forward_ring(&poly.outer)?;
        let inners = poly
            .inners
            .iter()
            .map(|r| self.forward_ring(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(outer, inners))
    }

    pub fn inverse_polygon(&self, poly: &PlanarPolygon) -> Result<GeoPolygon> {
        let outer = self.inverse_ring(&poly.outer)?;
        let inners = poly
            .inners
            .iter()
            .map(|r| self.inverse_ring(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(outer, inners))
    }

    pub fn forward_path(&self, path: &GeoPath) -> Result<PlanarPath> {
        let points = path
            .0
            .iter()
            .map(|p| self.forward_point(*p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Path::new(points))
    }

    pub fn inverse_path(&self, path: &PlanarPath) -> Result<GeoPath> {
        let points = path
            .0
            .iter()
            .map(|p| self.inverse_point(*p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Path::new(points))
    }

    pub fn inverse_multipath(&self, mp: &PlanarMultiPath) -> Result<GeoMultiPath> {
        let paths = mp
            .paths
            .iter()
            .map(|p| self.inverse_path(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiPath::new(paths))
    }
}

/// Axis-aligned envelope centroid of a geographic polygon, across the
/// outer ring and every hole.
fn envelope_centroid(poly: &GeoPolygon) -> LatLon {
    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lon = f64::MAX;
    let mut max_lon = f64::MIN;

    for ring in std::iter::once(&poly.outer).chain(poly.inners.iter()) {
        for p in &ring.0 {
            min_lat = min_lat.min(p.lat.as_degrees());
            max_lat = max_lat.max(p.lat.as_degrees());
            min_lon = min_lon.min(p.lon.as_degrees());
            max_lon = max_lon.max(p.lon.as_degrees());
        }
    }

    LatLon {
        lat: Angle::degrees((min_lat + max_lat) / 2.0),
        lon: Angle::degrees((min_lon + max_lon) / 2.0),
    }
}
