//! Core geometry: projection, buffering, simplification, corner
//! detection, swath extraction, and the orchestrator that composes
//! them into the end-to-end inset operation.
//!
//! Every operation here is pure with respect to its inputs: no shared
//! state, no I/O, safe to call concurrently on disjoint geometries
//! from multiple threads.

pub mod buffer;
pub mod corners;
pub mod inset;
pub mod projector;
pub mod simplify;
pub mod swath;
pub mod types;

pub use inset::{boundary_swaths, boundary_swaths_planar, PolygonSwaths, DEFAULT_TOLERANCE};
pub use projector::Projection;
pub use types::{
    Corners, GeoMultiPath, GeoMultiPolygon, GeoPath, GeoPolygon, GeoRing, LatLon, MultiPath,
    MultiPolygon, Path, PlanarMultiPath, PlanarMultiPolygon, PlanarPath, PlanarPolygon,
    PlanarPoint, PlanarRing, Polygon, Ring,
};
