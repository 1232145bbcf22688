//! Input/output codecs: ISO 11783-10 TASKDATA XML, Shapefile, WKT
//! text output, and the zip-archive wrapper shared by the XML paths.

pub mod iso_xml;
pub mod shapefile_io;
pub mod wkt_out;
pub mod zip_io;

pub use iso_xml::{parse_iso_xml, write_iso_xml, TaskDataHeader};
pub use shapefile_io::{load_shapefile, read_shapefile, ShapeRecord};
pub use wkt_out::write_wkt;
pub use zip_io::{read_taskdata_entry, write_taskdata_entry};
