//! Shapefile reader.
//!
//! Accepts only `SHPT_POLYGON`; the companion `.dbf` must carry exactly
//! five fields, in order: `fid`, `CLIENTNAME`, `FARM_NAME`, `FIELD_NAME`,
//! `WITH_HOLES`. A shapefile polygon's first ring is the field boundary;
//! any further rings are holes. Points are kept in the file's own
//! `(x, y)` = `(lon, lat)` order and are neither re-closed nor
//! reordered here — orientation is corrected later, once, inside the
//! buffering step rather than at every codec boundary.

use shapefile::dbase::FieldValue;
use shapefile::{PolygonRing, Shape, ShapeType};

use crate::error::{InsetError, Result};
use crate::geometry::{GeoMultiPolygon, LatLon, Polygon, Ring};
use crate::logger;
use crate::model::{FarmDb, Field, FieldId};
use crate::units::Angle;

const EXPECTED_FIELDS: [&str; 5] = ["fid", "CLIENTNAME", "FARM_NAME", "FIELD_NAME", "WITH_HOLES"];

/// Reads `path` and folds every record into `db`: customers are
/// deduplicated by `CLIENTNAME`, farms by `(CLIENTNAME, FARM_NAME)`, and
/// fields by `(CLIENTNAME, FARM_NAME, FIELD_NAME)`, each found-or-created
/// against `db`'s existing rows rather than pushed unconditionally.
pub fn load_shapefile(path: &str, db: &mut FarmDb) -> Result<()> {
    for record in read_shapefile(path)? {
        let customer = match db.find_customer_by_name(&record.customer_name) {
            Some(id) => id,
            None => db.add_customer(record.customer_name.clone()),
        };
        let farm = match db.find_farm_by_name(customer, &record.farm_name) {
            Some(id) => id,
            None => db.add_farm(record.farm_name.clone(), Some(customer)),
        };
        if db.find_field_by_name(farm, &record.field_name).is_some() {
            logger::warn(&format!(
                "{path}: duplicate field {:?}/{:?}/{:?}, keeping the first record",
                record.customer_name, record.farm_name, record.field_name
            ));
            continue;
        }

        let mut field = record.into_field();
        field.farm = Some(farm);
        field.customer = Some(customer);
        debug_assert_eq!(db.farms[farm.0].customer, Some(customer));
        db.add_field(field);
    }
    Ok(())
}

/// Reads every polygon record in `path` (a `.shp` path; `.shx`/`.dbf`
/// siblings are loaded automatically) into one [`Field`] per record.
/// Customer, farm, and field name resolution into a [`FarmDb`] happens
/// in [`load_shapefile`], the caller of this function.
pub fn read_shapefile(path: &str) -> Result<Vec<ShapeRecord>> {
    let mut reader = shapefile::Reader::from_path(path)
        .map_err(|e| InsetError::parse(path, format!("failed to open shapefile: {e}")))?;

    if reader.header().shape_type != ShapeType::Polygon {
        return Err(InsetError::parse(
            path,
            format!(
                "unsupported shape type {:?}; only Polygon is accepted",
                reader.header().shape_type
            ),
        ));
    }

    let mut records = vec![];
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|e| {
            InsetError::parse(path, format!("failed to read shape record: {e}"))
        })?;

        check_schema(&record, path)?;

        let polygon = match shape {
            Shape::Polygon(polygon) => polygon,
            other => {
                return Err(InsetError::parse(
                    path,
                    format!("expected a Polygon shape, found {other}"),
                ))
            }
        };

        let client_name = field_as_string(&record, "CLIENTNAME", path)?;
        let farm_name = field_as_string(&record, "FARM_NAME", path)?;
        let field_name = field_as_string(&record, "FIELD_NAME", path)?;

        records.push(ShapeRecord {
            customer_name: client_name,
            farm_name,
            field_name,
            boundary: polygon_to_geo(&polygon, path)?,
        });
    }
    Ok(records)
}

/// One shapefile record, still carrying its customer/farm names as
/// plain strings: id resolution into a `FarmDb` happens in the caller.
pub struct ShapeRecord {
    pub customer_name: String,
    pub farm_name: String,
    pub field_name: String,
    pub boundary: GeoMultiPolygon,
}

impl ShapeRecord {
    pub fn into_field(self) -> Field {
        Field {
            id: FieldId(0),
            name: self.field_name,
            farm: None,
            customer: None,
            area: None,
            boundary: self.boundary,
            swaths: vec![],
            extra_attrs: vec![],
        }
    }
}

fn check_schema(record: &shapefile::dbase::Record, path: &str) -> Result<()> {
    if record.len() != EXPECTED_FIELDS.len() {
        return Err(InsetError::parse(
            path,
            format!(
                "DBF has {} fields, expected exactly {}: {:?}",
                record.len(),
                EXPECTED_FIELDS.len(),
                EXPECTED_FIELDS
            ),
        ));
    }
    for name in EXPECTED_FIELDS {
        if record.get(name).is_none() {
            return Err(InsetError::parse(
                path,
                format!("DBF is missing required field {name}"),
            ));
        }
    }
    Ok(())
}

fn field_as_string(record: &shapefile::dbase::Record, name: &str, path: &str) -> Result<String> {
    match record.get(name) {
        Some(FieldValue::Character(Some(s))) => Ok(s.trim().to_string()),
        Some(FieldValue::Character(None)) => Ok(String::new()),
        Some(other) => Err(InsetError::parse(
            path,
            format!("DBF field {name} is not a text value: {other:?}"),
        )),
        None => Err(InsetError::parse(path, format!("DBF is missing field {name}"))),
    }
}

/// A shapefile polygon's rings arrive pre-classified by the `shapefile`
/// crate as [`PolygonRing::Outer`]/`Inner` from their winding; the
/// first outer ring found becomes the boundary, later outer rings
/// would indicate a multi-part field the strict schema does not
/// support and are rejected rather than silently dropped.
fn polygon_to_geo(polygon: &shapefile::Polygon, path: &str) -> Result<GeoMultiPolygon> {
    let mut outer = None;
    let mut inners = vec![];
    for ring in polygon.rings() {
        let points = ring_to_latlon(ring.points(), path)?;
        match ring {
            PolygonRing::Outer(_) => {
                if outer.is_some() {
                    return Err(InsetError::parse(
                        path,
                        "polygon has more than one outer ring; multi-part shapes are not supported",
                    ));
                }
                outer = Some(points);
            }
            PolygonRing::Inner(_) => inners.push(points),
        }
    }
    let outer = outer.ok_or_else(|| InsetError::parse(path, "polygon has no outer ring"))?;
    if inners.is_empty() {
        logger::info("shapefile record has no interior rings");
    }
    Ok(GeoMultiPolygon::new(vec![Polygon::new(outer, inners)]))
}

fn ring_to_latlon(points: &[shapefile::Point], path: &str) -> Result<Ring<LatLon>> {
    let mut out = Vec::with_capacity(points.len());
    for p in points {
        out.push(
            LatLon::new(Angle::degrees(p.y), Angle::degrees(p.x))
                .map_err(|e| InsetError::parse(path, e.to_string()))?,
        );
    }
    Ok(Ring::new(out))
}
