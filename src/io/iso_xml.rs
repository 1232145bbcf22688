//! ISO 11783-10 TASKDATA XML codec.
//!
//! Read and write the reduced `ISO11783_TaskData` schema this system
//! targets: `CTR`/`FRM`/`PFD` elements carrying customers, farms, and
//! fields, with `PFD/PLN/LSG/PNT` carrying boundary rings and swath
//! polylines. Unknown attributes on a recognized element are kept
//! verbatim in `extra_attrs`; unknown child elements are logged and
//! dropped, never silently merged into the model.
//!
//! `quick-xml`'s streaming event API is used rather than a derive-based
//! mapping because the writer must reproduce declaration order and
//! pass unknown attributes through untouched, which a serde mapping
//! handles poorly.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};

use crate::error::{InsetError, Result};
use crate::geometry::{GeoMultiPath, GeoMultiPolygon, GeoPolygon, LatLon, MultiPath, Path, Polygon, Ring};
use crate::logger;
use crate::model::{CustomerId, FarmDb, FarmId, Field, FieldId, SwathGroup};
use crate::units::Angle;

/// Header attributes carried on the `ISO11783_TaskData` root element.
#[derive(Debug, Clone)]
pub struct TaskDataHeader {
    pub version_major: i32,
    pub version_minor: i32,
    pub data_transfer_origin: i32,
    pub management_software_manufacturer: Option<String>,
    pub management_software_version: Option<String>,
}

impl Default for TaskDataHeader {
    fn default() -> Self {
        TaskDataHeader {
            version_major: 4,
            version_minor: 0,
            data_transfer_origin: -1,
            management_software_manufacturer: None,
            management_software_version: None,
        }
    }
}

/// A PLN element written with type code `5`, meaning "guidance": this
/// system's own extension to carry swath groups, since the schema
/// only names type `1` (Boundary) for PLN. Chosen to mirror LSG's own
/// `5 = Guidance` type code so the two line up.
const PLN_TYPE_BOUNDARY: &str = "1";
const PLN_TYPE_GUIDANCE: &str = "5";
const LSG_TYPE_EXTERIOR: &str = "1";
const LSG_TYPE_INTERIOR: &str = "2";
const LSG_TYPE_GUIDANCE: &str = "5";
const PNT_TYPE_FIELD: &str = "10";
const PNT_TYPE_GUIDE_A: &str = "6";
const PNT_TYPE_GUIDE_B: &str = "7";
const PNT_TYPE_GUIDE_POINT: &str = "9";

pub fn parse_iso_xml(bytes: &[u8], path: &str) -> Result<(TaskDataHeader, FarmDb)> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut db = FarmDb::new();
    let mut header = None;
    let mut customer_ids: HashMap<String, CustomerId> = HashMap::new();
    let mut farm_ids: HashMap<String, FarmId> = HashMap::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(|e| {
            InsetError::parse(path, format!("XML parse error: {e}"))
        })? {
            Event::Start(e) if e.name().as_ref() == b"ISO11783_TaskData" => {
                header = Some(parse_header(&e, path)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"ISO11783_TaskData" => {
                header = Some(parse_header(&e, path)?);
            }
            Event::Start(e) if e.name().as_ref() == b"CTR" => {
                parse_ctr(&e, path, &mut db, &mut customer_ids)?;
            }
            Event::Empty(e) if e.name().as_ref() == b"CTR" => {
                parse_ctr(&e, path, &mut db, &mut customer_ids)?;
            }
            Event::Start(e) if e.name().as_ref() == b"FRM" => {
                parse_frm(&e, path, &mut db, &customer_ids, &mut farm_ids)?;
            }
            Event::Empty(e) if e.name().as_ref() == b"FRM" => {
                parse_frm(&e, path, &mut db, &customer_ids, &mut farm_ids)?;
            }
            Event::Start(e) if e.name().as_ref() == b"PFD" => {
                let field = parse_pfd(&e, &mut reader, path, &customer_ids, &farm_ids)?;
                db.add_field(field);
            }
            Event::Eof => break,
            Event::Start(other) => {
                logger::warn(&format!(
                    "{path}: ignoring unknown element <{}>",
                    String::from_utf8_lossy(other.name().as_ref())
                ));
                skip_element(&mut reader, other.name())?;
            }
            _ => {}
        }
        buf.clear();
    }

    let header = header.ok_or_else(|| {
        InsetError::parse(path, "missing root element ISO11783_TaskData".to_string())
    })?;
    Ok((header, db))
}

fn attr_string(e: &BytesStart, key: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.key == QName(key.as_bytes()) {
            Some(String::from_utf8_lossy(&a.value).into_owned())
        } else {
            None
        }
    })
}

fn require_attr(e: &BytesStart, key: &str, element: &str, path: &str) -> Result<String> {
    attr_string(e, key)
        .ok_or_else(|| InsetError::parse(path, format!("{element} missing required attribute {key}")))
}

/// Every attribute on `e` not in `known_keys`, preserved in declaration
/// order for round-trip fidelity.
fn extra_attrs(e: &BytesStart, known_keys: &[&str]) -> Vec<(String, String)> {
    e.attributes()
        .flatten()
        .filter_map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
            if known_keys.contains(&key.as_str()) {
                None
            } else {
                Some((key, String::from_utf8_lossy(&a.value).into_owned()))
            }
        })
        .collect()
}

fn parse_header(e: &BytesStart, path: &str) -> Result<TaskDataHeader> {
    let version_major = require_attr(e, "VersionMajor", "ISO11783_TaskData", path)?
        .parse()
        .map_err(|_| InsetError::parse(path, "VersionMajor is not an integer"))?;
    let version_minor = require_attr(e, "VersionMinor", "ISO11783_TaskData", path)?
        .parse()
        .map_err(|_| InsetError::parse(path, "VersionMinor is not an integer"))?;
    let data_transfer_origin = attr_string(e, "DataTransferOrigin")
        .map(|v| v.parse().unwrap_or(-1))
        .unwrap_or(-1);
    Ok(TaskDataHeader {
        version_major,
        version_minor,
        data_transfer_origin,
        management_software_manufacturer: attr_string(e, "ManagementSoftwareManufacturer"),
        management_software_version: attr_string(e, "ManagementSoftwareVersion"),
    })
}

fn parse_ctr(
    e: &BytesStart,
    path: &str,
    db: &mut FarmDb,
    customer_ids: &mut HashMap<String, CustomerId>,
) -> Result<()> {
    let a = require_attr(e, "A", "CTR", path)?;
    let b = attr_string(e, "B").unwrap_or_default();
    let id = db.add_customer(b);
    db.customers.last_mut().unwrap().extra_attrs = extra_attrs(e, &["A", "B"]);
    customer_ids.insert(a, id);
    Ok(())
}

fn parse_frm(
    e: &BytesStart,
    path: &str,
    db: &mut FarmDb,
    customer_ids: &HashMap<String, CustomerId>,
    farm_ids: &mut HashMap<String, FarmId>,
) -> Result<()> {
    let a = require_attr(e, "A", "FRM", path)?;
    let b = attr_string(e, "B").unwrap_or_default();
    let customer = match attr_string(e, "I") {
        Some(cid) => Some(customer_ids.get(&cid).copied().ok_or_else(|| {
            InsetError::parse(path, format!("FRM {a} references unknown customer {cid}"))
        })?),
        None => None,
    };
    let id = db.add_farm(b, customer);
    db.farms.last_mut().unwrap().extra_attrs = extra_attrs(e, &["A", "B", "I"]);
    farm_ids.insert(a, id);
    Ok(())
}

fn parse_pfd(
    start: &BytesStart,
    reader: &mut Reader<&[u8]>,
    path: &str,
    customer_ids: &HashMap<String, CustomerId>,
    farm_ids: &HashMap<String, FarmId>,
) -> Result<Field> {
    let field_id = require_attr(start, "A", "PFD", path)?;
    let name = attr_string(start, "C").unwrap_or_default();
    let area = attr_string(start, "D").and_then(|v| v.parse::<i64>().ok());
    let customer = attr_string(start, "E")
        .map(|cid| {
            customer_ids.get(&cid).copied().ok_or_else(|| {
                InsetError::parse(path, format!("PFD {field_id} references unknown customer {cid}"))
            })
        })
        .transpose()?;
    let farm = attr_string(start, "F")
        .map(|fid| {
            farm_ids.get(&fid).copied().ok_or_else(|| {
                InsetError::parse(path, format!("PFD {field_id} references unknown farm {fid}"))
            })
        })
        .transpose()?;
    let extra_attrs = extra_attrs(start, &["A", "B", "C", "D", "E", "F"]);

    let mut polygons = vec![];
    let mut buf = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| InsetError::parse(path, format!("XML parse error: {e}")))?
        {
            Event::Start(e) if e.name().as_ref() == b"PLN" => {
                if let Some(poly) = parse_pln(&e, reader, path)? {
                    polygons.push(poly);
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"PLN" => {
                // A PLN with no children carries no ring data.
                let _ = e;
            }
            Event::End(e) if e.name().as_ref() == b"PFD" => break,
            Event::Start(other) => {
                logger::warn(&format!(
                    "{path}: ignoring unknown element <{}> inside PFD {field_id}",
                    String::from_utf8_lossy(other.name().as_ref())
                ));
                skip_element(reader, other.name())?;
            }
            Event::Eof => {
                return Err(InsetError::parse(path, "unexpected end of file inside PFD"))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(Field {
        id: FieldId(0),
        name,
        farm,
        customer,
        area,
        boundary: GeoMultiPolygon::new(polygons),
        swaths: vec![],
        extra_attrs,
    })
}

/// Parses a single boundary `PLN`; guidance PLNs (type `5`, written by
/// this system itself) are ignored on read since swaths are always
/// recomputed from the boundary rather than round-tripped.
fn parse_pln(
    start: &BytesStart,
    reader: &mut Reader<&[u8]>,
    path: &str,
) -> Result<Option<GeoPolygon>> {
    let pln_type = attr_string(start, "A").unwrap_or_default();
    let is_boundary = pln_type == PLN_TYPE_BOUNDARY;

    let mut outer = None;
    let mut inners = vec![];
    let mut buf = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| InsetError::parse(path, format!("XML parse error: {e}")))?
        {
            Event::Start(e) if e.name().as_ref() == b"LSG" => {
                let (lsg_type, ring) = parse_lsg(&e, reader, path)?;
                if is_boundary {
                    match lsg_type.as_str() {
                        t if t == LSG_TYPE_EXTERIOR => outer = Some(ring),
                        t if t == LSG_TYPE_INTERIOR => inners.push(ring),
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().as_ref() == b"PLN" => break,
            Event::Eof => {
                return Err(InsetError::parse(path, "unexpected end of file inside PLN"))
            }
            _ => {}
        }
        buf.clear();
    }

    if !is_boundary {
        return Ok(None);
    }
    let outer = outer
        .ok_or_else(|| InsetError::parse(path, "boundary PLN has no exterior LSG"))?;
    if outer.len() < 4 {
        return Err(InsetError::parse(
            path,
            "boundary ring has fewer than 4 points",
        ));
    }
    Ok(Some(Polygon::new(outer, inners)))
}

fn parse_lsg(
    start: &BytesStart,
    reader: &mut Reader<&[u8]>,
    path: &str,
) -> Result<(String, Ring<LatLon>)> {
    let lsg_type = attr_string(start, "A").unwrap_or_default();
    let mut points = vec![];
    let mut buf = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|e| InsetError::parse(path, format!("XML parse error: {e}")))?
        {
            Event::Empty(e) if e.name().as_ref() == b"PNT" => {
                points.push(parse_pnt(&e, path)?);
            }
            Event::Start(e) if e.name().as_ref() == b"PNT" => {
                points.push(parse_pnt(&e, path)?);
            }
            Event::End(e) if e.name().as_ref() == b"LSG" => break,
            Event::Eof => {
                return Err(InsetError::parse(path, "unexpected end of file inside LSG"))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok((lsg_type, Ring::new(points)))
}

fn parse_pnt(e: &BytesStart, path: &str) -> Result<LatLon> {
    let lat: f64 = require_attr(e, "C", "PNT", path)?
        .parse()
        .map_err(|_| InsetError::parse(path, "PNT latitude is not a number"))?;
    let lon: f64 = require_attr(e, "D", "PNT", path)?
        .parse()
        .map_err(|_| InsetError::parse(path, "PNT longitude is not a number"))?;
    LatLon::new(Angle::degrees(lat), Angle::degrees(lon))
}

fn skip_element(reader: &mut Reader<&[u8]>, name: QName) -> Result<()> {
    let mut buf = Vec::new();
    let owned_name = name.as_ref().to_vec();
    loop {
        match reader.read_event_into(&mut buf).map_err(InsetError::from)? {
            Event::End(e) if e.name().as_ref() == owned_name => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

pub fn write_iso_xml(header: &TaskDataHeader, db: &FarmDb) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(InsetError::from)?;

    let mut root = BytesStart::new("ISO11783_TaskData");
    root.push_attribute(("VersionMajor", header.version_major.to_string().as_str()));
    root.push_attribute(("VersionMinor", header.version_minor.to_string().as_str()));
    if header.data_transfer_origin != -1 {
        root.push_attribute((
            "DataTransferOrigin",
            header.data_transfer_origin.to_string().as_str(),
        ));
    }
    if let Some(m) = &header.management_software_manufacturer {
        root.push_attribute(("ManagementSoftwareManufacturer", m.as_str()));
    }
    if let Some(v) = &header.management_software_version {
        root.push_attribute(("ManagementSoftwareVersion", v.as_str()));
    }
    writer.write_event(Event::Start(root)).map_err(InsetError::from)?;

    for (i, customer) in db.customers.iter().enumerate() {
        let mut e = BytesStart::new("CTR");
        e.push_attribute(("A", format!("CTR{i}").as_str()));
        e.push_attribute(("B", customer.name.as_str()));
        for (k, v) in &customer.extra_attrs {
            e.push_attribute((k.as_str(), v.as_str()));
        }
        writer.write_event(Event::Empty(e)).map_err(InsetError::from)?;
    }

    for (i, farm) in db.farms.iter().enumerate() {
        let mut e = BytesStart::new("FRM");
        e.push_attribute(("A", format!("FRM{i}").as_str()));
        e.push_attribute(("B", farm.name.as_str()));
        let cid = farm.customer.map(|c| format!("CTR{}", c.0));
        if let Some(cid) = &cid {
            e.push_attribute(("I", cid.as_str()));
        }
        for (k, v) in &farm.extra_attrs {
            e.push_attribute((k.as_str(), v.as_str()));
        }
        writer.write_event(Event::Empty(e)).map_err(InsetError::from)?;
    }

    for field in &db.fields {
        write_pfd(&mut writer, field)?;
    }

    writer
        .write_event(Event::End(quick_xml::events::BytesEnd::new(
            "ISO11783_TaskData",
        )))
        .map_err(InsetError::from)?;

    Ok(writer.into_inner())
}

fn write_pfd(writer: &mut Writer<Vec<u8>>, field: &Field) -> Result<()> {
    let mut pfd = BytesStart::new("PFD");
    pfd.push_attribute(("A", format!("PFD{}", field.id.0).as_str()));
    pfd.push_attribute(("C", field.name.as_str()));
    if let Some(area) = field.area {
        pfd.push_attribute(("D", area.to_string().as_str()));
    }
    let cid = field.customer.map(|c| format!("CTR{}", c.0));
    if let Some(cid) = &cid {
        pfd.push_attribute(("E", cid.as_str()));
    }
    let fid = field.farm.map(|f| format!("FRM{}", f.0));
    if let Some(fid) = &fid {
        pfd.push_attribute(("F", fid.as_str()));
    }
    for (k, v) in &field.extra_attrs {
        pfd.push_attribute((k.as_str(), v.as_str()));
    }
    writer
        .write_event(Event::Start(pfd))
        .map_err(InsetError::from)?;

    for part in &field.boundary.polygons {
        write_boundary_pln(writer, part)?;
    }
    for group in &field.swaths {
        write_guidance_pln(writer, group)?;
    }

    writer
        .write_event(Event::End(quick_xml::events::BytesEnd::new("PFD")))
        .map_err(InsetError::from)?;
    Ok(())
}

fn write_boundary_pln(writer: &mut Writer<Vec<u8>>, polygon: &GeoPolygon) -> Result<()> {
    let mut pln = BytesStart::new("PLN");
    pln.push_attribute(("A", PLN_TYPE_BOUNDARY));
    writer.write_event(Event::Start(pln)).map_err(InsetError::from)?;

    write_lsg(writer, LSG_TYPE_EXTERIOR, &polygon.outer.0, PNT_TYPE_FIELD)?;
    for hole in &polygon.inners {
        write_lsg(writer, LSG_TYPE_INTERIOR, &hole.0, PNT_TYPE_FIELD)?;
    }

    writer
        .write_event(Event::End(quick_xml::events::BytesEnd::new("PLN")))
        .map_err(InsetError::from)?;
    Ok(())
}

fn write_guidance_pln(writer: &mut Writer<Vec<u8>>, group: &SwathGroup) -> Result<()> {
    let mut pln = BytesStart::new("PLN");
    pln.push_attribute(("A", PLN_TYPE_GUIDANCE));
    pln.push_attribute(("B", group.name.as_str()));
    writer.write_event(Event::Start(pln)).map_err(InsetError::from)?;

    for path in &group.paths.paths {
        write_guidance_path(writer, path)?;
    }

    writer
        .write_event(Event::End(quick_xml::events::BytesEnd::new("PLN")))
        .map_err(InsetError::from)?;
    Ok(())
}

fn write_lsg(writer: &mut Writer<Vec<u8>>, lsg_type: &str, points: &[LatLon], pnt_type: &str) -> Result<()> {
    let mut lsg = BytesStart::new("LSG");
    lsg.push_attribute(("A", lsg_type));
    writer.write_event(Event::Start(lsg)).map_err(InsetError::from)?;
    for p in points {
        write_pnt(writer, pnt_type, *p)?;
    }
    writer
        .write_event(Event::End(quick_xml::events::BytesEnd::new("LSG")))
        .map_err(InsetError::from)?;
    Ok(())
}

fn write_guidance_path(writer: &mut Writer<Vec<u8>>, path: &Path<LatLon>) -> Result<()> {
    let mut lsg = BytesStart::new("LSG");
    lsg.push_attribute(("A", LSG_TYPE_GUIDANCE));
    writer.write_event(Event::Start(lsg)).map_err(InsetError::from)?;

    let last = path.0.len().saturating_sub(1);
    for (i, p) in path.0.iter().enumerate() {
        let pnt_type = if i == 0 {
            PNT_TYPE_GUIDE_A
        } else if i == last {
            PNT_TYPE_GUIDE_B
        } else {
            PNT_TYPE_GUIDE_POINT
        };
        write_pnt(writer, pnt_type, *p)?;
    }

    writer
        .write_event(Event::End(quick_xml::events::BytesEnd::new("LSG")))
        .map_err(InsetError::from)?;
    Ok(())
}

fn write_pnt(writer: &mut Writer<Vec<u8>>, pnt_type: &str, p: LatLon) -> Result<()> {
    let mut pnt = BytesStart::new("PNT");
    pnt.push_attribute(("A", pnt_type));
    pnt.push_attribute(("C", p.lat.as_degrees().to_string().as_str()));
    pnt.push_attribute(("D", p.lon.as_degrees().to_string().as_str()));
    writer.write_event(Event::Empty(pnt)).map_err(InsetError::from)?;
    Ok(())
}

#[allow(dead_code)]
fn unused_text_marker() -> BytesText<'static> {
    BytesText::new("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<ISO11783_TaskData VersionMajor="4" VersionMinor="0">
  <CTR A="CTR1" B="Acme Farms"/>
  <FRM A="FRM1" B="North Block" I="CTR1"/>
  <PFD A="PFD1" C="Field One" D="100" E="CTR1" F="FRM1">
    <PLN A="1">
      <LSG A="1">
        <PNT A="10" C="45.0" D="0.0"/>
        <PNT A="10" C="45.0" D="0.001"/>
        <PNT A="10" C="45.001" D="0.001"/>
        <PNT A="10" C="45.0" D="0.0"/>
      </LSG>
    </PLN>
  </PFD>
</ISO11783_TaskData>"#;

    #[test]
    fn parses_header_customer_farm_and_field_boundary() {
        let (header, db) = parse_iso_xml(SAMPLE.as_bytes(), "TASKDATA.XML").unwrap();
        assert_eq!(header.version_major, 4);
        assert_eq!(db.customers.len(), 1);
        assert_eq!(db.farms.len(), 1);
        assert_eq!(db.fields.len(), 1);
        let field = &db.fields[0];
        assert_eq!(field.name, "Field One");
        assert_eq!(field.area, Some(100));
        assert_eq!(field.boundary.polygons.len(), 1);
        assert_eq!(field.boundary.polygons[0].outer.len(), 4);
    }

    #[test]
    fn rejects_boundary_with_fewer_than_four_points() {
        let bad = SAMPLE.replace(
            r#"<PNT A="10" C="45.0" D="0.0"/>
      </LSG>"#,
            "</LSG>",
        );
        let result = parse_iso_xml(bad.as_bytes(), "bad.xml");
        assert!(result.is_err());
    }

    #[test]
    fn writer_roundtrips_through_the_reader() {
        let (header, db) = parse_iso_xml(SAMPLE.as_bytes(), "TASKDATA.XML").unwrap();
        let bytes = write_iso_xml(&header, &db).unwrap();
        let (header2, db2) = parse_iso_xml(&bytes, "roundtrip.xml").unwrap();
        assert_eq!(header2.version_major, header.version_major);
        assert_eq!(db2.fields.len(), db.fields.len());
        assert_eq!(
            db2.fields[0].boundary.polygons[0].outer.len(),
            db.fields[0].boundary.polygons[0].outer.len()
        );
    }
}
