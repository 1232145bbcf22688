//! ZIP archive helpers.
//!
//! A zip input is expected to contain exactly the path
//! `TASKDATA/TASKDATA.XML`; a zip output writes a single entry at that
//! same path. File handles and the archive are scoped to the call and
//! released on every exit path, including errors.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{InsetError, Result};

pub const TASKDATA_ENTRY: &str = "TASKDATA/TASKDATA.XML";

/// Reads the `TASKDATA/TASKDATA.XML` entry out of a zip archive's raw
/// bytes.
pub fn read_taskdata_entry(zip_bytes: &[u8], path: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(zip_bytes))?;
    let mut entry = archive.by_name(TASKDATA_ENTRY).map_err(|_| {
        InsetError::parse(
            path,
            format!("zip archive has no entry named {TASKDATA_ENTRY}"),
        )
    })?;
    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Writes `xml_bytes` as the sole entry of a new zip archive, named
/// `TASKDATA/TASKDATA.XML`.
pub fn write_taskdata_entry(xml_bytes: &[u8]) -> Result<Vec<u8>> {
    let buf = Cursor::new(Vec::new());
    let mut writer = ZipWriter::new(buf);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    writer.start_file(TASKDATA_ENTRY, options)?;
    writer.write_all(xml_bytes)?;
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
