mod cli;
mod error;
mod geometry;
mod io;
mod logger;
mod model;
mod units;

use std::fs;
use std::path::Path;

use clap::Parser;

use cli::{Args, Config, InputFormat, OutputFormat};
use error::{InsetError, Result};
use io::{
    load_shapefile, parse_iso_xml, read_taskdata_entry, write_iso_xml, write_taskdata_entry,
    write_wkt, TaskDataHeader,
};
use logger::VerbosityLevel;
use model::FarmDb;

fn main() {
    let args = Args::parse();
    let verbosity = if args.verbose {
        VerbosityLevel::Verbose
    } else if args.quiet {
        VerbosityLevel::Quiet
    } else {
        VerbosityLevel::Normal
    };
    logger::Logger::init(verbosity);

    if let Err(e) = run(args) {
        logger::error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

/// Orchestrates the end-to-end inset operation:
/// 1. Parse CLI arguments and validate them into a `Config`.
/// 2. Load the input (XML, optionally zip-wrapped, or a shapefile) into
///    a `FarmDb`.
/// 3. Run the inset operation over every field.
/// 4. Write the result in the requested output format.
fn run(args: Args) -> Result<()> {
    let config = args.validate()?;

    let input_path = config.input.display().to_string();
    let (header, mut db) = load_input(&config.input, config.input_format, &input_path)?;

    logger::info(&format!(
        "loaded {} customer(s), {} farm(s), {} field(s) from {}",
        db.customers.len(),
        db.farms.len(),
        db.fields.len(),
        input_path
    ));

    db.inset(&config.name, config.inset, config.tolerance)?;

    write_output(&config, &header, &db)?;

    logger::success(&format!("wrote {}", config.output.display()));
    Ok(())
}

fn load_input(
    path: &Path,
    format: InputFormat,
    path_str: &str,
) -> Result<(TaskDataHeader, FarmDb)> {
    match format {
        InputFormat::Xml => {
            let raw = fs::read(path).map_err(|e| InsetError::io(path_str, e))?;
            parse_iso_xml(&raw, path_str)
        }
        InputFormat::Zip => {
            let raw = fs::read(path).map_err(|e| InsetError::io(path_str, e))?;
            let xml_bytes = read_taskdata_entry(&raw, path_str)?;
            parse_iso_xml(&xml_bytes, path_str)
        }
        InputFormat::Shapefile => {
            let mut db = FarmDb::new();
            load_shapefile(path_str, &mut db)?;
            Ok((TaskDataHeader::default(), db))
        }
    }
}

fn write_output(config: &Config, header: &io::TaskDataHeader, db: &FarmDb) -> Result<()> {
    let path_str = config.output.display().to_string();
    match config.output_format {
        OutputFormat::Xml => {
            let bytes = write_iso_xml(header, db)?;
            fs::write(&config.output, bytes).map_err(|e| InsetError::io(path_str, e))
        }
        OutputFormat::Zip => {
            let xml_bytes = write_iso_xml(header, db)?;
            let zip_bytes = write_taskdata_entry(&xml_bytes)?;
            fs::write(&config.output, zip_bytes).map_err(|e| InsetError::io(path_str, e))
        }
        OutputFormat::Wkt => {
            let file = fs::File::create(&config.output).map_err(|e| InsetError::io(path_str, e))?;
            write_wkt(db, std::io::BufWriter::new(file))
        }
    }
}
