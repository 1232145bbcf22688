//! CLI argument parsing and validation.
//!
//! Arguments are all named flags validated into a `Config`, rather than
//! a mix of positional and named arguments, since every option here
//! (`--name`, `--input`, `--inset`, `--output`) reads consistently that
//! way.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{InsetError, Result};
use crate::units::Length;

const FEET_TO_METRES: f64 = 0.3048;
const MIN_INSET_FEET: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Xml,
    Zip,
    Shapefile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Xml,
    Wkt,
    Zip,
}

/// Command line arguments for `inset-xml`.
#[derive(Parser, Debug)]
#[command(name = "inset-xml")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the input TASKDATA file (.xml, .XML, a .zip wrapping one,
    /// or a .shp shapefile).
    #[arg(short = 'i', long = "input", default_value = "TASKDATA.XML")]
    pub input: PathBuf,

    /// Inset distance, in feet. Must be greater than 0.5 ft.
    #[arg(short = 'd', long = "inset")]
    pub inset_feet: f64,

    /// Name given to the generated boundary/swath collection.
    #[arg(short = 'n', long = "name", default_value = "Inset")]
    pub name: String,

    /// Output path (.xml, .XML, .wkt, .WKT, or a .zip wrapping XML).
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Simplifier tolerance, in meters.
    #[arg(long = "tolerance", default_value = "0.1")]
    pub tolerance: f64,

    /// Print debug-level detail.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress all but error output.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Fully validated configuration object.
#[derive(Debug)]
pub struct Config {
    pub input: PathBuf,
    pub input_format: InputFormat,
    pub inset: Length,
    pub name: String,
    pub output: PathBuf,
    pub output_format: OutputFormat,
    pub tolerance: Length,
}

impl Args {
    /// Validates arguments and converts them to a structured `Config`.
    pub fn validate(self) -> Result<Config> {
        if self.verbose && self.quiet {
            return Err(InsetError::InvalidInput(
                "--verbose and --quiet are mutually exclusive".to_string(),
            ));
        }

        if !(self.inset_feet > MIN_INSET_FEET) {
            return Err(InsetError::InvalidInput(format!(
                "inset distance {} ft must be greater than {MIN_INSET_FEET} ft",
                self.inset_feet
            )));
        }

        if self.tolerance <= 0.0 {
            return Err(InsetError::InvalidInput(format!(
                "tolerance {} must be positive",
                self.tolerance
            )));
        }

        let input_format = input_format(&self.input)?;
        let output_format = output_format(&self.output)?;

        Ok(Config {
            input: self.input,
            input_format,
            inset: Length::metres(self.inset_feet * FEET_TO_METRES),
            name: self.name,
            output: self.output,
            output_format,
            tolerance: Length::metres(self.tolerance),
        })
    }
}

fn input_format(path: &std::path::Path) -> Result<InputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("xml") | Some("XML") => Ok(InputFormat::Xml),
        Some("zip") | Some("ZIP") => Ok(InputFormat::Zip),
        Some("shp") | Some("SHP") => Ok(InputFormat::Shapefile),
        other => Err(InsetError::InvalidInput(format!(
            "unsupported input extension {:?}; expected .xml, .zip, or .shp",
            other
        ))),
    }
}

fn output_format(path: &std::path::Path) -> Result<OutputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("xml") | Some("XML") => Ok(OutputFormat::Xml),
        Some("wkt") | Some("WKT") => Ok(OutputFormat::Wkt),
        Some("zip") | Some("ZIP") => Ok(OutputFormat::Zip),
        other => Err(InsetError::InvalidInput(format!(
            "unsupported output extension {:?}; expected .xml, .wkt, or .zip",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            input: PathBuf::from("TASKDATA.XML"),
            inset_feet: 30.0,
            name: "Inset".to_string(),
            output: PathBuf::from("out.xml"),
            tolerance: 0.1,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn rejects_inset_at_or_below_the_half_foot_minimum() {
        let mut args = base_args();
        args.inset_feet = 0.5;
        assert!(args.validate().is_err());
    }

    #[test]
    fn accepts_inset_above_the_minimum_and_converts_to_metres() {
        let config = base_args().validate().unwrap();
        assert!((config.inset.meters() - 30.0 * FEET_TO_METRES).abs() < 1e-9);
    }

    #[test]
    fn rejects_unsupported_output_extension() {
        let mut args = base_args();
        args.output = PathBuf::from("out.png");
        assert!(args.validate().is_err());
    }

    #[test]
    fn recognizes_a_zip_wrapped_input() {
        let mut args = base_args();
        args.input = PathBuf::from("TASKDATA.zip");
        let config = args.validate().unwrap();
        assert_eq!(config.input_format, InputFormat::Zip);
    }

    #[test]
    fn recognizes_a_shapefile_input() {
        let mut args = base_args();
        args.input = PathBuf::from("Field1.shp");
        let config = args.validate().unwrap();
        assert_eq!(config.input_format, InputFormat::Shapefile);
    }

    #[test]
    fn verbose_and_quiet_together_are_rejected() {
        let mut args = base_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }
}
