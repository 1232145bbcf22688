//! Crate-wide error type.
//!
//! Every public operation returns `Result<T>`. The variants mirror the
//! error kinds named by the system design: `InvalidInput`, `IoError`,
//! `ParseError`, `GeometryError`, `ProjectionError`, and `Bug` (an
//! internal precondition violation, which should never surface from a
//! correct caller).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsetError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    IoPlain(#[from] std::io::Error),

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("projection error: {0}")]
    Projection(String),

    #[error("internal error (please report): {0}")]
    Bug(String),
}

pub type Result<T> = std::result::Result<T, InsetError>;

impl InsetError {
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        InsetError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        InsetError::Io {
            path: path.into(),
            source,
        }
    }

    /// The CLI exit code this error kind maps to: 2 for argument/input
    /// errors, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            InsetError::InvalidInput(_) => 2,
            _ => 1,
        }
    }
}

impl From<zip::result::ZipError> for InsetError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => InsetError::IoPlain(io),
            other => InsetError::Parse {
                path: String::new(),
                message: other.to_string(),
            },
        }
    }
}

impl From<shapefile::Error> for InsetError {
    fn from(e: shapefile::Error) -> Self {
        InsetError::Parse {
            path: String::new(),
            message: e.to_string(),
        }
    }
}

impl From<quick_xml::Error> for InsetError {
    fn from(e: quick_xml::Error) -> Self {
        InsetError::Parse {
            path: String::new(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_exit_code_two() {
        let err = InsetError::InvalidInput("bad offset".into());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn other_errors_map_to_exit_code_one() {
        assert_eq!(InsetError::Geometry("x".into()).exit_code(), 1);
        assert_eq!(InsetError::Projection("x".into()).exit_code(), 1);
        assert_eq!(InsetError::Bug("x".into()).exit_code(), 1);
    }

    #[test]
    fn error_messages_name_the_path() {
        let err = InsetError::parse("TASKDATA.XML", "missing VersionMajor");
        assert!(err.to_string().contains("TASKDATA.XML"));
        assert!(err.to_string().contains("missing VersionMajor"));
    }
}
