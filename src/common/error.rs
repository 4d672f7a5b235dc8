//! Unified error type for cardpress operations.

use thiserror::Error;

/// Main error type for cardpress operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing or writing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Package part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// File is not a usable template
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// PDF conversion failure
    #[error("PDF conversion failed: {0}")]
    Convert(String),
}

/// Result type for cardpress operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}
