//! Error types for reportdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for reportdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering or exporting a report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The page geometry cannot hold a single line of content.
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Parser or renderer options are inconsistent.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Error while producing draw commands or paragraphs.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error from the PDF writer.
    #[error("PDF writing error: {0}")]
    Pdf(String),

    /// Error while assembling the DOCX package.
    #[error("Package error: {0}")]
    Package(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No exporter is registered for the requested format.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Package(err.to_string()),
        }
    }
}
