//! Error types for schedule parsing and slide generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading schedules or building presentations.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The PDF could not be loaded or its text could not be extracted.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The presentation template is missing required parts or slides.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The requested schedule period is not one of the known month names.
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),
}
