//! Error types for svgpdf
//!
//! The converter itself never fails; these cover the fallible edges around it
//! (reading markup, loading options, writing output).

use thiserror::Error;

/// Result type alias for svgpdf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around a conversion
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse SVG markup
    #[error("Failed to parse SVG: {0}")]
    ParseError(String),

    /// Failed to serialize the document back to markup
    #[error("Failed to serialize SVG: {0}")]
    SerializeError(String),

    /// Failed to produce output on a drawing surface
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::SerializeError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
