//! Error types for the draftdiff library.

use std::io;
use thiserror::Error;

/// Result type alias for draftdiff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing and comparing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a readable OOXML container.
    #[error("Cannot open container for {name}: {reason}")]
    Container { name: String, reason: String },

    /// A part every well-formed document must carry is absent.
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Error parsing a WordprocessingML part.
    #[error("XML parse error in {part}: {reason}")]
    Xml { part: String, reason: String },

    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Report serialization failed.
    #[error("Report error: {0}")]
    Report(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Report(err.to_string())
    }
}
