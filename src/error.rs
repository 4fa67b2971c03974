//! Error types for the id2xml library.

use std::io;
use thiserror::Error;

/// Result type alias for id2xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during draft conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration supplied by the caller.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An unknown document stream was requested.
    #[error("Unknown stream '{0}': expected one of IETF, IAB, IRTF, independent")]
    UnknownStream(String),

    /// A field required for well-formed output is missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Error during XML or JSON rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownStream("iesg".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown stream 'iesg': expected one of IETF, IAB, IRTF, independent"
        );

        let err = Error::MissingField("title");
        assert_eq!(err.to_string(), "Missing required field: title");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
