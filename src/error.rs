//! Error types for the undeck library.

use std::io;
use thiserror::Error;

use crate::model::PathId;

/// Result type alias for undeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during slide-deck processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source document could not be opened at all.
    #[error("Cannot open source document: {0}")]
    SourceOpen(String),

    /// An option was used against a source that does not support it.
    ///
    /// This is normally downgraded to a warning by the parser; it only
    /// reaches callers that invoke a capability directly.
    #[error("Option not supported by this source: {0}")]
    UnsupportedOption(String),

    /// Every strategy of the image conversion cascade failed.
    #[error("No conversion strategy succeeded for image payload")]
    CascadeExhausted,

    /// An embedded object graph revisited an already-open payload.
    #[error("Embedded object cycle detected at {0}")]
    RecursionCycle(PathId),

    /// An embedded payload could not be opened as a presentation.
    #[error("Cannot open embedded document: {0}")]
    EmbeddedOpen(String),

    /// Host application automation is required but unavailable.
    #[error("Host application automation unavailable: {0}")]
    HostUnavailable(String),

    /// An external conversion tool did not finish within the timeout.
    #[error("External tool timed out: {0}")]
    ToolTimeout(String),

    /// Invalid slide range specification.
    #[error("Invalid slide range: {0}")]
    InvalidSlideRange(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The conversion was cancelled by the caller.
    #[error("Conversion cancelled")]
    Cancelled,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PathId;

    #[test]
    fn test_error_display() {
        let err = Error::CascadeExhausted;
        assert_eq!(
            err.to_string(),
            "No conversion strategy succeeded for image payload"
        );

        let err = Error::RecursionCycle(PathId::slide(2).child_embed(1));
        assert_eq!(err.to_string(), "Embedded object cycle detected at S2/E1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
