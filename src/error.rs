//! Error types for the mathpress library.

use std::io;
use thiserror::Error;

/// Result type alias for mathpress operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while producing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Overlapping or malformed delimiter matches that cannot be resolved.
    #[error("Segmentation error: {0}")]
    Segmentation(String),

    /// The typesetting engine could not produce output for one math segment.
    ///
    /// Recoverable: the assembler substitutes a bracketed text fallback.
    #[error("Math rendering error: {0}")]
    Render(String),

    /// Network/HTTP/parse failure calling the external LaTeX compiler.
    ///
    /// Recoverable: the caller falls back to the local pipeline.
    #[error("Remote compilation error: {0}")]
    RemoteCompile(String),

    /// The OCR service rejected the request or returned an unusable response.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Unrecoverable failure while serializing the final document bytes.
    #[error("Document assembly error: {0}")]
    Assembly(String),

    /// Text could not be encoded for the active page font.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Invalid document options.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteCompile(err.to_string())
    }
}

impl Error {
    /// Whether overall document production can continue after this error.
    ///
    /// Per-segment render failures and remote compilation failures degrade
    /// gracefully; everything else aborts the operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Render(_) | Error::RemoteCompile(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Render("unbalanced brace".to_string());
        assert_eq!(err.to_string(), "Math rendering error: unbalanced brace");

        let err = Error::Assembly("out of memory".to_string());
        assert_eq!(err.to_string(), "Document assembly error: out of memory");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::Render("x".into()).is_recoverable());
        assert!(Error::RemoteCompile("x".into()).is_recoverable());
        assert!(!Error::Assembly("x".into()).is_recoverable());
        assert!(!Error::Segmentation("x".into()).is_recoverable());
    }
}
