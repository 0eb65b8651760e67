//! Error type used by the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum TellusKmlError {
    /// The source of a reader could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    SourceUnavailable {
        /// Path the reader was constructed from.
        path: PathBuf,
        /// Underlying error reported by the OS.
        source: std::io::Error,
    },

    /// The source failed mid-read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not a well-formed KML geometry.
    #[error("malformed KML geometry: {0}")]
    Malformed(String),

    /// A known element was found where a geometry element is required.
    #[error("unsupported geometry element <{0}>")]
    UnsupportedElement(String),
}

impl From<quick_xml::Error> for TellusKmlError {
    fn from(value: quick_xml::Error) -> Self {
        match value {
            quick_xml::Error::Io(source) => {
                Self::Io(std::io::Error::new(source.kind(), source))
            }
            other => Self::Malformed(other.to_string()),
        }
    }
}
