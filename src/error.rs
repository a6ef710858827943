//! Error types for untoc library.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for untoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The text collaborator could not supply text for a document.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The input is neither plain text nor a JSON source document.
    #[error("Unknown source format")]
    UnknownFormat,

    /// The source document is malformed.
    #[error("Invalid source document: {0}")]
    InvalidSource(String),

    /// No outline title phrase within the scanned window.
    #[error("No table of contents heading within the first {scanned} lines")]
    SectionNotFound {
        /// Number of lines searched
        scanned: usize,
    },

    /// The classifier gave up before producing any entry.
    #[error("No outline entries recognized after scanning {scanned} lines")]
    ClassificationExhausted {
        /// Number of lines scanned after the section title
        scanned: usize,
    },

    /// A structurally valid outline failed the quality gate.
    #[error("Outline rejected: {0}")]
    QualityRejected(RejectReason),

    /// The document carries no embedded outline metadata.
    #[error("Document has no embedded outline")]
    NoEmbeddedOutline,

    /// The heading scan found no heading markers.
    #[error("No heading markers found in document text")]
    NoHeadings,

    /// Every extraction strategy failed for a document.
    #[error("No outline could be produced for {0}")]
    NoOutline(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error during rendering (outline text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error ends only the current strategy.
    ///
    /// The fallback ladder advances on these; everything else propagates
    /// to the caller as a hard failure.
    pub fn is_strategy_failure(&self) -> bool {
        matches!(
            self,
            Error::SectionNotFound { .. }
                | Error::ClassificationExhausted { .. }
                | Error::QualityRejected(_)
                | Error::NoEmbeddedOutline
                | Error::NoHeadings
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidSource(err.to_string())
    }
}

/// Why the quality gate rejected an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Entry count at or below the configured floor.
    TooShort {
        /// Entries in the candidate outline
        entries: usize,
        /// Configured floor
        floor: usize,
    },
    /// A long run of numeric-only headings, typically a mis-detected index.
    NumericRun {
        /// Length of the longest numeric-only run
        run: usize,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort { entries, floor } => {
                write!(f, "{} entries, needs more than {}", entries, floor)
            }
            RejectReason::NumericRun { run } => {
                write!(f, "{} consecutive numeric-only lines", run)
            }
        }
    }
}
