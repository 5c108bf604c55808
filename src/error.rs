//! Error types.
//!
//! `EditorError` is what crosses the public API (load, export, FFI).
//! `WidthRejection` is the recoverable kind: a width control refused its
//! input. The dispatcher logs those and carries on.

use thiserror::Error;

/// Errors from loading, annotating and exporting documents.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The document text is not well-formed XML
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Root element other than `score-partwise`
    #[error("Unsupported root element: '{0}'. Only 'score-partwise' is supported.")]
    UnsupportedRoot(String),

    /// Compressed MusicXML could not be unpacked
    #[error("MXL archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Export requested before any document was read
    #[error("No document has been loaded")]
    NothingLoaded,

    /// A `<measure>` whose `number` attribute has no leading integer
    #[error("Measure number '{0}' is not a number")]
    InvalidMeasureNumber(String),

    /// The document has a measure the loaded sheet does not know about
    #[error("Couldn't find measure {number}")]
    MeasureNotFound { number: i32 },
}

/// Result type alias for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

impl From<roxmltree::Error> for EditorError {
    fn from(e: roxmltree::Error) -> Self {
        EditorError::Xml(e.to_string())
    }
}

/// Why a width control left the factors untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidthRejection {
    #[error("no current measure selected")]
    NoSelection,

    /// Nothing typed yet
    #[error("empty input")]
    Empty,

    #[error("invalid width input '{0}'")]
    Unparsable(String),

    #[error("{value}% outside {min}%..{max}%")]
    OutOfRange { value: f64, min: f64, max: f64 },

    /// Selection points at a measure the store does not hold
    #[error("unknown measure index {0}")]
    UnknownMeasure(usize),
}
