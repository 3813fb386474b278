//! Error and warning types for deck container parsing.
use thiserror::Error;

/// Fatal parsing errors.
///
/// Any of these aborts the whole parse; no `Document` is produced. Partial
/// extraction issues are reported as [`ExtractionWarning`]s instead.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Input exceeds the caller-supplied size bound
    #[error("input of {size} bytes exceeds the configured maximum of {max} bytes")]
    OversizedInput { size: u64, max: u64 },

    /// Byte stream does not start with a ZIP local file header
    #[error("input is not a ZIP-based deck container")]
    NotAnArchive,

    /// Archive could not be read
    #[error("ZIP error: {0}")]
    Zip(String),

    /// A part every deck container must carry is absent
    #[error("required part missing: {0}")]
    MissingRequiredPart(String),

    /// Lookup of a container entry failed
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// A part path could not be interpreted
    #[error("invalid part path: {0}")]
    InvalidPartPath(String),

    /// Document-level XML parsing failed
    #[error("XML error: {0}")]
    Xml(String),

    /// A slide part's XML failed to parse at document level
    #[error("slide {index} is unparseable: {detail}")]
    SlideUnparseable { index: usize, detail: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for FormatError {
    fn from(err: zip::result::ZipError) -> Self {
        FormatError::Zip(err.to_string())
    }
}

impl From<quick_xml::Error> for FormatError {
    fn from(err: quick_xml::Error) -> Self {
        FormatError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for FormatError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        FormatError::Xml(err.to_string())
    }
}

/// What kind of content a partial-extraction warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A malformed shape was skipped; the rest of the slide was kept
    ShapeSkipped,
    /// An image referenced a relationship id absent from the slide's map
    UnresolvedRelationship,
    /// A resolved relationship pointed at an entry the container lacks
    MissingMediaEntry,
    /// A notes part exists but could not be read
    NotesUnreadable,
    /// The speech collaborator failed for one scene
    NarrationSynthesisFailed,
}

/// A recoverable extraction problem.
///
/// Warnings are accumulated during parsing and returned alongside the
/// best-effort `Document`; they never block progress.
#[derive(Debug, Clone)]
pub struct ExtractionWarning {
    /// 1-based slide index the warning belongs to, if slide-scoped
    pub slide_index: Option<usize>,
    pub kind: WarningKind,
    pub detail: String,
}

impl ExtractionWarning {
    pub fn for_slide(slide_index: usize, kind: WarningKind, detail: impl Into<String>) -> Self {
        Self {
            slide_index: Some(slide_index),
            kind,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slide_index {
            Some(idx) => write!(f, "slide {}: {:?}: {}", idx, self.kind, self.detail),
            None => write!(f, "{:?}: {}", self.kind, self.detail),
        }
    }
}

/// Result type for deck parsing operations.
pub type Result<T> = std::result::Result<T, FormatError>;
