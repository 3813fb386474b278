//! Unified error types for the slidereel library.
//!
//! Each layer has its own error enum (`FormatError` for deck parsing,
//! `JobError` for render jobs); this module provides the unified type that
//! public entry points return.
use thiserror::Error;

pub use crate::deck::error::{ExtractionWarning, FormatError, WarningKind};
pub use crate::render::error::{JobError, JobTransitionError, RenderStage};

/// Main error type for slidereel operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Deck container or part parsing failed fatally
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Render job request was rejected or a job stage failed
    #[error(transparent)]
    Job(#[from] JobError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<JobTransitionError> for Error {
    fn from(err: JobTransitionError) -> Self {
        Error::Job(JobError::Transition(err))
    }
}

/// Result type for slidereel operations.
pub type Result<T> = std::result::Result<T, Error>;
