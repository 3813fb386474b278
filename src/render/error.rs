//! Error types for render job orchestration.

use crate::render::job::JobStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The sequential stages of a processing render job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderStage {
    /// Narration synthesis and asset preparation (0-20%)
    Preparation,
    /// Composition-plan synthesis and encoder invocation (20-80%)
    Encoding,
    /// Narration audio merge (80-95%)
    AudioMerge,
    /// Output artifact reference production (95-100%)
    Finalization,
}

impl std::fmt::Display for RenderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RenderStage::Preparation => "preparation",
            RenderStage::Encoding => "encoding",
            RenderStage::AudioMerge => "audio-merge",
            RenderStage::Finalization => "finalization",
        };
        write!(f, "{name}")
    }
}

/// An illegal job state transition was requested.
///
/// The request is rejected and the job's state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal transition for job {job_id}: {from:?} -> {to:?}")]
pub struct JobTransitionError {
    pub job_id: Uuid,
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Errors surfaced by the render job orchestrator.
///
/// Stage-level variants are captured into the job's `error_message` field;
/// they never cross the registry boundary as exceptions.
#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Transition(#[from] JobTransitionError),

    #[error("job not found: {0}")]
    NotFound(Uuid),

    /// An external collaborator exceeded its time budget
    #[error("stage {stage} timed out after {budget_seconds}s")]
    Timeout {
        stage: RenderStage,
        budget_seconds: u64,
    },

    /// An external collaborator reported an error
    #[error("stage {stage} failed: {message}")]
    Stage { stage: RenderStage, message: String },
}

/// Result type for render job operations.
pub type Result<T> = std::result::Result<T, JobError>;
