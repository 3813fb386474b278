//! Render job records and the job status state machine.

use crate::render::config::RenderConfig;
use crate::render::error::JobTransitionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a render job.
///
/// Legal transitions: `Queued -> Processing -> {Completed, Error}`,
/// `Processing -> Cancelled`, and `Queued -> Cancelled`. Everything else is
/// rejected with a [`JobTransitionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
    Cancelled,
}

impl JobStatus {
    /// Terminal states are immutable.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error | JobStatus::Cancelled)
    }

    fn can_transition_to(&self, to: JobStatus) -> bool {
        matches!(
            (self, to),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Queued, JobStatus::Cancelled)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Error)
                | (JobStatus::Processing, JobStatus::Cancelled)
        )
    }
}

/// One render job's record.
///
/// Created on submission and mutated only by the orchestrator's internal
/// stage transitions; callers observe jobs exclusively through snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    pub id: Uuid,
    pub project_id: String,
    pub status: JobStatus,
    /// Monotonically non-decreasing completion percentage (0-100)
    pub progress: u8,
    pub config: RenderConfig,
    /// Reference to the produced artifact, set on completion
    pub output_ref: Option<String>,
    /// Failure description including the failing stage, set on error
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RenderJob {
    pub(crate) fn new(project_id: impl Into<String>, config: RenderConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: project_id.into(),
            status: JobStatus::Queued,
            progress: 0,
            config,
            output_ref: None,
            error_message: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Apply a status transition, rejecting illegal ones without touching
    /// any state.
    pub(crate) fn transition(&mut self, to: JobStatus) -> Result<(), JobTransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(JobTransitionError {
                job_id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        match to {
            JobStatus::Processing => self.started_at = Some(Utc::now()),
            _ if to.is_terminal() => self.completed_at = Some(Utc::now()),
            _ => {},
        }
        Ok(())
    }

    /// Raise progress to `to` percent. Progress never decreases; a stage
    /// that fails leaves the last value in place for diagnostics.
    pub(crate) fn advance_progress(&mut self, to: u8) {
        self.progress = self.progress.max(to.min(100));
    }
}
