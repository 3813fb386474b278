//! The process-wide render job registry.
//!
//! The registry is the single shared mutable resource of the render core: an
//! explicit, constructed object rather than global state. Each job gets its
//! own slot whose mutex enforces the single-writer-at-a-time discipline;
//! readers receive consistent snapshots. Jobs are independent, so there is
//! no cross-job locking.

use crate::render::config::RenderConfig;
use crate::render::job::{JobStatus, RenderJob};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// One job's synchronized state.
pub(crate) struct JobSlot {
    pub(crate) record: Mutex<RenderJob>,
    pub(crate) cancel: CancellationToken,
}

/// Registry of render jobs, keyed by job id.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<Uuid, Arc<JobSlot>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new queued job.
    pub(crate) fn create(&self, project_id: &str, config: RenderConfig) -> Uuid {
        let job = RenderJob::new(project_id, config);
        let id = job.id;
        let slot = Arc::new(JobSlot {
            record: Mutex::new(job),
            cancel: CancellationToken::new(),
        });
        self.jobs.write().insert(id, slot);
        id
    }

    pub(crate) fn slot(&self, id: Uuid) -> Option<Arc<JobSlot>> {
        self.jobs.read().get(&id).cloned()
    }

    /// Snapshot a job's current state.
    pub fn get_job(&self, id: Uuid) -> Option<RenderJob> {
        self.slot(id).map(|slot| slot.record.lock().clone())
    }

    /// Snapshot every job belonging to a project, oldest first. Read-only.
    pub fn list_jobs(&self, project_id: &str) -> Vec<RenderJob> {
        let mut jobs: Vec<RenderJob> = self
            .jobs
            .read()
            .values()
            .map(|slot| slot.record.lock().clone())
            .filter(|job| job.project_id == project_id)
            .collect();
        jobs.sort_by_key(|job| job.created_at);
        jobs
    }

    /// Request cancellation of a job.
    ///
    /// Returns `true` only if the job was Queued or Processing at the moment
    /// of the request. A queued job transitions to Cancelled immediately,
    /// without ever entering Processing; a processing job is cancelled at
    /// its next stage boundary. Requests against terminal jobs are a no-op
    /// reported as `false`.
    pub fn request_cancel(&self, id: Uuid) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let mut record = slot.record.lock();
        match record.status {
            JobStatus::Queued => {
                // Infallible: Queued -> Cancelled is always legal
                let _ = record.transition(JobStatus::Cancelled);
                slot.cancel.cancel();
                tracing::info!(job_id = %id, "queued job cancelled");
                true
            },
            JobStatus::Processing => {
                slot.cancel.cancel();
                tracing::info!(job_id = %id, "cancellation requested for processing job");
                true
            },
            _ => false,
        }
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}
