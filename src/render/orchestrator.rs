//! Render job orchestration.
//!
//! Owns job lifecycle, progress reporting, composition-plan synthesis, and
//! cancellation. Each render job runs as an independent tokio task; every
//! outcome, including stage failures and timeouts, is captured into the
//! job's registry record rather than thrown across the async boundary —
//! callers observe jobs exclusively by polling registry snapshots.

use crate::deck::model::Document;
use crate::render::collaborators::{NarrationClip, SpeechSynthesizer, VideoEncoder};
use crate::render::config::{RenderConfig, VoiceParams};
use crate::render::error::{JobError, RenderStage, Result};
use crate::render::job::JobStatus;
use crate::render::plan::CompositionPlan;
use crate::render::registry::{JobRegistry, JobSlot};
use crate::timeline::{DEFAULT_WORDS_PER_MINUTE, Timeline};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::timeout;
use uuid::Uuid;

/// Progress checkpoints at the end of each stage.
const PROGRESS_PREPARED: u8 = 20;
const PROGRESS_ENCODED: u8 = 80;
const PROGRESS_MERGED: u8 = 95;
const PROGRESS_DONE: u8 = 100;

/// Drives render jobs from submission to a terminal state.
pub struct RenderOrchestrator {
    registry: Arc<JobRegistry>,
    encoder: Arc<dyn VideoEncoder>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    voice: VoiceParams,
    words_per_minute: u32,
    /// Documents awaiting their job's start; the orchestrator borrows
    /// already-parsed documents, it never re-owns slide data.
    pending: Mutex<HashMap<Uuid, Arc<Document>>>,
}

impl RenderOrchestrator {
    pub fn new(registry: Arc<JobRegistry>, encoder: Arc<dyn VideoEncoder>) -> Self {
        Self {
            registry,
            encoder,
            speech: None,
            voice: VoiceParams::default(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a speech collaborator; scenes then get synthesized narration.
    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>, voice: VoiceParams) -> Self {
        self.speech = Some(speech);
        self.voice = voice;
        self
    }

    /// Override the narration pace used for duration estimation.
    pub fn with_words_per_minute(mut self, words_per_minute: u32) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Create a queued render job for a parsed document.
    pub fn submit(&self, project_id: &str, document: Arc<Document>, config: RenderConfig) -> Uuid {
        let id = self.registry.create(project_id, config);
        self.pending.lock().insert(id, document);
        tracing::info!(job_id = %id, project_id, "render job submitted");
        id
    }

    /// Start processing a queued job.
    ///
    /// Rejects jobs that are not currently Queued — including jobs already
    /// Processing — with a [`JobTransitionError`]; the running job is
    /// unaffected. Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>, id: Uuid) -> Result<()> {
        let slot = self.registry.slot(id).ok_or(JobError::NotFound(id))?;
        slot.record.lock().transition(JobStatus::Processing)?;

        let Some(document) = self.pending.lock().remove(&id) else {
            let mut record = slot.record.lock();
            record.error_message = Some("no document attached to job".to_string());
            let _ = record.transition(JobStatus::Error);
            return Err(JobError::Stage {
                stage: RenderStage::Preparation,
                message: "no document attached to job".to_string(),
            });
        };

        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            orchestrator.run_job(id, slot, document).await;
        });
        Ok(())
    }

    /// Execute the stage pipeline for one job.
    ///
    /// Stage boundaries are the only cancellation points; collaborator
    /// calls are atomic but bounded by the config's timeouts.
    async fn run_job(&self, id: Uuid, slot: Arc<JobSlot>, document: Arc<Document>) {
        let config = slot.record.lock().config.clone();
        tracing::info!(job_id = %id, slides = document.slides.len(), "render job processing");

        // Stage 1: asset preparation and narration synthesis (0-20%)
        if self.cancelled(&slot, id) {
            return;
        }
        let (timeline, clips) = match self.prepare(&slot, &document, &config).await {
            Ok(prepared) => prepared,
            Err(e) => return fail(&slot, id, e),
        };

        // Stage 2: composition-plan synthesis and encoder invocation (20-80%)
        if self.cancelled(&slot, id) {
            return;
        }
        let plan = CompositionPlan::build(&document, &timeline, &config);
        let artifact = match timeout(config.encoder_timeout(), self.encoder.invoke(&plan, &config))
            .await
        {
            Err(_) => {
                return fail(
                    &slot,
                    id,
                    JobError::Timeout {
                        stage: RenderStage::Encoding,
                        budget_seconds: config.encoder_timeout_seconds,
                    },
                );
            },
            Ok(Err(e)) => {
                return fail(
                    &slot,
                    id,
                    JobError::Stage {
                        stage: RenderStage::Encoding,
                        message: e.message,
                    },
                );
            },
            Ok(Ok(artifact)) => artifact,
        };
        slot.record.lock().advance_progress(PROGRESS_ENCODED);

        // Stage 3: audio composition merge, when narration exists (80-95%)
        if self.cancelled(&slot, id) {
            return;
        }
        let artifact = if clips.is_empty() {
            artifact
        } else {
            match timeout(
                config.encoder_timeout(),
                self.encoder.merge_audio(&artifact, &clips, &config),
            )
            .await
            {
                Err(_) => {
                    return fail(
                        &slot,
                        id,
                        JobError::Timeout {
                            stage: RenderStage::AudioMerge,
                            budget_seconds: config.encoder_timeout_seconds,
                        },
                    );
                },
                Ok(Err(e)) => {
                    return fail(
                        &slot,
                        id,
                        JobError::Stage {
                            stage: RenderStage::AudioMerge,
                            message: e.message,
                        },
                    );
                },
                Ok(Ok(artifact)) => artifact,
            }
        };
        slot.record.lock().advance_progress(PROGRESS_MERGED);

        // Stage 4: finalization (95-100%)
        if self.cancelled(&slot, id) {
            return;
        }
        {
            let mut record = slot.record.lock();
            record.output_ref = Some(artifact.uri);
            record.advance_progress(PROGRESS_DONE);
            // Infallible: the task is the only writer while Processing
            let _ = record.transition(JobStatus::Completed);
        }
        tracing::info!(job_id = %id, "render job completed");
    }

    /// Synthesize the timeline, collecting narration clips when a speech
    /// collaborator is attached. A per-scene synthesis failure downgrades
    /// that scene to its estimated duration; a synthesis timeout fails the
    /// stage.
    async fn prepare(
        &self,
        slot: &Arc<JobSlot>,
        document: &Document,
        config: &RenderConfig,
    ) -> Result<(Timeline, Vec<NarrationClip>)> {
        let estimated = Timeline::synthesize(document, self.words_per_minute);
        let Some(speech) = &self.speech else {
            slot.record.lock().advance_progress(PROGRESS_PREPARED);
            return Ok((estimated, Vec::new()));
        };

        let mut clips = Vec::new();
        let mut durations = HashMap::new();
        let scene_count = estimated.scenes.len().max(1);
        for (position, scene) in estimated.scenes.iter().enumerate() {
            match timeout(
                config.tts_timeout(),
                speech.synthesize(&scene.narration, &self.voice),
            )
            .await
            {
                Err(_) => {
                    return Err(JobError::Timeout {
                        stage: RenderStage::Preparation,
                        budget_seconds: config.tts_timeout_seconds,
                    });
                },
                Ok(Err(e)) => {
                    // Scene-level warning, not a job failure
                    tracing::warn!(
                        slide = scene.slide_index,
                        error = %e,
                        "narration synthesis failed; keeping estimated duration"
                    );
                },
                Ok(Ok(audio)) => {
                    durations.insert(scene.slide_index, audio.duration_seconds);
                    clips.push(NarrationClip {
                        slide_index: scene.slide_index,
                        audio,
                    });
                },
            }
            let scaled = (PROGRESS_PREPARED as usize * (position + 1) / scene_count) as u8;
            slot.record.lock().advance_progress(scaled);
        }

        let timeline =
            Timeline::synthesize_with_durations(document, self.words_per_minute, &durations);
        slot.record.lock().advance_progress(PROGRESS_PREPARED);
        Ok((timeline, clips))
    }

    /// Check the cancellation flag at a stage boundary, finalizing the job
    /// when it is set.
    fn cancelled(&self, slot: &Arc<JobSlot>, id: Uuid) -> bool {
        if !slot.cancel.is_cancelled() {
            return false;
        }
        let mut record = slot.record.lock();
        if record.status == JobStatus::Processing {
            let _ = record.transition(JobStatus::Cancelled);
            tracing::info!(job_id = %id, progress = record.progress, "render job cancelled");
        }
        true
    }
}

/// Capture a stage failure into the job record. Progress is left at its
/// last value for diagnostics.
fn fail(slot: &Arc<JobSlot>, id: Uuid, error: JobError) {
    let mut record = slot.record.lock();
    record.error_message = Some(error.to_string());
    let _ = record.transition(JobStatus::Error);
    tracing::warn!(job_id = %id, progress = record.progress, error = %error, "render job failed");
}
