//! Render job orchestration tests against collaborator doubles.

use async_trait::async_trait;
use slidereel::deck::model::{LayoutKind, Metadata, Slide};
use slidereel::deck::Document;
use slidereel::render::{
    ArtifactRef, CollaboratorError, CompositionPlan, JobError, JobRegistry, JobStatus,
    NarrationClip, RenderConfig, RenderOrchestrator, SpeechSynthesizer, SynthesizedAudio,
    VideoEncoder, VoiceParams,
};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Encoder double with configurable latency and failure modes.
struct StubEncoder {
    delay: Duration,
    fail_invoke: bool,
    fail_merge: bool,
    invocations: AtomicUsize,
    merged_clip_counts: AtomicUsize,
}

impl StubEncoder {
    fn ok() -> Self {
        Self::with_delay(Duration::from_millis(0))
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            fail_invoke: false,
            fail_merge: false,
            invocations: AtomicUsize::new(0),
            merged_clip_counts: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail_invoke: true,
            ..Self::ok()
        }
    }
}

#[async_trait]
impl VideoEncoder for StubEncoder {
    async fn invoke(
        &self,
        plan: &CompositionPlan,
        _config: &RenderConfig,
    ) -> Result<ArtifactRef, CollaboratorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail_invoke {
            return Err(CollaboratorError::new("encoder exploded"));
        }
        Ok(ArtifactRef {
            uri: format!("render://video-{}-layers", plan.layers.len()),
        })
    }

    async fn merge_audio(
        &self,
        artifact: &ArtifactRef,
        clips: &[NarrationClip],
        _config: &RenderConfig,
    ) -> Result<ArtifactRef, CollaboratorError> {
        self.merged_clip_counts.store(clips.len(), Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail_merge {
            return Err(CollaboratorError::new("merge exploded"));
        }
        Ok(ArtifactRef {
            uri: format!("{}+audio", artifact.uri),
        })
    }
}

/// Speech double reporting a fixed duration per scene.
struct StubSpeech {
    fail: bool,
    seconds_per_scene: f64,
}

#[async_trait]
impl SpeechSynthesizer for StubSpeech {
    async fn synthesize(
        &self,
        text: &str,
        _voice: &VoiceParams,
    ) -> Result<SynthesizedAudio, CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::new("voice unavailable"));
        }
        Ok(SynthesizedAudio {
            audio: text.as_bytes().to_vec(),
            duration_seconds: self.seconds_per_scene,
        })
    }
}

fn test_document(slide_count: usize) -> Arc<Document> {
    let now = Utc::now();
    let slides = (1..=slide_count)
        .map(|index| Slide {
            id: format!("slide{index}"),
            index,
            title: Some(format!("Slide {index} title")),
            text_blocks: Vec::new(),
            images: Vec::new(),
            notes: None,
            layout: LayoutKind::TitleOnly,
            estimated_duration_seconds: 2,
        })
        .collect();
    Arc::new(Document {
        metadata: Metadata {
            title: "Test deck".to_string(),
            author: String::new(),
            subject: String::new(),
            created_at: now,
            modified_at: now,
            slide_count,
        },
        slides,
    })
}

fn orchestrator_with(encoder: Arc<StubEncoder>) -> Arc<RenderOrchestrator> {
    let registry = Arc::new(JobRegistry::new());
    Arc::new(RenderOrchestrator::new(registry, encoder))
}

/// Poll a job until it reaches a terminal state, recording every observed
/// (status, progress) sample on the way.
async fn observe_until_terminal(
    registry: &Arc<JobRegistry>,
    id: Uuid,
) -> Vec<(JobStatus, u8)> {
    let mut samples = Vec::new();
    for _ in 0..10_000 {
        let snapshot = registry.get_job(id).expect("job must exist");
        samples.push((snapshot.status, snapshot.progress));
        if snapshot.status.is_terminal() {
            return samples;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("job never reached a terminal state");
}

#[tokio::test]
async fn job_completes_with_artifact_and_full_progress() {
    let encoder = Arc::new(StubEncoder::ok());
    let orchestrator = orchestrator_with(Arc::clone(&encoder));

    let id = orchestrator.submit("project-1", test_document(2), RenderConfig::default());
    assert_eq!(
        orchestrator.registry().get_job(id).unwrap().status,
        JobStatus::Queued
    );

    orchestrator.start(id).unwrap();
    let samples = observe_until_terminal(orchestrator.registry(), id).await;

    let snapshot = orchestrator.registry().get_job(id).unwrap();
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.progress, 100);
    assert!(snapshot.output_ref.as_deref().unwrap().starts_with("render://"));
    assert!(snapshot.error_message.is_none());
    assert!(snapshot.started_at.is_some());
    assert!(snapshot.completed_at.is_some());

    // Observed statuses follow a legal path
    for (status, _) in &samples {
        assert!(matches!(
            status,
            JobStatus::Queued | JobStatus::Processing | JobStatus::Completed
        ));
    }
}

#[tokio::test]
async fn progress_is_monotonic_for_observers() {
    let encoder = Arc::new(StubEncoder::with_delay(Duration::from_millis(10)));
    let orchestrator = orchestrator_with(encoder);

    let id = orchestrator.submit("project-1", test_document(3), RenderConfig::default());
    orchestrator.start(id).unwrap();

    let samples = observe_until_terminal(orchestrator.registry(), id).await;
    let progresses: Vec<u8> = samples.iter().map(|(_, p)| *p).collect();
    assert!(progresses.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*progresses.last().unwrap(), 100);
}

#[tokio::test]
async fn starting_a_processing_job_is_rejected_without_side_effects() {
    let encoder = Arc::new(StubEncoder::with_delay(Duration::from_secs(30)));
    let orchestrator = orchestrator_with(encoder);

    let id = orchestrator.submit("project-1", test_document(1), RenderConfig::default());
    orchestrator.start(id).unwrap();
    assert_eq!(
        orchestrator.registry().get_job(id).unwrap().status,
        JobStatus::Processing
    );

    // Wait for the preparation checkpoint so progress is stable while the
    // encoder double sleeps
    let before = loop {
        let snapshot = orchestrator.registry().get_job(id).unwrap();
        if snapshot.progress >= 20 {
            break snapshot.progress;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    };

    let err = orchestrator.start(id).unwrap_err();
    match err {
        JobError::Transition(t) => {
            assert_eq!(t.from, JobStatus::Processing);
            assert_eq!(t.to, JobStatus::Processing);
        },
        other => panic!("expected a transition error, got {other:?}"),
    }
    // The original job is unaffected
    let snapshot = orchestrator.registry().get_job(id).unwrap();
    assert_eq!(snapshot.status, JobStatus::Processing);
    assert_eq!(snapshot.progress, before);
}

#[tokio::test]
async fn starting_an_unknown_job_is_not_found() {
    let orchestrator = orchestrator_with(Arc::new(StubEncoder::ok()));
    assert!(matches!(
        orchestrator.start(Uuid::new_v4()),
        Err(JobError::NotFound(_))
    ));
}

#[tokio::test]
async fn cancel_while_queued_never_enters_processing() {
    let orchestrator = orchestrator_with(Arc::new(StubEncoder::ok()));
    let id = orchestrator.submit("project-1", test_document(1), RenderConfig::default());

    assert!(orchestrator.registry().request_cancel(id));
    assert_eq!(
        orchestrator.registry().get_job(id).unwrap().status,
        JobStatus::Cancelled
    );

    // A cancelled job cannot be started afterwards
    assert!(matches!(
        orchestrator.start(id),
        Err(JobError::Transition(_))
    ));
}

#[tokio::test]
async fn cancel_while_processing_takes_effect_at_stage_boundary() {
    let encoder = Arc::new(StubEncoder::with_delay(Duration::from_millis(50)));
    let orchestrator = orchestrator_with(encoder);

    let id = orchestrator.submit("project-1", test_document(1), RenderConfig::default());
    orchestrator.start(id).unwrap();
    assert!(orchestrator.registry().request_cancel(id));

    let samples = observe_until_terminal(orchestrator.registry(), id).await;
    assert_eq!(samples.last().unwrap().0, JobStatus::Cancelled);
    // Cancelled is terminal: once observed, nothing follows it
    let snapshot = orchestrator.registry().get_job(id).unwrap();
    assert_eq!(snapshot.status, JobStatus::Cancelled);
    assert!(snapshot.completed_at.is_some());
}

#[tokio::test]
async fn cancel_on_completed_job_is_noop_false() {
    let orchestrator = orchestrator_with(Arc::new(StubEncoder::ok()));
    let id = orchestrator.submit("project-1", test_document(1), RenderConfig::default());
    orchestrator.start(id).unwrap();
    observe_until_terminal(orchestrator.registry(), id).await;

    let before = orchestrator.registry().get_job(id).unwrap();
    assert_eq!(before.status, JobStatus::Completed);

    assert!(!orchestrator.registry().request_cancel(id));
    let after = orchestrator.registry().get_job(id).unwrap();
    assert_eq!(after.status, JobStatus::Completed);
    assert_eq!(after.progress, before.progress);
}

#[tokio::test]
async fn encoder_failure_freezes_progress_and_records_stage() {
    let orchestrator = orchestrator_with(Arc::new(StubEncoder::failing()));
    let id = orchestrator.submit("project-1", test_document(1), RenderConfig::default());
    orchestrator.start(id).unwrap();

    let samples = observe_until_terminal(orchestrator.registry(), id).await;
    assert_eq!(samples.last().unwrap().0, JobStatus::Error);

    let snapshot = orchestrator.registry().get_job(id).unwrap();
    let message = snapshot.error_message.unwrap();
    assert!(message.contains("encoding"), "message was: {message}");
    assert!(message.contains("encoder exploded"));
    // Progress stays at the preparation checkpoint reached before the failure
    assert_eq!(snapshot.progress, 20);
    assert!(snapshot.output_ref.is_none());
}

#[tokio::test(start_paused = true)]
async fn encoder_timeout_fails_the_job() {
    let encoder = Arc::new(StubEncoder::with_delay(Duration::from_secs(3600)));
    let orchestrator = orchestrator_with(encoder);

    let config = RenderConfig {
        encoder_timeout_seconds: 5,
        ..RenderConfig::default()
    };
    let id = orchestrator.submit("project-1", test_document(1), config);
    orchestrator.start(id).unwrap();

    let samples = observe_until_terminal(orchestrator.registry(), id).await;
    assert_eq!(samples.last().unwrap().0, JobStatus::Error);

    let snapshot = orchestrator.registry().get_job(id).unwrap();
    let message = snapshot.error_message.unwrap();
    assert!(message.contains("timed out"), "message was: {message}");
    assert_eq!(snapshot.progress, 20);
}

#[tokio::test]
async fn narration_durations_flow_into_merge_stage() {
    let encoder = Arc::new(StubEncoder::ok());
    let speech = Arc::new(StubSpeech {
        fail: false,
        seconds_per_scene: 4.5,
    });
    let registry = Arc::new(JobRegistry::new());
    let orchestrator = Arc::new(
        RenderOrchestrator::new(Arc::clone(&registry), Arc::clone(&encoder) as Arc<dyn VideoEncoder>)
            .with_speech(speech, VoiceParams::default()),
    );

    let id = orchestrator.submit("project-1", test_document(2), RenderConfig::default());
    orchestrator.start(id).unwrap();
    observe_until_terminal(&registry, id).await;

    let snapshot = registry.get_job(id).unwrap();
    assert_eq!(snapshot.status, JobStatus::Completed);
    // Audio was merged into the final artifact
    assert!(snapshot.output_ref.unwrap().ends_with("+audio"));
    assert_eq!(encoder.merged_clip_counts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn speech_failure_is_a_warning_not_a_job_failure() {
    let encoder = Arc::new(StubEncoder::ok());
    let speech = Arc::new(StubSpeech {
        fail: true,
        seconds_per_scene: 0.0,
    });
    let registry = Arc::new(JobRegistry::new());
    let orchestrator = Arc::new(
        RenderOrchestrator::new(Arc::clone(&registry), Arc::clone(&encoder) as Arc<dyn VideoEncoder>)
            .with_speech(speech, VoiceParams::default()),
    );

    let id = orchestrator.submit("project-1", test_document(2), RenderConfig::default());
    orchestrator.start(id).unwrap();
    observe_until_terminal(&registry, id).await;

    let snapshot = registry.get_job(id).unwrap();
    assert_eq!(snapshot.status, JobStatus::Completed);
    // Without any clips, the merge stage is skipped entirely
    assert!(!snapshot.output_ref.unwrap().ends_with("+audio"));
    assert_eq!(encoder.merged_clip_counts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn list_jobs_is_a_read_only_projection() {
    let orchestrator = orchestrator_with(Arc::new(StubEncoder::ok()));
    let a = orchestrator.submit("project-1", test_document(1), RenderConfig::default());
    let _b = orchestrator.submit("project-2", test_document(1), RenderConfig::default());

    let listed = orchestrator.registry().list_jobs("project-1");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, a);
    assert_eq!(listed[0].status, JobStatus::Queued);

    // Listing twice observes the same state
    assert_eq!(orchestrator.registry().list_jobs("project-1").len(), 1);
}
