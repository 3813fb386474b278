//! External collaborator interfaces.
//!
//! The encoder and the speech synthesizer are black boxes: the orchestrator
//! invokes them with plain data and a timeout, and its correctness (state
//! machine, progress, cancellation) does not depend on whether a real
//! implementation or a test double sits behind the trait.

use crate::render::config::{RenderConfig, VoiceParams};
use crate::render::plan::CompositionPlan;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference to a produced output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub uri: String,
}

/// Audio returned by the speech collaborator.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub audio: Vec<u8>,
    pub duration_seconds: f64,
}

/// Narration audio attributed to one scene.
#[derive(Debug, Clone)]
pub struct NarrationClip {
    /// 1-based index of the scene this clip narrates
    pub slide_index: usize,
    pub audio: SynthesizedAudio,
}

/// Failure reported by an external collaborator.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The external video encoder.
///
/// Invocations are opaque and non-interruptible from the orchestrator's
/// perspective; cancellation is only observed between stages.
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    /// Compose a plan into a video artifact.
    async fn invoke(
        &self,
        plan: &CompositionPlan,
        config: &RenderConfig,
    ) -> Result<ArtifactRef, CollaboratorError>;

    /// Merge narration audio into a previously produced artifact.
    async fn merge_audio(
        &self,
        artifact: &ArtifactRef,
        clips: &[NarrationClip],
        config: &RenderConfig,
    ) -> Result<ArtifactRef, CollaboratorError>;
}

/// The external text-to-speech service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize narration audio for one scene's text.
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceParams,
    ) -> Result<SynthesizedAudio, CollaboratorError>;
}
