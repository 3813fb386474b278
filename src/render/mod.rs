//! Render job orchestration.
//!
//! Consumes a parsed [`Document`](crate::deck::Document), synthesizes a
//! composition plan from its timeline, and drives asynchronous render jobs
//! through the external encoder and speech collaborators.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use slidereel::deck::DeckParser;
//! use slidereel::render::{JobRegistry, RenderConfig, RenderOrchestrator};
//! # use slidereel::render::{ArtifactRef, CollaboratorError, CompositionPlan, NarrationClip, VideoEncoder};
//! # struct CliEncoder;
//! # #[async_trait::async_trait]
//! # impl VideoEncoder for CliEncoder {
//! #     async fn invoke(&self, _: &CompositionPlan, _: &RenderConfig) -> Result<ArtifactRef, CollaboratorError> { unimplemented!() }
//! #     async fn merge_audio(&self, _: &ArtifactRef, _: &[NarrationClip], _: &RenderConfig) -> Result<ArtifactRef, CollaboratorError> { unimplemented!() }
//! # }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parsed = DeckParser::new().parse(std::fs::read("deck.pptx")?)?;
//!
//! let registry = Arc::new(JobRegistry::new());
//! let orchestrator = Arc::new(RenderOrchestrator::new(
//!     Arc::clone(&registry),
//!     Arc::new(CliEncoder),
//! ));
//!
//! let job_id = orchestrator.submit("project-1", Arc::new(parsed.document), RenderConfig::default());
//! orchestrator.start(job_id)?;
//!
//! // Observe outcomes by polling snapshots
//! let snapshot = registry.get_job(job_id).unwrap();
//! println!("{:?} at {}%", snapshot.status, snapshot.progress);
//! # Ok(())
//! # }
//! ```

pub mod collaborators;
pub mod config;
pub mod error;
pub mod job;
mod orchestrator;
pub mod plan;
pub mod registry;

pub use collaborators::{
    ArtifactRef, CollaboratorError, NarrationClip, SpeechSynthesizer, SynthesizedAudio,
    VideoEncoder,
};
pub use config::{AvatarOverlay, RenderConfig, VoiceParams};
pub use error::{JobError, JobTransitionError, RenderStage};
pub use job::{JobStatus, RenderJob};
pub use orchestrator::RenderOrchestrator;
pub use plan::{CompositionPlan, LayerInstruction, LayerSource, LayerTiming, LayerTransform};
pub use registry::JobRegistry;
