//! Slidereel - slide-deck parsing and render-job orchestration
//!
//! This library turns presentation files packaged as compressed containers
//! of XML parts into typed documents, derives a narration timeline, and
//! drives asynchronous render jobs that compose the timeline into a video
//! artifact via external encoder and text-to-speech collaborators.
//!
//! # Features
//!
//! - **Deck parsing**: container validation, relationship resolution, slide
//!   text/image/notes extraction, layout classification, metadata
//! - **Best-effort extraction**: recoverable problems become warnings
//!   returned alongside the document, never silent drops
//! - **Timeline synthesis**: reproducible per-slide timing from narration
//!   word counts or collaborator-reported audio durations
//! - **Render orchestration**: job registry, progress reporting, stage
//!   timeouts, and boundary cancellation over collaborator interfaces
//!
//! # Example - Parsing a deck
//!
//! ```no_run
//! use slidereel::deck::DeckParser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parsed = DeckParser::new().parse(std::fs::read("presentation.pptx")?)?;
//!
//! println!("title: {}", parsed.document.metadata.title);
//! for slide in &parsed.document.slides {
//!     println!(
//!         "slide {} ({:?}): {} blocks, {} images",
//!         slide.index,
//!         slide.layout,
//!         slide.text_blocks.len(),
//!         slide.images.len()
//!     );
//! }
//! if !parsed.warnings.is_empty() {
//!     eprintln!("{} extraction warnings", parsed.warnings.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Synthesizing a timeline
//!
//! ```no_run
//! use slidereel::deck::DeckParser;
//! use slidereel::timeline::{DEFAULT_WORDS_PER_MINUTE, Timeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let parsed = DeckParser::new().parse(std::fs::read("presentation.pptx")?)?;
//! let timeline = Timeline::synthesize(&parsed.document, DEFAULT_WORDS_PER_MINUTE);
//!
//! println!("estimated length: {}s", timeline.total_seconds);
//! # Ok(())
//! # }
//! ```

/// Deck container parsing: container access, relationships, slides, media,
/// metadata, and notes.
pub mod deck;

/// Timeline synthesis: ordered slides into timed scenes.
pub mod timeline;

/// Render job orchestration: registry, composition plans, collaborators,
/// and the stage pipeline.
pub mod render;

pub mod error;

// Re-export commonly used types for convenience
pub use deck::{DeckParser, Document, LayoutKind, ParsedDeck, ParserConfig, Slide};
pub use error::{Error, Result};
pub use render::{JobRegistry, JobStatus, RenderConfig, RenderJob, RenderOrchestrator};
pub use timeline::{TimedScene, Timeline};
