//! Deck container parsing.
//!
//! Turns a compressed container of XML parts into a typed [`Document`]:
//! container validation, relationship resolution, slide content and media
//! extraction, document metadata, and speaker notes.
//!
//! # Examples
//!
//! ```no_run
//! use slidereel::deck::DeckParser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("presentation.pptx")?;
//! let parsed = DeckParser::new().parse(bytes)?;
//!
//! println!(
//!     "{} slides, {} warnings",
//!     parsed.document.slides.len(),
//!     parsed.warnings.len()
//! );
//! for slide in &parsed.document.slides {
//!     println!("slide {}: {:?}", slide.index, slide.layout);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod container;
pub mod error;
mod media;
mod metadata;
pub mod model;
pub mod partname;
pub mod rels;
pub mod shape;
mod slide;

pub use config::{ParserConfig, ParserConfigBuilder};
pub use container::DeckContainer;
pub use error::{ExtractionWarning, FormatError, WarningKind};
pub use model::{
    Document, ImageRef, LayoutKind, Metadata, Position, Slide, TextBlock, TextRole, TextStyle,
};
pub use partname::PartPath;
pub use rels::{Relationship, Relationships};

use crate::timeline::{DEFAULT_WORDS_PER_MINUTE, estimate_seconds};
use quick_xml::Reader;
use quick_xml::events::Event;
use shape::SlideExtent;

const SLIDES_PREFIX: &str = "ppt/slides/";

/// The outcome of a successful parse: a best-effort document plus every
/// partial-extraction warning accumulated on the way.
#[derive(Debug)]
pub struct ParsedDeck {
    pub document: Document,
    pub warnings: Vec<ExtractionWarning>,
}

/// Parses deck containers into [`Document`]s.
#[derive(Debug, Default)]
pub struct DeckParser {
    config: ParserConfig,
}

impl DeckParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a deck container from raw bytes.
    ///
    /// Fatal [`FormatError`]s abort with no document; recoverable problems
    /// are accumulated into [`ParsedDeck::warnings`].
    pub fn parse(&self, bytes: Vec<u8>) -> error::Result<ParsedDeck> {
        let container = DeckContainer::open(bytes, &self.config)?;
        let extent = slide_extent(&container);

        // Slide ordering derives from the numeric suffix of each part path,
        // not from archive directory order.
        let mut slide_parts: Vec<(usize, PartPath)> = Vec::new();
        for name in container.entries_with_prefix(SLIDES_PREFIX) {
            let part = PartPath::new(format!("/{name}"))?;
            if part.directory() == "/ppt/slides"
                && part.extension() == "xml"
                && part.file_name().starts_with("slide")
                && let Some(suffix) = part.index()
            {
                slide_parts.push((suffix, part));
            }
        }
        slide_parts.sort_by_key(|(suffix, _)| *suffix);

        let mut warnings = Vec::new();
        let mut slides = Vec::with_capacity(slide_parts.len());

        for (ordinal, (suffix, part)) in slide_parts.iter().enumerate() {
            let index = ordinal + 1;
            let xml = container.read_part(part)?;
            let rels = Relationships::for_part(&container, part)?;

            let (draft, slide_warnings) = slide::extract_slide(index, &xml, extent)?;
            warnings.extend(slide_warnings);

            let images = if self.config.extract_images {
                let (images, media_warnings) = media::extract_images(
                    index,
                    &draft.image_shapes,
                    &rels,
                    &container,
                    &self.config,
                );
                warnings.extend(media_warnings);
                images
            } else {
                Vec::new()
            };

            // The notes part pairs with the slide part's own numeric suffix
            let notes = match metadata::extract_notes(*suffix, &container) {
                Ok(notes) => notes,
                Err(e) => {
                    tracing::warn!(slide = index, error = %e, "notes part unreadable");
                    warnings.push(ExtractionWarning::for_slide(
                        index,
                        WarningKind::NotesUnreadable,
                        e.to_string(),
                    ));
                    None
                },
            };

            let stem = part.file_name().trim_end_matches(".xml").to_string();
            let mut slide = Slide {
                id: stem,
                index,
                title: draft.title,
                text_blocks: draft.text_blocks,
                images,
                notes,
                layout: draft.layout,
                estimated_duration_seconds: 0,
            };
            slide.estimated_duration_seconds =
                estimate_seconds(slide.word_count(), DEFAULT_WORDS_PER_MINUTE);
            slides.push(slide);
        }

        let mut document_metadata = metadata::extract_metadata(&container);
        document_metadata.slide_count = slides.len();

        tracing::info!(
            slides = slides.len(),
            warnings = warnings.len(),
            "deck parsed"
        );

        Ok(ParsedDeck {
            document: Document {
                metadata: document_metadata,
                slides,
            },
            warnings,
        })
    }
}

/// Read the declared slide extent from the presentation part.
///
/// Falls back to the format family's default 16:9 box when the part has no
/// usable `sldSz` element.
fn slide_extent(container: &DeckContainer) -> SlideExtent {
    let Ok(xml) = container.read(container::PRESENTATION_PART) else {
        return SlideExtent::default();
    };

    let mut reader = Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"sldSz" {
                    let mut cx = None;
                    let mut cy = None;
                    for attr in e.attributes().flatten() {
                        let value = std::str::from_utf8(&attr.value)
                            .ok()
                            .and_then(|s| s.parse::<i64>().ok());
                        match attr.key.as_ref() {
                            b"cx" => cx = value,
                            b"cy" => cy = value,
                            _ => {},
                        }
                    }
                    if let (Some(width_emu), Some(height_emu)) = (cx, cy)
                        && width_emu > 0
                        && height_emu > 0
                    {
                        return SlideExtent {
                            width_emu,
                            height_emu,
                        };
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
        buf.clear();
    }

    SlideExtent::default()
}
