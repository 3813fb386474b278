//! The typed document model produced by deck parsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully parsed deck.
///
/// Slides are exclusively owned by the document; indices are contiguous,
/// 1-based, and ordered by the numeric suffix of each slide part's path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pub slides: Vec<Slide>,
}

impl Document {
    /// Total number of words across titles, text blocks, and notes.
    pub fn word_count(&self) -> usize {
        self.slides.iter().map(Slide::word_count).sum()
    }
}

/// Document-level properties from the core-properties part.
///
/// Missing textual fields default to the empty string and missing timestamps
/// to the extraction time; later stages never see an absent field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Equals `slides.len()` after a successful parse.
    pub slide_count: usize,
}

/// One slide of the deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// Stem of the slide part's file name, e.g. "slide3"
    pub id: String,
    /// 1-based position in the deck
    pub index: usize,
    pub title: Option<String>,
    pub text_blocks: Vec<TextBlock>,
    pub images: Vec<ImageRef>,
    pub notes: Option<String>,
    pub layout: LayoutKind,
    pub estimated_duration_seconds: u64,
}

impl Slide {
    /// Narration text for this slide: title, text blocks, then notes,
    /// space-joined in that order.
    pub fn narration_text(&self) -> String {
        let mut pieces: Vec<&str> = Vec::new();
        if let Some(title) = &self.title {
            pieces.push(title);
        }
        for block in &self.text_blocks {
            pieces.push(&block.text);
        }
        if let Some(notes) = &self.notes {
            pieces.push(notes);
        }
        pieces.join(" ")
    }

    pub fn word_count(&self) -> usize {
        self.narration_text().split_whitespace().count()
    }
}

/// The semantic role a text block plays within its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Title,
    Body,
    Other,
}

/// A contiguous text body extracted from one shape.
///
/// Paragraph breaks inside the owning shape become newline separators within
/// the same block, never separate blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub role: TextRole,
    pub position: Position,
    pub style: TextStyle,
}

/// Shape geometry in normalized units (fractions of the slide box).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Position {
    /// Full-slide box.
    pub const FULL: Position = Position {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };
}

/// Character formatting of a text block, taken from its first run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points
    pub font_size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    /// RGB hex color, e.g. "FF0000"
    pub color: Option<String>,
}

/// An image embedded in a slide, with its payload resolved.
///
/// An `ImageRef` only exists when its relationship id resolved to an entry
/// present in the container; failed resolutions are skipped with a warning
/// instead of producing an empty-bytes reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    pub relationship_id: String,
    /// Absolute container path of the media entry
    pub container_path: String,
    /// Extension taken from the target path suffix, e.g. "png"
    pub mime_extension: String,
    pub bytes: Vec<u8>,
    pub position: Position,
}

/// Slide layout classification.
///
/// Derived deterministically from the *set* of placeholder roles and content
/// detected on the slide, with a fixed precedence; traversal order never
/// affects the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    TitleOnly,
    TitleContent,
    TitleImage,
    ImageOnly,
    Content,
    Unknown,
}
