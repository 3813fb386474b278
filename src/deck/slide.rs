//! Slide content extraction: text blocks, title determination, and layout
//! classification.

use crate::deck::error::{ExtractionWarning, FormatError, Result, WarningKind};
use crate::deck::model::{LayoutKind, TextBlock, TextRole};
use crate::deck::shape::{
    Classified, ImageShape, PlaceholderRole, Shape, SlideExtent, classify_shapes,
};

/// Shape-derived slide content, before media resolution and notes lookup.
#[derive(Debug)]
pub(crate) struct SlideDraft {
    pub title: Option<String>,
    pub text_blocks: Vec<TextBlock>,
    /// Image shapes with unresolved relationship ids
    pub image_shapes: Vec<ImageShape>,
    pub layout: LayoutKind,
}

/// Extract the shape-derived content of one slide.
///
/// Individual malformed shapes are skipped with a warning; the only hard
/// failure is slide XML that does not parse at document level, which is
/// reported as [`FormatError::SlideUnparseable`].
pub(crate) fn extract_slide(
    index: usize,
    xml: &[u8],
    extent: SlideExtent,
) -> Result<(SlideDraft, Vec<ExtractionWarning>)> {
    let classified = classify_shapes(xml, extent).map_err(|e| FormatError::SlideUnparseable {
        index,
        detail: e.to_string(),
    })?;

    let mut warnings = Vec::new();
    let mut text_shapes = Vec::new();
    let mut image_shapes = Vec::new();

    for entry in classified {
        match entry {
            Classified::Shape(Shape::Text(shape)) => text_shapes.push(shape),
            Classified::Shape(Shape::Image(shape)) => image_shapes.push(shape),
            Classified::Shape(Shape::Other(_)) => {},
            Classified::Skipped(reason) => {
                tracing::warn!(slide = index, reason = %reason, "skipping malformed shape");
                warnings.push(ExtractionWarning::for_slide(
                    index,
                    WarningKind::ShapeSkipped,
                    reason,
                ));
            },
        }
    }

    // Role presence is judged over all text shapes, including placeholders
    // whose text body is empty; only non-empty bodies become blocks.
    let has_title_role = text_shapes
        .iter()
        .any(|s| s.role == Some(PlaceholderRole::Title));
    let has_body_role = text_shapes
        .iter()
        .any(|s| s.role == Some(PlaceholderRole::Body));

    let mut title = None;
    let mut text_blocks = Vec::new();
    for shape in &text_shapes {
        if shape.text.is_empty() {
            continue;
        }
        let role = match shape.role {
            Some(PlaceholderRole::Title) => TextRole::Title,
            Some(PlaceholderRole::Body) => TextRole::Body,
            _ => TextRole::Other,
        };
        if title.is_none() && role == TextRole::Title {
            title = Some(shape.text.clone());
        }
        // Title assignment never removes content from the block list
        text_blocks.push(TextBlock {
            text: shape.text.clone(),
            role,
            position: shape.position,
            style: shape.style.clone(),
        });
    }
    // No title placeholder anywhere: the first block doubles as a heuristic
    // title and stays in the list.
    if title.is_none() && !has_title_role {
        title = text_blocks.first().map(|block| block.text.clone());
    }

    let layout = classify_layout(
        has_title_role,
        has_body_role,
        !image_shapes.is_empty(),
        !text_blocks.is_empty(),
    );

    Ok((
        SlideDraft {
            title,
            text_blocks,
            image_shapes,
            layout,
        },
        warnings,
    ))
}

/// Classify a slide's layout from the set of detected roles and content.
///
/// The conditions are checked in a fixed precedence order; membership in the
/// role set is all that matters, so traversal order cannot change the result.
fn classify_layout(
    has_title: bool,
    has_body: bool,
    has_image: bool,
    has_text: bool,
) -> LayoutKind {
    if has_title && has_body {
        LayoutKind::TitleContent
    } else if has_title && has_image {
        LayoutKind::TitleImage
    } else if has_title {
        LayoutKind::TitleOnly
    } else if has_image && !has_body {
        LayoutKind::ImageOnly
    } else if has_text {
        LayoutKind::Content
    } else {
        LayoutKind::Unknown
    }
}
