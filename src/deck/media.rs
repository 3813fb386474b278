//! Media asset extraction: resolving image relationship ids to payloads.

use crate::deck::config::ParserConfig;
use crate::deck::container::DeckContainer;
use crate::deck::error::{ExtractionWarning, WarningKind};
use crate::deck::model::ImageRef;
use crate::deck::rels::Relationships;
use crate::deck::shape::ImageShape;

/// Resolve a slide's image shapes against its relationship table.
///
/// An image whose relationship id is absent from the table, or whose target
/// entry the container lacks, is skipped and counted as a warning; it never
/// becomes an `ImageRef` with empty bytes.
pub(crate) fn extract_images(
    slide_index: usize,
    shapes: &[ImageShape],
    rels: &Relationships,
    container: &DeckContainer,
    config: &ParserConfig,
) -> (Vec<ImageRef>, Vec<ExtractionWarning>) {
    let mut images = Vec::new();
    let mut warnings = Vec::new();

    for (ordinal, shape) in shapes.iter().enumerate() {
        let Some(target) = rels.target_path(&shape.relationship_id) else {
            tracing::warn!(
                slide = slide_index,
                rel_id = %shape.relationship_id,
                "image relationship not found in slide relationship map"
            );
            warnings.push(ExtractionWarning::for_slide(
                slide_index,
                WarningKind::UnresolvedRelationship,
                format!("relationship '{}' is not in the slide's map", shape.relationship_id),
            ));
            continue;
        };

        let bytes = match container.read_part(&target) {
            Ok(bytes) => bytes,
            Err(_) => {
                tracing::warn!(
                    slide = slide_index,
                    target = %target,
                    "image target entry missing from container"
                );
                warnings.push(ExtractionWarning::for_slide(
                    slide_index,
                    WarningKind::MissingMediaEntry,
                    format!("target entry '{target}' does not exist"),
                ));
                continue;
            },
        };

        let bytes = if config.compress_images {
            postprocess(&bytes, config)
        } else {
            bytes
        };

        images.push(ImageRef {
            id: format!("slide{slide_index}-image{}", ordinal + 1),
            relationship_id: shape.relationship_id.clone(),
            container_path: target.as_str().to_string(),
            mime_extension: target.extension().to_ascii_lowercase(),
            bytes,
            position: shape.position,
        });
    }

    (images, warnings)
}

/// Downscale and re-encode an image payload.
///
/// Pure over bytes: the input buffer is never mutated, the output never has
/// a larger dimension than the input, and nothing happens below the
/// configured maximum dimension. Payloads the decoder cannot handle pass
/// through unchanged.
#[cfg(feature = "imgconv")]
fn postprocess(bytes: &[u8], config: &ParserConfig) -> Vec<u8> {
    use image::ImageReader;
    use std::io::Cursor;

    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.decode().ok());
    let Some(img) = decoded else {
        return bytes.to_vec();
    };

    let max_dim = img.width().max(img.height());
    if max_dim <= config.max_image_dimension {
        return bytes.to_vec();
    }

    let scaled = img.resize(
        config.max_image_dimension,
        config.max_image_dimension,
        image::imageops::FilterType::Lanczos3,
    );
    let mut out = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, config.quality);
    match scaled.to_rgb8().write_with_encoder(encoder) {
        Ok(()) => out.into_inner(),
        Err(_) => bytes.to_vec(),
    }
}

#[cfg(not(feature = "imgconv"))]
fn postprocess(bytes: &[u8], _config: &ParserConfig) -> Vec<u8> {
    bytes.to_vec()
}
