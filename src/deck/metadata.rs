//! Document metadata and speaker-notes extraction.
//!
//! Core properties live in the `docProps/core.xml` part and follow the
//! Dublin Core metadata standard. Speaker notes live in one part per slide,
//! addressed by the slide index convention
//! (`ppt/notesSlides/notesSlide<N>.xml`).

use crate::deck::container::DeckContainer;
use crate::deck::error::Result;
use crate::deck::model::Metadata;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::BufRead;

const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Extract document-level properties.
///
/// Every missing field gets an explicit sentinel (empty string for text,
/// the extraction time for timestamps); later stages never deal with absent
/// metadata. `slide_count` is filled in by the parser once slides are known.
pub(crate) fn extract_metadata(container: &DeckContainer) -> Metadata {
    let now = Utc::now();
    let mut metadata = Metadata {
        title: String::new(),
        author: String::new(),
        subject: String::new(),
        created_at: now,
        modified_at: now,
        slide_count: 0,
    };

    let Ok(xml) = container.read(CORE_PROPERTIES_PART) else {
        return metadata;
    };

    let mut reader = Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"dc:title" | b"cp:title" => {
                    if let Some(text) = read_text_element(&mut reader) {
                        metadata.title = text;
                    }
                },
                b"dc:creator" | b"cp:creator" | b"dc:author" | b"cp:author" => {
                    if let Some(text) = read_text_element(&mut reader) {
                        metadata.author = text;
                    }
                },
                b"dc:subject" | b"cp:subject" => {
                    if let Some(text) = read_text_element(&mut reader) {
                        metadata.subject = text;
                    }
                },
                b"dcterms:created" | b"cp:created" => {
                    if let Some(dt) = read_text_element(&mut reader).and_then(|t| parse_datetime(&t)) {
                        metadata.created_at = dt;
                    }
                },
                b"dcterms:modified" | b"cp:modified" => {
                    if let Some(dt) = read_text_element(&mut reader).and_then(|t| parse_datetime(&t)) {
                        metadata.modified_at = dt;
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            // A corrupt properties part falls back to sentinel values
            Err(_) => break,
            _ => {},
        }
        buf.clear();
    }

    metadata
}

/// Extract speaker notes for a slide by index convention.
///
/// Returns `None` when the notes part does not exist, so callers can
/// distinguish "no notes part" from "notes part present but empty"
/// (`Some("")`).
pub(crate) fn extract_notes(index: usize, container: &DeckContainer) -> Result<Option<String>> {
    let part = format!("ppt/notesSlides/notesSlide{index}.xml");
    if !container.contains(&part) {
        return Ok(None);
    }
    let xml = container.read(&part)?;
    Ok(Some(notes_text(&xml)))
}

/// Gather DrawingML text runs from a notes part, paragraph-separated.
fn notes_text(xml: &[u8]) -> String {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_element = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                }
            },
            Ok(Event::Text(e)) if in_text_element => {
                if let Ok(t) = std::str::from_utf8(e.as_ref()) {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(t);
                }
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
        buf.clear();
    }

    text
}

fn read_text_element<B: BufRead>(reader: &mut Reader<B>) -> Option<String> {
    let mut text = String::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                if let Ok(t) = std::str::from_utf8(e.as_ref()) {
                    text.push_str(t);
                }
            },
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
        buf.clear();
    }
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Parse the ISO 8601 datetime flavors this format family emits.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, format) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }
    None
}
