//! Shape classification for slide XML.
//!
//! Raw slide markup is turned into a closed set of shape variants in a
//! single pass, immediately after XML deserialization. Downstream code
//! matches exhaustively on [`Shape`] instead of probing optional fields.

use crate::deck::error::{FormatError, Result};
use crate::deck::model::{Position, TextStyle};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Declared slide extent in EMUs, used to normalize shape geometry.
#[derive(Debug, Clone, Copy)]
pub struct SlideExtent {
    pub width_emu: i64,
    pub height_emu: i64,
}

impl Default for SlideExtent {
    /// The format family's default 16:9 slide box.
    fn default() -> Self {
        Self {
            width_emu: 12_192_000,
            height_emu: 6_858_000,
        }
    }
}

/// The semantic placeholder role carried by a shape, from its `ph` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderRole {
    /// `title` and `ctrTitle` placeholders
    Title,
    /// `body`, `subTitle`, and untyped placeholders
    Body,
    /// Date, footer, slide-number, and other auxiliary placeholders
    Other,
}

impl PlaceholderRole {
    fn from_ph_type(ph_type: Option<&str>) -> Self {
        match ph_type {
            Some("title") | Some("ctrTitle") => PlaceholderRole::Title,
            // An untyped placeholder is a body placeholder in this format
            Some("body") | Some("subTitle") | None => PlaceholderRole::Body,
            Some(_) => PlaceholderRole::Other,
        }
    }
}

/// A shape holding a text body.
#[derive(Debug, Clone)]
pub struct TextShape {
    /// Placeholder role, if the shape is a placeholder
    pub role: Option<PlaceholderRole>,
    /// Concatenated run text; paragraph breaks are newlines
    pub text: String,
    pub position: Position,
    pub style: TextStyle,
}

/// A shape referencing an embedded image by relationship id.
#[derive(Debug, Clone)]
pub struct ImageShape {
    pub relationship_id: String,
    pub position: Position,
}

/// Any other shape kind (tables, charts, connectors, groups).
#[derive(Debug, Clone)]
pub struct OtherShape {
    /// Local element name, e.g. "graphicFrame"
    pub kind: String,
}

/// A classified slide shape.
#[derive(Debug, Clone)]
pub enum Shape {
    Text(TextShape),
    Image(ImageShape),
    Other(OtherShape),
}

/// Outcome of classifying one captured shape subtree.
pub(crate) enum Classified {
    Shape(Shape),
    /// The shape was malformed; carries the reason for the warning
    Skipped(String),
}

/// Classify all shapes of a slide in document order.
///
/// Returns `Err` only when the XML fails to parse at document level; a
/// malformed individual shape yields a [`Classified::Skipped`] entry.
pub(crate) fn classify_shapes(xml: &[u8], extent: SlideExtent) -> Result<Vec<Classified>> {
    // Text is not trimmed: run content inside `t` elements is significant,
    // including leading and trailing spaces.
    let mut reader = Reader::from_reader(xml);

    let mut shapes = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let local_name = e.local_name();
                let tag = local_name.as_ref();
                match tag {
                    b"sp" | b"pic" | b"graphicFrame" | b"grpSp" | b"cxnSp" => {
                        let kind = String::from_utf8_lossy(tag).to_string();
                        let subtree = capture_subtree(&mut reader, tag)?;
                        shapes.push(classify_one(&kind, &subtree, extent));
                    },
                    _ => {},
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FormatError::Xml(format!("slide parse error: {e}")));
            },
            _ => {},
        }
        buf.clear();
    }

    Ok(shapes)
}

fn classify_one(kind: &str, subtree: &[u8], extent: SlideExtent) -> Classified {
    let result = match kind {
        "sp" => parse_text_shape(subtree, extent),
        "pic" => parse_image_shape(subtree, extent),
        _ => Ok(Shape::Other(OtherShape {
            kind: kind.to_string(),
        })),
    };
    match result {
        Ok(shape) => Classified::Shape(shape),
        Err(reason) => Classified::Skipped(format!("{kind}: {reason}")),
    }
}

/// Re-serialize a shape element's subtree so it can be parsed on its own.
///
/// The opening tag has already been consumed by the caller.
fn capture_subtree(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<Vec<u8>> {
    let mut xml = Vec::new();
    let mut depth = 1usize;

    xml.push(b'<');
    xml.extend_from_slice(tag);
    xml.push(b'>');

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                write_open_tag(&mut xml, &e, false);
            },
            Ok(Event::Empty(e)) => {
                write_open_tag(&mut xml, &e, true);
            },
            Ok(Event::Text(e)) => {
                xml.extend_from_slice(e.as_ref());
            },
            Ok(Event::End(e)) => {
                xml.extend_from_slice(b"</");
                xml.extend_from_slice(e.name().as_ref());
                xml.push(b'>');
                depth -= 1;
                if depth == 0 {
                    return Ok(xml);
                }
            },
            Ok(Event::Eof) => {
                return Err(FormatError::Xml("unexpected end of shape XML".to_string()));
            },
            Err(e) => return Err(FormatError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }
}

fn write_open_tag(xml: &mut Vec<u8>, e: &quick_xml::events::BytesStart<'_>, empty: bool) {
    xml.push(b'<');
    xml.extend_from_slice(e.name().as_ref());
    for attr in e.attributes().flatten() {
        xml.push(b' ');
        xml.extend_from_slice(attr.key.as_ref());
        xml.extend_from_slice(b"=\"");
        xml.extend_from_slice(&attr.value);
        xml.push(b'"');
    }
    if empty {
        xml.extend_from_slice(b"/>");
    } else {
        xml.push(b'>');
    }
}

/// Per-shape parse failures; reported as skip-with-warning, never fatal.
type ShapeResult<T> = std::result::Result<T, String>;

fn parse_text_shape(xml: &[u8], extent: SlideExtent) -> ShapeResult<Shape> {
    let mut reader = Reader::from_reader(xml);

    let mut role = None;
    let mut has_text_body = false;
    let mut text = String::new();
    let mut style: Option<TextStyle> = None;
    let mut geometry = GeometryScan::default();
    let mut in_text_run = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"ph" => {
                    let ph_type = attr_value(e, b"type").map_err(|e| e.to_string())?;
                    role = Some(PlaceholderRole::from_ph_type(ph_type.as_deref()));
                },
                b"txBody" => has_text_body = true,
                // Paragraph breaks become newlines within the same block
                b"p" => {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                },
                b"t" => in_text_run = true,
                b"rPr" if style.is_none() => {
                    let mut run_style = style_from_attrs(e);
                    scan_fill_color(&mut reader, &mut run_style)?;
                    style = Some(run_style);
                },
                b"off" | b"ext" => geometry.observe(e),
                _ => {},
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"ph" => {
                    let ph_type = attr_value(e, b"type").map_err(|e| e.to_string())?;
                    role = Some(PlaceholderRole::from_ph_type(ph_type.as_deref()));
                },
                b"rPr" if style.is_none() => style = Some(style_from_attrs(e)),
                b"off" | b"ext" => geometry.observe(e),
                _ => {},
            },
            Ok(Event::Text(e)) if in_text_run => {
                let run = std::str::from_utf8(e.as_ref()).map_err(|e| e.to_string())?;
                text.push_str(run);
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {},
        }
        buf.clear();
    }

    while text.ends_with('\n') {
        text.pop();
    }

    if !has_text_body {
        return Ok(Shape::Other(OtherShape {
            kind: "sp".to_string(),
        }));
    }

    Ok(Shape::Text(TextShape {
        role,
        text,
        position: geometry.normalized(extent),
        style: style.unwrap_or_default(),
    }))
}

fn parse_image_shape(xml: &[u8], extent: SlideExtent) -> ShapeResult<Shape> {
    let mut reader = Reader::from_reader(xml);

    let mut relationship_id = None;
    let mut geometry = GeometryScan::default();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"blip" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"embed" {
                            let id = std::str::from_utf8(&attr.value).map_err(|e| e.to_string())?;
                            relationship_id = Some(id.to_string());
                        }
                    }
                },
                b"off" | b"ext" => geometry.observe(e),
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {},
        }
        buf.clear();
    }

    match relationship_id {
        Some(relationship_id) => Ok(Shape::Image(ImageShape {
            relationship_id,
            position: geometry.normalized(extent),
        })),
        None => Err("picture shape carries no embed relationship".to_string()),
    }
}

/// Parse run-property attributes: size, bold, italic.
fn style_from_attrs(e: &quick_xml::events::BytesStart<'_>) -> TextStyle {
    let mut style = TextStyle::default();
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"sz" => {
                // Sizes are expressed in hundredths of a point
                style.font_size = std::str::from_utf8(&attr.value)
                    .ok()
                    .and_then(|s| s.parse::<f32>().ok())
                    .map(|hundredths| hundredths / 100.0);
            },
            b"b" => style.bold = attr.value.as_ref() == b"1",
            b"i" => style.italic = attr.value.as_ref() == b"1",
            _ => {},
        }
    }
    style
}

/// Consume the rest of an `rPr` subtree, recording the first solid fill
/// color encountered.
fn scan_fill_color(reader: &mut Reader<&[u8]>, style: &mut TextStyle) -> ShapeResult<()> {
    let mut depth = 1usize;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                if e.local_name().as_ref() == b"srgbClr"
                    && let Some(val) = attr_value(e, b"val").map_err(|e| e.to_string())?
                {
                    style.color.get_or_insert(val);
                }
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"srgbClr"
                    && let Some(val) = attr_value(e, b"val").map_err(|e| e.to_string())?
                {
                    style.color.get_or_insert(val);
                }
            },
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {},
        }
        buf.clear();
    }
    Ok(())
}

fn attr_value(
    e: &quick_xml::events::BytesStart<'_>,
    key: &[u8],
) -> std::result::Result<Option<String>, std::str::Utf8Error> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

/// Accumulates `off`/`ext` geometry while scanning a shape.
#[derive(Debug, Default)]
struct GeometryScan {
    x: Option<i64>,
    y: Option<i64>,
    cx: Option<i64>,
    cy: Option<i64>,
}

impl GeometryScan {
    fn observe(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        for attr in e.attributes().flatten() {
            let parsed = std::str::from_utf8(&attr.value)
                .ok()
                .and_then(|s| s.parse::<i64>().ok());
            match attr.key.as_ref() {
                b"x" => self.x = self.x.or(parsed),
                b"y" => self.y = self.y.or(parsed),
                b"cx" => self.cx = self.cx.or(parsed),
                b"cy" => self.cy = self.cy.or(parsed),
                _ => {},
            }
        }
    }

    /// Normalize against the slide extent; shapes that inherit their
    /// geometry from the layout fall back to the full slide box.
    fn normalized(&self, extent: SlideExtent) -> Position {
        match (self.x, self.y, self.cx, self.cy) {
            (Some(x), Some(y), Some(cx), Some(cy)) => Position {
                x: x as f32 / extent.width_emu as f32,
                y: y as f32 / extent.height_emu as f32,
                w: cx as f32 / extent.width_emu as f32,
                h: cy as f32 / extent.height_emu as f32,
            },
            _ => Position::FULL,
        }
    }
}
