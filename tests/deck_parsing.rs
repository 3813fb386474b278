//! End-to-end deck parsing tests over in-memory container fixtures.

use slidereel::deck::{DeckParser, FormatError, LayoutKind, ParserConfig, TextRole, WarningKind};
use slidereel::timeline::Timeline;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn build_container(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
</Types>"#;

const PRESENTATION: &[u8] = br#"<?xml version="1.0"?>
<p:presentation xmlns:p="p" xmlns:a="a">
  <p:sldSz cx="12192000" cy="6858000"/>
</p:presentation>"#;

fn text_shape(ph_type: Option<&str>, text: &str) -> String {
    let ph = match ph_type {
        Some(t) => format!(r#"<p:nvSpPr><p:nvPr><p:ph type="{t}"/></p:nvPr></p:nvSpPr>"#),
        None => String::new(),
    };
    format!(
        r#"<p:sp>{ph}<p:spPr><a:xfrm><a:off x="1219200" y="685800"/><a:ext cx="9753600" cy="1371600"/></a:xfrm></p:spPr><p:txBody><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#
    )
}

fn image_shape(rid: &str) -> String {
    format!(
        r#"<p:pic><p:blipFill><a:blip r:embed="{rid}"/></p:blipFill><p:spPr><a:xfrm><a:off x="3048000" y="1714500"/><a:ext cx="6096000" cy="3429000"/></a:xfrm></p:spPr></p:pic>"#
    )
}

fn slide_xml(shapes: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0"?><p:sld xmlns:p="p" xmlns:a="a" xmlns:r="r"><p:cSld><p:spTree>{shapes}</p:spTree></p:cSld></p:sld>"#
    )
    .into_bytes()
}

fn image_rels(rid: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="{rid}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/></Relationships>"#
    )
    .into_bytes()
}

/// The canonical 3-slide fixture: slide 1 title+body, slide 2 title+image,
/// slide 3 an image whose relationship id is not in the slide's map.
fn three_slide_deck() -> Vec<u8> {
    let slide1 = slide_xml(&format!(
        "{}{}",
        text_shape(Some("title"), "Welcome"),
        text_shape(Some("body"), "Agenda for today")
    ));
    let slide2 = slide_xml(&format!(
        "{}{}",
        text_shape(Some("title"), "The Chart"),
        image_shape("rId1")
    ));
    let slide3 = slide_xml(&image_shape("rId9"));

    build_container(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("ppt/presentation.xml", PRESENTATION),
        ("ppt/slides/slide1.xml", &slide1),
        ("ppt/slides/slide2.xml", &slide2),
        ("ppt/slides/slide3.xml", &slide3),
        ("ppt/slides/_rels/slide2.xml.rels", &image_rels("rId1")),
        // slide3 has a rels part, but it does not contain rId9
        ("ppt/slides/_rels/slide3.xml.rels", &image_rels("rId1")),
        ("ppt/media/image1.png", b"\x89PNG fake image payload"),
        (
            "docProps/core.xml",
            br#"<?xml version="1.0"?><cp:coreProperties xmlns:cp="cp" xmlns:dc="dc" xmlns:dcterms="dcterms"><dc:title>Kickoff Deck</dc:title><dc:creator>Grace</dc:creator><dcterms:created>2024-01-15T08:00:00Z</dcterms:created><dcterms:modified>2024-01-16T08:00:00Z</dcterms:modified></cp:coreProperties>"#,
        ),
        (
            "ppt/notesSlides/notesSlide1.xml",
            br#"<?xml version="1.0"?><p:notes xmlns:p="p" xmlns:a="a"><p:txBody><a:p><a:r><a:t>Greet everyone warmly.</a:t></a:r></a:p></p:txBody></p:notes>"#,
        ),
    ])
}

#[test]
fn three_slide_scenario() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    let doc = &parsed.document;

    assert_eq!(doc.slides.len(), 3);
    assert_eq!(doc.metadata.slide_count, 3);

    let layouts: Vec<LayoutKind> = doc.slides.iter().map(|s| s.layout).collect();
    assert_eq!(
        layouts,
        vec![
            LayoutKind::TitleContent,
            LayoutKind::TitleImage,
            LayoutKind::ImageOnly
        ]
    );

    // Slide 3's image is omitted: exactly one image overall, one warning
    let image_count: usize = doc.slides.iter().map(|s| s.images.len()).sum();
    assert_eq!(image_count, 1);
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].kind, WarningKind::UnresolvedRelationship);
    assert_eq!(parsed.warnings[0].slide_index, Some(3));
}

#[test]
fn slide_indices_are_contiguous_and_one_based() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    for (position, slide) in parsed.document.slides.iter().enumerate() {
        assert_eq!(slide.index, position + 1);
    }
}

#[test]
fn every_image_ref_had_a_resolvable_relationship() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    let slide2 = &parsed.document.slides[1];
    assert_eq!(slide2.images.len(), 1);
    let image = &slide2.images[0];
    assert_eq!(image.relationship_id, "rId1");
    assert_eq!(image.container_path, "/ppt/media/image1.png");
    assert_eq!(image.mime_extension, "png");
    assert!(!image.bytes.is_empty());
}

#[test]
fn slide_order_follows_numeric_suffix_not_archive_order() {
    // Archive entries deliberately out of order: slide10 before slide2
    let bytes = build_container(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("ppt/presentation.xml", PRESENTATION),
        (
            "ppt/slides/slide10.xml",
            &slide_xml(&text_shape(Some("title"), "Ten")),
        ),
        (
            "ppt/slides/slide2.xml",
            &slide_xml(&text_shape(Some("title"), "Two")),
        ),
        (
            "ppt/slides/slide1.xml",
            &slide_xml(&text_shape(Some("title"), "One")),
        ),
    ]);

    let parsed = DeckParser::new().parse(bytes).unwrap();
    let titles: Vec<&str> = parsed
        .document
        .slides
        .iter()
        .map(|s| s.title.as_deref().unwrap())
        .collect();
    assert_eq!(titles, vec!["One", "Two", "Ten"]);

    let ids: Vec<&str> = parsed.document.slides.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["slide1", "slide2", "slide10"]);
    // Indices stay contiguous even though part suffixes have gaps
    let indices: Vec<usize> = parsed.document.slides.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn notes_attach_to_their_slide_only() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    assert_eq!(
        parsed.document.slides[0].notes.as_deref(),
        Some("Greet everyone warmly.")
    );
    assert_eq!(parsed.document.slides[1].notes, None);
}

#[test]
fn metadata_is_extracted_with_slide_count() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    let metadata = &parsed.document.metadata;
    assert_eq!(metadata.title, "Kickoff Deck");
    assert_eq!(metadata.author, "Grace");
    assert_eq!(metadata.slide_count, 3);
}

#[test]
fn text_roles_and_block_retention() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    let slide1 = &parsed.document.slides[0];
    assert_eq!(slide1.title.as_deref(), Some("Welcome"));
    assert_eq!(slide1.text_blocks.len(), 2);
    assert_eq!(slide1.text_blocks[0].role, TextRole::Title);
    assert_eq!(slide1.text_blocks[0].text, "Welcome");
    assert_eq!(slide1.text_blocks[1].role, TextRole::Body);
}

#[test]
fn image_extraction_can_be_disabled() {
    let parser =
        DeckParser::with_config(ParserConfig::builder().extract_images(false).build());
    let parsed = parser.parse(three_slide_deck()).unwrap();
    let image_count: usize = parsed.document.slides.iter().map(|s| s.images.len()).sum();
    assert_eq!(image_count, 0);
    // With media resolution disabled, the broken relationship never surfaces
    assert!(parsed.warnings.is_empty());
}

#[test]
fn timeline_from_parsed_deck_is_reproducible() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    let a = Timeline::synthesize(&parsed.document, 150);
    let b = Timeline::synthesize(&parsed.document, 150);
    assert_eq!(a, b);
    assert_eq!(a.scenes.len(), 3);
    let sum: u64 = a.scenes.iter().map(|s| s.duration_seconds).sum();
    assert_eq!(a.total_seconds, sum);
    // Narration concatenates title, text blocks, and notes in that order;
    // the title block stays in the block list, so it is heard twice
    assert_eq!(
        a.scenes[0].narration,
        "Welcome Welcome Agenda for today Greet everyone warmly."
    );
}

#[test]
fn estimated_durations_are_set_on_slides() {
    let parsed = DeckParser::new().parse(three_slide_deck()).unwrap();
    for slide in &parsed.document.slides {
        assert!(slide.estimated_duration_seconds >= 1);
    }
}

#[test]
fn missing_presentation_part_is_fatal() {
    let bytes = build_container(&[("[Content_Types].xml", CONTENT_TYPES)]);
    let err = DeckParser::new().parse(bytes).unwrap_err();
    assert!(matches!(err, FormatError::MissingRequiredPart(_)));
}

#[test]
fn non_archive_input_is_fatal() {
    let err = DeckParser::new().parse(b"<html>nope</html>".to_vec()).unwrap_err();
    assert!(matches!(err, FormatError::NotAnArchive));
}

#[test]
fn oversized_input_is_rejected_before_parsing() {
    let parser = DeckParser::with_config(ParserConfig::builder().max_input_bytes(16).build());
    let err = parser.parse(three_slide_deck()).unwrap_err();
    assert!(matches!(err, FormatError::OversizedInput { .. }));
}

#[test]
fn unparseable_slide_aborts_the_parse() {
    let bytes = build_container(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("ppt/presentation.xml", PRESENTATION),
        ("ppt/slides/slide1.xml", b"<p:sld><p:sp><unclosed"),
    ]);
    let err = DeckParser::new().parse(bytes).unwrap_err();
    assert!(matches!(err, FormatError::SlideUnparseable { index: 1, .. }));
}
