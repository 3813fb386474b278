//! Relationship resolution for deck container parts.
//!
//! Every part may carry a sidecar descriptor at `_rels/<name>.rels` mapping
//! short relationship IDs (`rId1`, `rId2`, ...) to target parts. Targets are
//! usually relative to the owning part's directory and may traverse upward
//! with `../` (slide parts reference `../media/image1.png`).

use crate::deck::container::DeckContainer;
use crate::deck::error::Result;
use crate::deck::partname::PartPath;
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::HashMap;

const TARGET_MODE_EXTERNAL: &str = "External";

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub reltype: String,
    /// Target reference as written in the descriptor
    pub target_ref: String,
    /// Whether the target is external to the container (a URL)
    pub external: bool,
}

/// The resolved relationship table of one part.
///
/// A part without a sidecar descriptor has an empty table; that is a valid
/// state (a slide with no external references), not an error.
#[derive(Debug, Default)]
pub struct Relationships {
    base_dir: String,
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Load and parse the relationship table for a part.
    ///
    /// Returns an empty table when the sidecar descriptor does not exist.
    pub fn for_part(container: &DeckContainer, part: &PartPath) -> Result<Self> {
        let rels_path = part.rels_path();
        if !container.contains(rels_path.zip_name()) {
            return Ok(Self {
                base_dir: part.directory().to_string(),
                rels: HashMap::new(),
            });
        }
        let xml = container.read_part(&rels_path)?;
        Self::parse(&xml, part.directory())
    }

    /// Parse a relationship descriptor against the owning part's directory.
    pub fn parse(xml: &[u8], base_dir: &str) -> Result<Self> {
        let parsed = parse_rels_xml(xml)?;
        let mut rels = HashMap::with_capacity(parsed.len());
        for rel in parsed {
            rels.insert(rel.id.clone(), rel);
        }
        Ok(Self {
            base_dir: base_dir.to_string(),
            rels,
        })
    }

    /// Look up a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.get(id)
    }

    /// Resolve a relationship ID to an absolute container part path.
    ///
    /// Returns None for unknown IDs and for external targets, which have no
    /// container path.
    pub fn target_path(&self, id: &str) -> Option<PartPath> {
        let rel = self.rels.get(id)?;
        if rel.external {
            return None;
        }
        PartPath::resolve(&self.base_dir, &rel.target_ref).ok()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }
}

/// Parse the `<Relationship>` elements of a `.rels` descriptor.
fn parse_rels_xml(xml: &[u8]) -> Result<SmallVec<[Relationship; 8]>> {
    let mut rels = SmallVec::new();
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => id = Some(attr.unescape_value()?.to_string()),
                            b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                            b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                            b"TargetMode" => {
                                external = attr.unescape_value()? == TARGET_MODE_EXTERNAL;
                            },
                            _ => {},
                        }
                    }

                    if let (Some(id), Some(reltype), Some(target_ref)) = (id, reltype, target_ref) {
                        rels.push(Relationship {
                            id,
                            reltype,
                            target_ref,
                            external,
                        });
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
        buf.clear();
    }

    Ok(rels)
}
