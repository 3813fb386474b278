//! Low-level access to the deck container (a ZIP archive of XML parts).
//!
//! The container is read entirely from an in-memory byte buffer. Entry
//! contents are decompressed on demand; the archive handle is released when
//! the `DeckContainer` is dropped, on every exit path including parse
//! failure.

use crate::deck::config::ParserConfig;
use crate::deck::error::{FormatError, Result};
use crate::deck::partname::PartPath;
use std::cell::RefCell;
use std::io::{Cursor, Read};

/// ZIP local file header signature.
const ZIP_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

/// The content-type descriptor every container must carry.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// The main presentation descriptor every deck container must carry.
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// A deck container opened from a byte buffer.
#[derive(Debug)]
pub struct DeckContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    names: Vec<String>,
}

impl DeckContainer {
    /// Open a container from raw bytes.
    ///
    /// Validates, in order: the caller-supplied size bound, the ZIP
    /// local-file-header signature, archive well-formedness, and the
    /// presence of the two required parts ([`CONTENT_TYPES_PART`] and
    /// [`PRESENTATION_PART`]).
    pub fn open(bytes: Vec<u8>, config: &ParserConfig) -> Result<Self> {
        if bytes.len() as u64 > config.max_input_bytes {
            return Err(FormatError::OversizedInput {
                size: bytes.len() as u64,
                max: config.max_input_bytes,
            });
        }
        if bytes.len() < ZIP_SIGNATURE.len() || &bytes[..ZIP_SIGNATURE.len()] != ZIP_SIGNATURE {
            return Err(FormatError::NotAnArchive);
        }

        let archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let names: Vec<String> = archive.file_names().map(String::from).collect();

        let container = Self {
            archive: RefCell::new(archive),
            names,
        };
        for required in [CONTENT_TYPES_PART, PRESENTATION_PART] {
            if !container.contains(required) {
                return Err(FormatError::MissingRequiredPart(required.to_string()));
            }
        }
        Ok(container)
    }

    /// Check whether the input looks like a deck container without fully
    /// parsing it: ZIP signature plus the main presentation descriptor.
    pub fn sniff(bytes: &[u8]) -> bool {
        if bytes.len() < ZIP_SIGNATURE.len() || &bytes[..ZIP_SIGNATURE.len()] != ZIP_SIGNATURE {
            return false;
        }
        match zip::ZipArchive::new(Cursor::new(bytes)) {
            Ok(archive) => archive.file_names().any(|n| n == PRESENTATION_PART),
            Err(_) => false,
        }
    }

    /// Check if an entry exists, by archive member name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// List entry names starting with the given prefix.
    ///
    /// Archive directory order is preserved; callers that need slide order
    /// must sort by the part path's numeric index.
    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.names
            .iter()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Read an entry's bytes by archive member name.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(name)
            .map_err(|_| FormatError::EntryNotFound(name.to_string()))?;
        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Read an entry's bytes by part path.
    pub fn read_part(&self, part: &PartPath) -> Result<Vec<u8>> {
        self.read(part.zip_name())
    }

    /// Number of entries in the container.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the container has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
