//! Provides the `PartPath` value type for addressing parts inside a deck
//! container.
//!
//! Part paths always begin with a forward slash and use forward slashes as
//! separators, matching the packaging convention of the format family. They
//! expose the components later stages need: the owning directory, the file
//! name, the extension, and the numeric suffix that orders slide parts.

use crate::deck::error::{FormatError, Result};

/// A part name within a deck container (e.g. `/ppt/slides/slide1.xml`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartPath {
    path: String,
}

impl PartPath {
    /// Create a new PartPath. The path must begin with a forward slash.
    pub fn new<S: Into<String>>(path: S) -> Result<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(FormatError::InvalidPartPath(format!(
                "part path must begin with '/', got '{path}'"
            )));
        }
        Ok(PartPath { path })
    }

    /// Resolve a relative reference (like `../media/image1.png`) against a
    /// base directory (like `/ppt/slides`) into an absolute PartPath.
    pub fn resolve(base_dir: &str, relative_ref: &str) -> Result<Self> {
        let joined = if base_dir.ends_with('/') {
            format!("{base_dir}{relative_ref}")
        } else {
            format!("{base_dir}/{relative_ref}")
        };
        Self::new(normalize(&joined))
    }

    /// The directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.path[..pos],
        }
    }

    /// The file name portion, e.g. `slide1.xml`.
    pub fn file_name(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[pos + 1..],
            None => "",
        }
    }

    /// The extension without its leading period, e.g. `xml`.
    pub fn extension(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(pos) => &name[pos + 1..],
            None => "",
        }
    }

    /// The numeric suffix of the file stem, or None for singleton parts.
    ///
    /// Returns 21 for `/ppt/slides/slide21.xml` and None for
    /// `/ppt/presentation.xml`. Slide ordering derives from this value, not
    /// from the order entries appear in the archive directory.
    pub fn index(&self) -> Option<usize> {
        let name = self.file_name();
        let stem = match name.rfind('.') {
            Some(pos) => &name[..pos],
            None => name,
        };
        let digits = stem.len() - stem.chars().rev().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 || digits == stem.len() {
            return None;
        }
        stem[digits..].parse().ok()
    }

    /// The archive member name: the path with its leading slash stripped.
    pub fn zip_name(&self) -> &str {
        &self.path[1..]
    }

    /// The path of the `.rels` sidecar describing this part's relationships,
    /// e.g. `/ppt/slides/_rels/slide1.xml.rels`.
    pub fn rels_path(&self) -> PartPath {
        let dir = self.directory();
        let path = if dir == "/" {
            format!("/_rels/{}.rels", self.file_name())
        } else {
            format!("{}/_rels/{}.rels", dir, self.file_name())
        };
        PartPath { path }
    }

    /// The full path string.
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for PartPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl AsRef<str> for PartPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

/// Resolve `.` and `..` segments, producing an absolute path.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }
    let mut out = String::with_capacity(path.len());
    for part in &parts {
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}
