//! Shared types used across the scan and output stages.
//!
//! [`Heading`] is both the flat record produced by [`crate::extract`] and the
//! tree node produced by [`crate::tree::build_tree`]. It is serialized into the
//! scan manifest and into `--json` output, so the field names are part of the
//! on-disk format.

use serde::{Deserialize, Serialize};

/// One heading of a document.
///
/// As a flat record (straight out of extraction) `children` is empty. After
/// [`crate::tree::build_tree`] it holds every heading nested under this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Nesting level; larger is deeper. Only compared, never validated.
    pub depth: i32,
    /// Display label.
    pub text: String,
    /// Fragment identifier, rendered as `#<slug>` in links.
    pub slug: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Heading>,
}

impl Heading {
    pub fn new(depth: i32, text: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            depth,
            text: text.into(),
            slug: slug.into(),
            children: Vec::new(),
        }
    }

    /// This heading with its children dropped.
    pub fn into_leaf(self) -> Self {
        Self {
            children: Vec::new(),
            ..self
        }
    }

    /// Link target for this heading, e.g. `#getting-started`.
    pub fn href(&self) -> String {
        format!("#{}", self.slug)
    }
}
