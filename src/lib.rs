//! # Simple TOC
//!
//! Table-of-contents builder for markdown blog posts. Headings come out of a
//! markdown document as a flat list, each tagged with a level; the table of
//! contents needs them nested. This crate does that conversion and the bits
//! around it: finding the headings, giving each a link slug, and scanning a
//! whole content directory into a JSON manifest a site template can render.
//!
//! # Pipeline
//!
//! ```text
//! markdown  →  extract  →  [h2 A, h3 B, h2 C]  →  tree  →  A { B }, C
//! ```
//!
//! 1. [`extract`] parses markdown with `pulldown-cmark` and returns the flat,
//!    document-ordered [`types::Heading`] list with unique slugs.
//! 2. [`tree::build_tree`] nests that list: each heading owns the run of
//!    following headings that are deeper than it.
//! 3. [`scan`] does both for every post under a content directory and
//!    collects the results into a [`scan::Manifest`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Heading`, the record shared by every stage |
//! | [`tree`] | Flat heading list → nested forest; pre-order helpers |
//! | [`extract`] | Markdown → flat heading list, slug generation, front matter, post titles |
//! | [`format`] | Inline markup (`**`, `*`, `~~`, `` ` ``) in titles → escaped HTML |
//! | [`scan`] | Content directory → manifest with tag index, parallel per post |
//! | [`config`] | `config.toml` loading, merging with defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fresh Nodes, Not Shared Records
//!
//! [`tree::build_tree`] consumes its input and builds new nodes. Nothing
//! downstream can observe a half-nested record, and callers who want to keep
//! the flat list clone it first.
//!
//! ## An Explicit Stack
//!
//! Tree building keeps the chain of still-open headings in a `Vec` rather
//! than recursing per level, so document shape never affects stack usage.
//!
//! ## Depth Is Just an Ordering
//!
//! Levels are compared, never validated. The first heading is a root even if
//! it is an `h4`, and skipped levels nest directly without placeholder nodes.

pub mod config;
pub mod extract;
pub mod format;
pub mod output;
pub mod scan;
pub mod tree;
pub mod types;

pub use tree::build_tree;
pub use types::Heading;

#[cfg(test)]
pub(crate) mod test_helpers;
