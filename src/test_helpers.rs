//! Shared test utilities for the simple-toc test suite.
//!
//! Provides a terse heading constructor, tree walkers, and shape assertions
//! that work with the flat and nested forms of [`Heading`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tree = build_tree(vec![h(2, "Parent"), h(3, "Child"), h(2, "Next")]);
//!
//! assert_eq!(collect_texts(&tree), ["Parent", "Child", "Next"]);
//! assert_tree_shape(&tree, &[
//!     ("Parent", &["Child"]),
//!     ("Next", &[]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::{Manifest, Post};
use crate::tree::walk;
use crate::types::Heading;

// =========================================================================
// Construction
// =========================================================================

/// A heading with a slug derived from its text (`"Getting Started"` →
/// `"getting-started"`).
pub fn h(depth: i32, text: &str) -> Heading {
    let slug = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    Heading::new(depth, text, slug)
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Tree walkers
// =========================================================================

/// Heading texts in pre-order.
pub fn collect_texts(headings: &[Heading]) -> Vec<String> {
    walk(headings)
        .into_iter()
        .map(|(_, h)| h.text.clone())
        .collect()
}

/// Texts of a heading list, one level only.
pub fn texts(headings: &[Heading]) -> Vec<&str> {
    headings.iter().map(|h| h.text.as_str()).collect()
}

// =========================================================================
// Manifest lookups — panics with a clear message on miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.posts.iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

// =========================================================================
// Shape assertions
// =========================================================================

/// Assert the roots and their direct children of a forest.
///
/// Each entry is `(text, children)`. Use `&[]` for leaf roots. Deeper levels
/// are not checked; index into `children` for those.
///
/// ```rust
/// assert_tree_shape(&tree, &[
///     ("Introduction", &[]),
///     ("Getting Started", &["Prerequisites", "Installation"]),
/// ]);
/// ```
pub fn assert_tree_shape(tree: &[Heading], expected: &[(&str, &[&str])]) {
    let expected_roots: Vec<&str> = expected.iter().map(|(t, _)| *t).collect();
    assert_eq!(texts(tree), expected_roots, "root texts mismatch");

    for (root, (title, children)) in tree.iter().zip(expected) {
        assert_eq!(
            texts(&root.children),
            children.to_vec(),
            "children of '{title}' mismatch"
        );
    }
}
