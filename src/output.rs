//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each post leads with
//! its positional index and title; the source path is secondary context on an
//! indented `Source:` line, followed by the post's table of contents.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 Hello, World (7 headings, 3 levels)
//!     Source: hello-world.md
//!     Published: 2024-03-01
//!     Author: Robin
//!     Tags: meta, writing
//!     Why Another Blog  #why-another-blog
//!     Getting Started  #getting-started
//!         Prerequisites  #prerequisites
//! 002 no-headings (0 headings)
//!     Source: wayfinders/no-headings.md
//!
//! Tags
//!     meta (1)
//!     writing (1)
//!
//! Config
//!     config.toml
//!
//! Scanned 2 posts, 7 headings
//! ```
//!
//! ## Toc
//!
//! ```text
//! Why Another Blog  #why-another-blog
//! Getting Started  #getting-started
//!     Prerequisites  #prerequisites
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure —
//! no I/O, no side effects.

use crate::scan::{Manifest, Post};
use crate::tree;
use crate::types::Heading;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Toc output
// ============================================================================

/// Format a heading tree as indented `text  #slug` lines.
///
/// Indentation follows tree level, not heading depth: an `h4` directly under
/// an `h2` is indented once.
pub fn format_toc(toc: &[Heading]) -> Vec<String> {
    tree::walk(toc)
        .into_iter()
        .map(|(level, heading)| format!("{}{}  {}", indent(level), heading.text, heading.href()))
        .collect()
}

/// Print a heading tree to stdout.
pub fn print_toc(toc: &[Heading]) {
    for line in format_toc(toc) {
        println!("{}", line);
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan output: every post with its source and table of contents.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            post.title,
            toc_summary(post)
        ));
        lines.push(format!("{}Source: {}", indent(1), post.source_path));
        if let Some(date) = post.pub_date {
            lines.push(format!("{}Published: {}", indent(1), date));
        }
        if let Some(author) = &post.author {
            lines.push(format!("{}Author: {}", indent(1), author));
        }
        if !post.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
        }
        for line in format_toc(&post.toc) {
            lines.push(format!("{}{}", indent(1), line));
        }
    }

    if !manifest.tags.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        for (tag, uses) in &manifest.tags {
            lines.push(format!("{}{} ({})", indent(1), tag, uses));
        }
    }

    // Config section
    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(defaults)", indent(1)));
    }

    let total: usize = manifest.posts.iter().map(|p| p.heading_count).sum();
    lines.push(String::new());
    lines.push(format!(
        "Scanned {}, {}",
        plural(manifest.posts.len(), "post", "posts"),
        plural(total, "heading", "headings")
    ));

    lines
}

/// `7 headings, 3 levels`; just `0 headings` for an empty TOC.
fn toc_summary(post: &Post) -> String {
    let headings = plural(post.heading_count, "heading", "headings");
    match tree::max_depth(&post.toc) {
        0 => headings,
        levels => format!("{headings}, {}", plural(levels, "level", "levels")),
    }
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
