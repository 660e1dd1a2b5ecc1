//! Heading tree construction.
//!
//! Markdown gives us headings as a flat, ordered list tagged with a depth.
//! The table of contents needs them nested: every heading owns the run of
//! headings that directly follow it and are deeper than it.
//!
//! ```text
//! h2 Introduction            Introduction
//! h2 Getting Started         Getting Started
//! h3 Prerequisites    →          Prerequisites
//! h4 macOS                           macOS
//! h2 Conclusion              Conclusion
//! ```
//!
//! ## Rules
//!
//! - A heading's children are the maximal run of following headings deeper
//!   than it. The run ends at the first heading of equal or shallower depth.
//! - Skipped levels nest directly (`h2` then `h4` makes the `h4` a child of
//!   the `h2`); no placeholder nodes are invented.
//! - The first heading is always a root, whatever its depth.
//! - A pre-order walk of the result yields the input exactly, in order.
//!
//! Depth is only ever compared, so zero or negative depths work like any
//! other value.
//!
//! ## Implementation
//!
//! A stack holds the chain of headings that are still "open" (could still
//! receive children). Each incoming heading first closes every open heading
//! at the same or a deeper level, attaching each closed heading to the one
//! below it on the stack (or to the root list), then opens itself. Nesting
//! depth never touches the call stack.

use crate::types::Heading;

/// Nest a flat, document-ordered heading list into a forest.
///
/// Returns the root headings with `children` filled in. Nodes are rebuilt
/// from the input records; any `children` the input already carried are
/// discarded. An empty input (including an absent one, e.g. `None`) yields
/// an empty forest.
pub fn build_tree<I>(headings: I) -> Vec<Heading>
where
    I: IntoIterator<Item = Heading>,
{
    let mut roots = Vec::new();
    let mut open: Vec<Heading> = Vec::new();

    for heading in headings {
        close_while(&mut open, &mut roots, |top| top.depth >= heading.depth);
        open.push(heading.into_leaf());
    }
    close_while(&mut open, &mut roots, |_| true);

    roots
}

/// Pop open headings while `should_close` holds for the top of the stack,
/// attaching each to its parent (the next entry down) or to `roots`.
fn close_while(
    open: &mut Vec<Heading>,
    roots: &mut Vec<Heading>,
    should_close: impl Fn(&Heading) -> bool,
) {
    while open.last().is_some_and(&should_close) {
        let Some(closed) = open.pop() else { break };
        match open.last_mut() {
            Some(parent) => parent.children.push(closed),
            None => roots.push(closed),
        }
    }
}

/// Pre-order traversal of a forest, pairing each heading with its tree
/// level (0 for roots).
///
/// The headings come back in the order they appeared in the document.
pub fn walk(roots: &[Heading]) -> Vec<(usize, &Heading)> {
    let mut out = Vec::new();
    walk_into(roots, 0, &mut out);
    out
}

fn walk_into<'a>(nodes: &'a [Heading], level: usize, out: &mut Vec<(usize, &'a Heading)>) {
    for node in nodes {
        out.push((level, node));
        walk_into(&node.children, level + 1, out);
    }
}

/// Total number of headings in a forest.
pub fn count(roots: &[Heading]) -> usize {
    roots.iter().map(|h| 1 + count(&h.children)).sum()
}

/// Number of tree levels: 0 for an empty forest, 1 when nothing is nested.
pub fn max_depth(roots: &[Heading]) -> usize {
    roots
        .iter()
        .map(|h| 1 + max_depth(&h.children))
        .max()
        .unwrap_or(0)
}
