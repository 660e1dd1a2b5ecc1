//! Inline formatting for titles and heading labels.
//!
//! Post titles and TOC labels are short, single-purpose strings: they may
//! carry a little emphasis (`**bold**`, `*italic*`, `~~struck~~`, `` `code` ``)
//! but never block markup. Running them through a full markdown parser would
//! wrap them in `<p>` and accept links and raw HTML; [`format_text`] handles
//! only the inline subset and escapes everything else.
//!
//! ## Rules
//!
//! The input is HTML-escaped first, then these passes run in order. Each
//! pass scans left to right, takes the shortest match at each position, and
//! never overlaps its own matches.
//!
//! | Markup       | Output              | Body                                   |
//! |--------------|---------------------|----------------------------------------|
//! | `**x**`      | `<strong>x</strong>`| non-empty, no line break               |
//! | `__x__`      | `<strong>x</strong>`| non-empty, no line break               |
//! | `*x*`        | `<em>x</em>`        | no `*`; delimiters not next to a `*`   |
//! | `_x_`        | `<em>x</em>`        | no `_`; delimiters not next to a `_`   |
//! | `~~x~~`      | `<del>x</del>`      | non-empty, no line break               |
//! | `` `x` ``    | `<code>x</code>`    | no backtick                            |
//!
//! Later passes see the output of earlier ones, so a `*` left over from a
//! `***` run can still pair up in the emphasis pass.

use regex::{Captures, Regex};
use std::sync::LazyLock;

// Bodies of the double-delimiter rules stop at any line terminator, not just
// `\n`.
static STRONG_STARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^\n\r\x{2028}\x{2029}]+?)\*\*")
        .expect("BUG: invalid STRONG_STARS regex")
});

static STRONG_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"__([^\n\r\x{2028}\x{2029}]+?)__")
        .expect("BUG: invalid STRONG_UNDERSCORES regex")
});

static EM_STARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^*]+?)\*")
        .expect("BUG: invalid EM_STARS regex")
});

static EM_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_([^_]+?)_")
        .expect("BUG: invalid EM_UNDERSCORES regex")
});

static DEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"~~([^\n\r\x{2028}\x{2029}]+?)~~")
        .expect("BUG: invalid DEL regex")
});

static CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`([^`]+?)`").expect("BUG: invalid CODE regex")
});

/// Escape a title and render its inline markup as HTML.
pub fn format_text(title: &str) -> String {
    let text = escape_html(title);
    let text = wrap(&STRONG_STARS, &text, "strong");
    let text = wrap(&STRONG_UNDERSCORES, &text, "strong");
    let text = wrap_isolated(&EM_STARS, &text, "em", '*');
    let text = wrap_isolated(&EM_UNDERSCORES, &text, "em", '_');
    let text = wrap(&DEL, &text, "del");
    wrap(&CODE, &text, "code")
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap the first capture group of every match in `<tag>`.
fn wrap(pattern: &Regex, text: &str, tag: &str) -> String {
    pattern
        .replace_all(text, |caps: &Captures| format!("<{tag}>{}</{tag}>", &caps[1]))
        .into_owned()
}

/// Like [`wrap`], but a match only counts when the character before it and
/// the character after it are not `delimiter`.
///
/// A rejected candidate is retried one character later, so its closing
/// delimiter can still open the next match.
fn wrap_isolated(pattern: &Regex, text: &str, tag: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = pattern.captures_at(text, pos) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let touches = text[..whole.start()].ends_with(delimiter)
            || text[whole.end()..].starts_with(delimiter);
        if touches {
            pos = whole.start() + delimiter.len_utf8();
            continue;
        }
        out.push_str(&text[copied..whole.start()]);
        out.push_str(&format!("<{tag}>{}</{tag}>", body.as_str()));
        copied = whole.end();
        pos = whole.end();
    }

    out.push_str(&text[copied..]);
    out
}
