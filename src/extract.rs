//! Heading extraction from markdown.
//!
//! Turns a markdown document into the flat, document-ordered heading list that
//! [`crate::tree::build_tree`] consumes. Each heading gets a slug that matches
//! the fragment id the rendered page uses, so `#<slug>` links land on it.
//!
//! ## Slugs
//!
//! - An explicit id wins: `## Setup {#install}` → `install`.
//! - Otherwise the text is slugified the way GitHub does it: lowercased,
//!   everything but letters, numbers, `_`, `-` and spaces removed, then each
//!   space turned into `-` (`What's New?` → `whats-new`, `C++ & Rust` →
//!   `c--rust`). Non-ASCII letters are kept as they are.
//! - Repeats get a numeric suffix in document order: `notes`, `notes-1`,
//!   `notes-2`. Explicit ids take part in this, so a generated slug never
//!   collides with one.
//!
//! ## Depth Filtering
//!
//! Headings outside `min_depth..=max_depth` are left out of the result but
//! still claim their slug, so the ids of the kept headings are the same as
//! on the full page.
//!
//! ## Front Matter
//!
//! YAML front matter (`---` … `---` at the top of the file) is recognized as
//! a metadata block. Without that, a `title: …` line followed by `---` would
//! parse as a setext heading. [`front_matter`] deserializes the block into
//! [`FrontMatter`]; a block that is not valid YAML is an error, not an empty
//! result.

use crate::config::SiteConfig;
use crate::types::Heading;
use chrono::{DateTime, NaiveDate};
use pulldown_cmark::{Event, HeadingLevel, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Used when a heading's text has nothing slug-worthy in it (e.g. `## ???`).
const FALLBACK_SLUG: &str = "heading";

/// Which headings to keep and how to parse them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub min_depth: i32,
    pub max_depth: i32,
    pub heading_attributes: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

impl From<&SiteConfig> for ExtractOptions {
    fn from(config: &SiteConfig) -> Self {
        Self {
            min_depth: config.toc.min_depth,
            max_depth: config.toc.max_depth,
            heading_attributes: config.markdown.heading_attributes,
        }
    }
}

impl ExtractOptions {
    /// Keep every heading level.
    pub fn all_levels() -> Self {
        Self {
            min_depth: 1,
            max_depth: crate::config::MAX_HEADING_LEVEL,
            ..Self::default()
        }
    }

    fn keeps(&self, depth: i32) -> bool {
        (self.min_depth..=self.max_depth).contains(&depth)
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        if self.heading_attributes {
            options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        options
    }
}

/// Anything that is not a letter, combining mark, number, connector
/// (`_`), `-` or space.
static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{M}\p{N}\p{Pc} -]")
        .expect("BUG: invalid NON_SLUG_CHARS regex")
});

/// GitHub-style slug of `text`, without de-duplication.
///
/// Dashes are not collapsed, so `a -- b` becomes `a----b`, matching the ids
/// GitHub and github-slugger put on rendered headings.
pub fn github_slug(text: &str) -> String {
    NON_SLUG_CHARS
        .replace_all(&text.to_lowercase(), "")
        .replace(' ', "-")
}

/// Generates unique slugs within one document.
#[derive(Debug, Default)]
pub struct Slugger {
    /// Every slug handed out so far, mapped to the last suffix used for it.
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `text` and make it unique among the slugs seen so far.
    pub fn slug(&mut self, text: &str) -> String {
        let base = github_slug(text);
        if base.is_empty() {
            self.claim(FALLBACK_SLUG)
        } else {
            self.claim(&base)
        }
    }

    /// Record an explicit id so later generated slugs steer around it.
    pub fn reserve(&mut self, id: &str) {
        self.occurrences.entry(id.to_string()).or_insert(0);
    }

    fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        while self.occurrences.contains_key(&candidate) {
            let n = self.occurrences.entry(base.to_string()).or_insert(0);
            *n += 1;
            candidate = format!("{base}-{n}");
        }
        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }
}

/// A heading whose text is still being collected.
struct OpenHeading {
    depth: i32,
    id: Option<String>,
    text: String,
}

/// Extract headings from markdown, in document order, without nesting.
pub fn extract_headings(markdown: &str, options: &ExtractOptions) -> Vec<Heading> {
    let mut slugger = Slugger::new();
    let mut headings = Vec::new();
    let mut open: Option<OpenHeading> = None;

    for event in Parser::new_ext(markdown, options.parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                open = Some(OpenHeading {
                    depth: level as i32,
                    id: id.map(|id| id.to_string()),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                let Some(heading) = open.take() else { continue };
                let text = heading.text.trim().to_string();
                let slug = match heading.id {
                    Some(id) => {
                        slugger.reserve(&id);
                        id
                    }
                    None => slugger.slug(&text),
                };
                if options.keeps(heading.depth) {
                    headings.push(Heading::new(heading.depth, text, slug));
                } else {
                    log::trace!("skipping h{} '{}' outside toc range", heading.depth, text);
                }
            }
            Event::Text(s) | Event::Code(s) => {
                if let Some(heading) = open.as_mut() {
                    heading.text.push_str(&s);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(heading) = open.as_mut() {
                    heading.text.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}

/// Post metadata from the YAML front matter block.
///
/// Keys are camelCase (`shortDescription`, `pubDate`); `date` is accepted as
/// an alias of `pubDate`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    #[serde(default, alias = "date", deserialize_with = "deserialize_pub_date")]
    pub pub_date: Option<NaiveDate>,
    pub author: Option<String>,
    #[serde(default)]
    pub editors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Accepts `2024-03-01` or a full RFC 3339 timestamp, keeping the date.
fn deserialize_pub_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| D::Error::custom(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

/// Deserialize the document's YAML front matter.
///
/// A document without front matter (or with an empty block) yields
/// [`FrontMatter::default`].
pub fn front_matter(markdown: &str) -> Result<FrontMatter, serde_yaml::Error> {
    let mut block: Option<String> = None;

    for event in Parser::new_ext(markdown, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS) {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                block = Some(String::new());
            }
            Event::Text(text) => {
                if let Some(block) = block.as_mut() {
                    block.push_str(&text);
                }
            }
            Event::End(TagEnd::MetadataBlock(_)) => break,
            // Front matter can only open the document.
            _ if block.is_none() => break,
            _ => {}
        }
    }

    match block {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(&yaml),
        _ => Ok(FrontMatter::default()),
    }
}

/// Document title: the front matter `title` if set, else the text of the
/// first `#` heading.
pub fn extract_title(markdown: &str, front: &FrontMatter) -> Option<String> {
    if let Some(title) = front.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Some(title.to_string());
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut h1: Option<String> = None;
    let mut in_metadata = false;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => in_metadata = true,
            Event::End(TagEnd::MetadataBlock(_)) => in_metadata = false,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => h1 = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = h1.take().map(|t| t.trim().to_string());
                if title.as_deref().is_some_and(|t| !t.is_empty()) {
                    return title;
                }
            }
            Event::Text(text) | Event::Code(text) if !in_metadata => {
                if let Some(title) = h1.as_mut() {
                    title.push_str(&text);
                }
            }
            _ => {}
        }
    }

    None
}
