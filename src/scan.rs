//! Content scanning and manifest generation.
//!
//! Stage 1 of the pipeline. Walks a content directory for markdown posts,
//! extracts each post's headings, nests them into a table of contents, and
//! returns a [`Manifest`] that the output stage (or any template) consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── hello-world.md               # Post
//! ├── wayfinders/                  # Subdirectories are scanned too
//! │   └── first-steps.md
//! └── .drafts/                     # Hidden = skipped
//!     └── unfinished.md
//! ```
//!
//! ## Output
//!
//! Produces a [`Manifest`] containing:
//! - Every post, ordered by path relative to the content root, with its
//!   front matter metadata and nested table of contents
//! - Every tag used by any post, with the number of posts using it
//! - Site configuration
//!
//! Posts are read and parsed in parallel on the global rayon pool; the
//! result order does not depend on scheduling.

use crate::config::{self, SiteConfig};
use crate::extract::{self, ExtractOptions};
use crate::format;
use crate::tree;
use crate::types::Heading;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Front matter error in {path}: {source}")]
    FrontMatter {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Manifest output from the scan stage
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub posts: Vec<Post>,
    /// Tag → number of times it appears across all posts, sorted by tag
    pub tags: BTreeMap<String, usize>,
    pub config: SiteConfig,
}

/// One markdown post and its table of contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Front matter `title:`, else the first `#` heading, else the file stem
    pub title: String,
    /// `title` with its inline markup rendered to HTML
    pub title_html: String,
    /// URL slug from the file stem
    pub slug: String,
    /// Path relative to the content root, `/`-separated
    pub source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub editors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Number of headings kept in the TOC
    pub heading_count: usize,
    /// Nested table of contents
    pub toc: Vec<Heading>,
}

/// Scan `root` using the `config.toml` found there (or the defaults).
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

/// Scan `root` with an already-loaded config.
pub fn scan_with_config(root: &Path, config: SiteConfig) -> Result<Manifest, ScanError> {
    ensure_dir(root)?;
    let options = ExtractOptions::from(&config);

    let files = collect_markdown_files(root)?;
    log::info!(
        "scanning {} markdown files in {}",
        files.len(),
        root.display()
    );

    let posts = files
        .par_iter()
        .map(|path| load_post(root, path, &options))
        .collect::<Result<Vec<_>, _>>()?;
    let tags = count_tags(&posts);

    Ok(Manifest {
        posts,
        tags,
        config,
    })
}

fn ensure_dir(root: &Path) -> Result<(), ScanError> {
    if root.is_dir() {
        return Ok(());
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("content directory not found: {}", root.display()),
    )
    .into())
}

/// Read one markdown file and build its post entry.
///
/// `root` only determines `source_path`; a file outside it keeps its full
/// path.
pub fn load_post(root: &Path, path: &Path, options: &ExtractOptions) -> Result<Post, ScanError> {
    let content = fs::read_to_string(path)?;
    let source_path = relative_path(root, path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let front = extract::front_matter(&content).map_err(|source| ScanError::FrontMatter {
        path: source_path.clone(),
        source,
    })?;

    let toc = tree::build_tree(extract::extract_headings(&content, options));
    let heading_count = tree::count(&toc);
    log::debug!(
        "{source_path}: {heading_count} headings, {} top-level",
        toc.len()
    );

    let title = extract::extract_title(&content, &front).unwrap_or_else(|| stem.clone());
    Ok(Post {
        title_html: format::format_text(&title),
        title,
        slug: slug::slugify(&stem),
        source_path,
        description: front.description,
        short_description: front.short_description,
        pub_date: front.pub_date,
        author: front.author,
        editors: front.editors,
        tags: front.tags,
        heading_count,
        toc,
    })
}

/// How many times each tag is used across `posts`.
fn count_tags(posts: &[Post]) -> BTreeMap<String, usize> {
    let mut tags = BTreeMap::new();
    for tag in posts.iter().flat_map(|p| &p.tags) {
        *tags.entry(tag.clone()).or_insert(0) += 1;
    }
    tags
}

/// Every `.md` file under `root`, skipping hidden files and directories.
fn collect_markdown_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

fn relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn scan_finds_all_posts() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let paths: Vec<&str> = manifest
            .posts
            .iter()
            .map(|p| p.source_path.as_str())
            .collect();
        assert_eq!(
            paths,
            [
                "hello-world.md",
                "wayfinders/first-steps.md",
                "wayfinders/no-headings.md"
            ]
        );
    }

    #[test]
    fn hidden_directories_skipped() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.posts.iter().all(|p| !p.source_path.contains(".drafts")));
    }

    #[test]
    fn title_from_front_matter() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(find_post(&manifest, "hello-world").title, "Hello, World");
    }

    #[test]
    fn title_markup_rendered() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let post = find_post(&manifest, "first-steps");
        assert_eq!(post.title, "First *Steps*");
        assert_eq!(post.title_html, "First <em>Steps</em>");
    }

    #[test]
    fn title_from_h1() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("post.md"), "intro\n\n# Cats & Dogs\n\n## Body\n").unwrap();
        let manifest = scan(tmp.path()).unwrap();
        let post = find_post(&manifest, "post");
        assert_eq!(post.title, "Cats & Dogs");
        assert_eq!(post.title_html, "Cats &amp; Dogs");
    }

    #[test]
    fn title_falls_back_to_stem() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let post = find_post(&manifest, "no-headings");
        assert_eq!(post.title, "no-headings");
        assert!(post.toc.is_empty());
        assert_eq!(post.heading_count, 0);
    }

    #[test]
    fn toc_nested_from_fixture() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let post = find_post(&manifest, "hello-world");

        assert_eq!(post.heading_count, 7);
        assert_eq!(tree::count(&post.toc), 7);
        assert_tree_shape(
            &post.toc,
            &[
                ("Why Another Blog", &[]),
                ("Getting Started", &["Prerequisites", "Installation"]),
                ("Conclusion", &[]),
            ],
        );
        assert_eq!(texts(&post.toc[1].children[1].children), ["macOS", "Linux"]);
    }

    #[test]
    fn toc_handles_skipped_levels_and_repeats() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let post = find_post(&manifest, "first-steps");

        assert_tree_shape(
            &post.toc,
            &[
                ("Orientation", &["Skipped A Level"]),
                ("Orientation", &["Landmarks"]),
                ("Orientation", &[]),
            ],
        );
        let slugs: Vec<&str> = post.toc.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["start-here", "orientation", "orientation-1"]);
    }

    #[test]
    fn config_loaded_from_fixtures() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.config.toc.max_depth, 4);
    }

    #[test]
    fn config_narrows_toc() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("config.toml"), "[toc]\nmax_depth = 2\n").unwrap();
        let manifest = scan(tmp.path()).unwrap();
        let post = find_post(&manifest, "hello-world");
        assert_eq!(
            texts(&post.toc),
            ["Why Another Blog", "Getting Started", "Conclusion"]
        );
        assert!(post.toc.iter().all(|h| h.children.is_empty()));
    }

    #[test]
    fn invalid_config_is_error() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("config.toml"), "[toc]\nmin_depth = 5\nmax_depth = 3\n").unwrap();
        let result = scan(tmp.path());
        assert!(matches!(result, Err(ScanError::Config(_))));
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"));
        match result {
            Err(ScanError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn empty_directory_yields_no_posts() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.posts.is_empty());
        assert_eq!(manifest.config, SiteConfig::default());
    }

    #[test]
    fn uppercase_extension_is_markdown() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("LOUD.MD"), "## Hi\n").unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.posts.len(), 1);
        assert_eq!(manifest.posts[0].slug, "loud");
    }

    #[test]
    fn load_post_outside_root_keeps_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("post.md");
        fs::write(&path, "## A\n").unwrap();
        let post = load_post(Path::new("/elsewhere"), &path, &ExtractOptions::default()).unwrap();
        assert!(post.source_path.ends_with("post.md"));
        assert_eq!(post.heading_count, 1);
    }

    #[test]
    fn front_matter_metadata_carried() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();

        let hello = find_post(&manifest, "hello-world");
        assert_eq!(hello.description.as_deref(), Some("Why this blog exists."));
        assert_eq!(hello.short_description.as_deref(), Some("A first post"));
        assert_eq!(hello.pub_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(hello.author.as_deref(), Some("Robin"));
        assert_eq!(hello.tags, ["meta", "writing"]);

        let steps = find_post(&manifest, "first-steps");
        assert_eq!(steps.pub_date, NaiveDate::from_ymd_opt(2024, 4, 12));
        assert!(steps.author.is_none());

        let bare = find_post(&manifest, "no-headings");
        assert!(bare.pub_date.is_none());
        assert!(bare.tags.is_empty());
    }

    #[test]
    fn tags_counted_across_posts() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let tags: Vec<(&str, usize)> = manifest
            .tags
            .iter()
            .map(|(t, n)| (t.as_str(), *n))
            .collect();
        assert_eq!(tags, [("meta", 1), ("wayfinders", 1), ("writing", 2)]);
    }

    #[test]
    fn invalid_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.md"), "---\ntitle: [oops\n---\n\n## A\n").unwrap();
        match scan(tmp.path()) {
            Err(ScanError::FrontMatter { path, .. }) => assert_eq!(path, "broken.md"),
            other => panic!("expected front matter error, got {other:?}"),
        }
    }

    #[test]
    fn scan_with_config_uses_given_config() {
        let tmp = setup_fixtures();
        let mut config = SiteConfig::default();
        config.toc.max_depth = 2;
        let manifest = scan_with_config(tmp.path(), config.clone()).unwrap();
        assert_eq!(manifest.config, config);
        let post = find_post(&manifest, "hello-world");
        assert!(post.toc.iter().all(|h| h.children.is_empty()));
    }

    #[test]
    fn manifest_serializes_to_json() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains(r#""slug":"getting-started""#));
        assert!(json.contains(r#""children":["#));
        assert!(json.contains(r#""pub_date":"2024-03-01""#));
        assert!(json.contains(r#""tags":{"meta":1"#));
    }
}
