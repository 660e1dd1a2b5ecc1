use clap::{Parser, Subcommand};
use simple_toc::extract::ExtractOptions;
use simple_toc::{config, output, scan};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("TOC_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("TOC_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-toc")]
#[command(about = "Table-of-contents builder for markdown posts")]
#[command(long_about = "\
Table-of-contents builder for markdown posts

Reads markdown, collects its headings in document order, and nests them by
level into a table of contents. Every heading gets a link slug that matches
the id on the rendered page.

Content structure:

  content/
  ├── config.toml                  # Optional: toc depth range, markdown switches
  ├── hello-world.md               # Post
  ├── wayfinders/                  # Subdirectories are scanned too
  │   └── first-steps.md
  └── .drafts/                     # Hidden directories are skipped

Heading rules:
  A heading nests under the closest earlier heading with a smaller level.
  Skipped levels (## then ####) nest directly, no placeholders.
  `## Title {#custom-id}` sets the slug explicitly.

Run 'simple-toc gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Log progress (repeat for more detail); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the table of contents of one markdown file
    Toc {
        /// Markdown file
        file: PathBuf,
        /// Print the tree as JSON instead of indented text
        #[arg(long)]
        json: bool,
        /// Shallowest heading level kept (overrides config)
        #[arg(long)]
        min_depth: Option<i32>,
        /// Deepest heading level kept (overrides config)
        #[arg(long)]
        max_depth: Option<i32>,
    },
    /// Scan the content directory and write a manifest
    Scan {
        /// Where to write the manifest
        #[arg(long, default_value = "manifest.json")]
        output: PathBuf,
    },
    /// Validate the content directory without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Toc {
            file,
            json,
            min_depth,
            max_depth,
        } => {
            let mut site_config = config_for_file(&file, &cli.source)?;
            if let Some(min) = min_depth {
                site_config.toc.min_depth = min;
            }
            if let Some(max) = max_depth {
                site_config.toc.max_depth = max;
            }
            site_config.validate()?;
            let options = ExtractOptions::from(&site_config);
            let root = file.parent().unwrap_or(Path::new("."));
            let post = scan::load_post(root, &file, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&post.toc)?);
            } else {
                output::print_toc(&post.toc);
            }
        }
        Command::Scan { output: manifest_path } => {
            println!("==> Scanning {}", cli.source.display());
            let manifest = scan_with_pool(&cli.source)?;
            if let Some(parent) = manifest_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&manifest_path, json)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Wrote {}", manifest_path.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan_with_pool(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Route `log` output to stderr. Default level is `warn`; each `-v` raises it
/// one step. `RUST_LOG`, when set, wins.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Config for a single file: the content directory's config when the file
/// lives under it, else the file's own directory's, else stock defaults.
fn config_for_file(file: &Path, source: &Path) -> Result<config::SiteConfig, config::ConfigError> {
    let dir = if file.starts_with(source) {
        source
    } else {
        file.parent().unwrap_or(Path::new("."))
    };
    config::load_config(dir)
}

/// Scan after sizing the rayon pool from the content directory's config.
fn scan_with_pool(source: &Path) -> Result<scan::Manifest, Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    init_thread_pool(&site_config.processing);
    Ok(scan::scan_with_config(source, site_config)?)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    log::debug!("using {threads} worker threads");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
