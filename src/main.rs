use clap::{Parser, Subcommand};
use simple_blog::types::ContentItem;
use simple_blog::{config, output, query, scan};
use std::path::PathBuf;
use std::process::ExitCode;

/// Shared flags for commands that read one collection.
#[derive(clap::Args, Clone)]
struct CollectionArgs {
    /// Collection to read (defaults to the only one, or `blog`)
    #[arg(long)]
    collection: Option<String>,

    /// Include drafts
    #[arg(long)]
    drafts: bool,
}

#[derive(Parser)]
#[command(name = "simple-blog")]
#[command(about = "Content pipeline for a static blog")]
#[command(long_about = "\
Content pipeline for a static blog

Markdown files with front-matter become validated, slugged articles that can
be listed, filtered by tag, searched, and paginated.

Content structure:

  content/
  ├── site.toml                    # Site config (optional)
  └── blog/                        # Default collection
      ├── observer-pattern.md      # → /blog/observer-pattern
      ├── proxy-pattern.mdx        # TOML (+++) front-matter also works
      ├── _template.md             # `_` or `.` prefix = ignored
      └── sorting/
          ├── index.md             # → /blog/sorting
          └── quick-sort.md        # → /blog/sorting/quick-sort

Front-matter:

  ---
  title: Observer Pattern          # required
  summary: Subjects and observers  # required
  date: 2024-01-01                 # required (also publishDate, pubDate)
  tags: [JavaScript]               # optional
  draft: false                     # optional
  slug: observer                   # optional, replaces the path-derived slug
  ---

Run 'simple-blog gen-config' to generate a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".simple-blog-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load all collections and write the manifest
    Scan,
    /// Validate content without writing anything
    Check,
    /// List items, newest first
    List {
        #[command(flatten)]
        select: CollectionArgs,

        /// Only items with this tag (case-sensitive)
        #[arg(long)]
        tag: Option<String>,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Items per page
        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
    /// Search titles, summaries and tags
    Search {
        query: String,

        #[command(flatten)]
        select: CollectionArgs,
    },
    /// Show every tag with its items
    Tags {
        /// Collection to read (defaults to the only one, or `blog`)
        #[arg(long)]
        collection: Option<String>,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let result = load(&cli)?;
            let manifest_path = scan::write_manifest(&result.manifest, &cli.temp_dir)?;
            output::print_scan_output(&result, &cli.source);
            println!("==> Manifest: {}", manifest_path.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let result = load(&cli)?;
            output::print_scan_output(&result, &cli.source);
            println!("{}", output::format_check_summary(&result));
            if !result.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::List {
            ref select,
            ref tag,
            page,
            per_page,
        } => {
            let result = load(&cli)?;
            let collection = result.manifest.select(select.collection.as_deref())?;
            let mut items = visible(&collection.items, select.drafts);
            if let Some(tag) = tag {
                items = query::filter_by_tag(items, tag);
            }
            let pages = query::paginate(items, per_page);
            let shown = page.clamp(1, pages.len());
            output::print_listing(&pages[shown - 1], per_page);
        }
        Command::Search {
            query: ref text,
            ref select,
        } => {
            let result = load(&cli)?;
            let collection = result.manifest.select(select.collection.as_deref())?;
            let found = query::search(visible(&collection.items, select.drafts), text);
            output::print_search_results(text, &found);
        }
        Command::Tags { ref collection } => {
            let result = load(&cli)?;
            let collection = result.manifest.select(collection.as_deref())?;
            let groups = query::group_by_tag(query::public_listing(&collection.items));
            output::print_tags(&groups);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `site.toml` once, size the rayon pool from it, then scan.
fn load(cli: &Cli) -> Result<scan::ScanResult, scan::ScanError> {
    let site_config = config::load_config(&cli.source)?;
    init_thread_pool(&site_config.processing);
    scan::scan_with_config(&cli.source, site_config)
}

/// Newest first, drafts only when asked for.
fn visible(items: &[ContentItem], drafts: bool) -> Vec<&ContentItem> {
    if drafts {
        query::sort_by_date_descending(items)
    } else {
        query::public_listing(items)
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. The user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
