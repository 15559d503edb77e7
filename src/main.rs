//! # Course Catalog CLI (`catalog`)
//!
//! ## Usage
//!
//! ```bash
//! catalog --config ./config/catalog.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `catalog tree` | Print the category tree |
//! | `catalog stats` | Course counts and difficulty breakdown |
//! | `catalog get <id>` | Print one course (or its HTML with `--html`) |
//! | `catalog search "<query>"` | Ranked keyword search |
//! | `catalog export` | JSON dump of the tree and search index |
//! | `catalog serve` | Start the HTTP server |
//!
//! Logs go to stderr; set `RUST_LOG=debug` for per-file detail.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use course_catalog::config;
use course_catalog::{catalog, export, get, search, server, stats};
use course_catalog_core::models::Locale;

/// Course Catalog CLI: browse, search and serve a bilingual course tree.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/catalog.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "catalog",
    about = "Course Catalog — a bilingual course catalog built from markdown",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/catalog.toml`.
    #[arg(long, global = true, default_value = "./config/catalog.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the category → subcategory → course tree.
    Tree,

    /// Print counts of categories, courses, bilingual coverage and
    /// difficulty levels.
    Stats,

    /// Print one course by id.
    Get {
        /// Course id, e.g. `programming-intro--cs50`.
        id: String,

        /// Display language: `zh` or `en`.
        #[arg(long, default_value = "zh")]
        locale: Locale,

        /// Print the rendered HTML body instead of the markdown.
        #[arg(long)]
        html: bool,
    },

    /// Search the catalog.
    Search {
        /// The search query string.
        query: String,

        /// 1-based result page.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Results per page (defaults to `[search].default_limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Display language: `zh` or `en`.
        #[arg(long, default_value = "zh")]
        locale: Locale,
    },

    /// Export the tree and search index as JSON.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Tree => {
            catalog::run_tree(&cfg)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Get { id, locale, html } => {
            get::run_get(&cfg, &id, locale, html)?;
        }
        Commands::Search {
            query,
            page,
            limit,
            locale,
        } => {
            search::run_search(&cfg, &query, page, limit, locale)?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref())?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
