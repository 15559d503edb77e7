//! Catalog search for the CLI and the HTTP server.

use anyhow::Result;

use course_catalog_core::index::build_index;
use course_catalog_core::models::{Locale, SearchIndexEntry, SearchPage};
use course_catalog_core::search::search_page;

use crate::catalog::build_catalog;
use crate::config::Config;

/// Builds the catalog and flattens it into index entries.
pub fn build_search_index(config: &Config) -> Result<Vec<SearchIndexEntry>> {
    let categories = build_catalog(config)?;
    let entries = build_index(&categories);
    tracing::info!(entries = entries.len(), "search index built");
    Ok(entries)
}

/// CLI entry point: ranks the catalog against `query` and prints one page.
pub fn run_search(
    config: &Config,
    query: &str,
    page: usize,
    limit: Option<usize>,
    locale: Locale,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let entries = build_search_index(config)?;
    let limit = config.search.effective_limit(limit);
    let results = search_page(query, &entries, page, limit, locale)?;

    if results.results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    print_page(&results, limit);
    Ok(())
}

fn print_page(page: &SearchPage, limit: usize) {
    for (i, hit) in page.results.iter().enumerate() {
        let rank = (page.page - 1) * limit + i + 1;
        println!("{}. [{}] {}", rank, hit.score, hit.title);
        println!("    id: {}", hit.id);
        let mut facets = vec![hit.category.as_str()];
        if !hit.subcategory.is_empty() {
            facets.push(&hit.subcategory);
        }
        if !hit.university.is_empty() {
            facets.push(&hit.university);
        }
        if !hit.programming_language.is_empty() {
            facets.push(&hit.programming_language);
        }
        println!("    {}", facets.join(" · "));
        if !hit.summary.is_empty() {
            println!("    {}", hit.summary);
        }
        println!();
    }
    println!(
        "page {}/{} ({} matches)",
        page.page, page.total_pages, page.total
    );
}
