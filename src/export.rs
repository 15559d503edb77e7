//! Export the catalog as JSON for static site generation.
//!
//! Produces one document holding the category tree (course bodies
//! included, so pages can be rendered offline) and the flattened search
//! index for client-side search.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use course_catalog_core::index::build_index;
use course_catalog_core::models::{Category, SearchIndexEntry};

use crate::catalog::build_catalog;
use crate::config::Config;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub generated_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub index: Vec<SearchIndexEntry>,
}

pub fn export_data(config: &Config) -> Result<ExportData> {
    let categories = build_catalog(config)?;
    let index = build_index(&categories);
    Ok(ExportData {
        generated_at: Utc::now(),
        categories,
        index,
    })
}

/// Export the catalog as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let data = export_data(config)?;
    let json = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Exported {} categories, {} courses to {}",
                data.categories.len(),
                data.index.len(),
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
