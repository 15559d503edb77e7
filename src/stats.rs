//! Catalog overview.
//!
//! Counts categories, subcategories, courses and bilingual coverage, plus
//! a difficulty breakdown. Used by `catalog stats` to sanity-check a docs
//! tree after edits.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use course_catalog_core::models::Category;

use crate::catalog::build_catalog;
use crate::config::Config;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub categories: usize,
    pub subcategories: usize,
    pub courses: usize,
    pub bilingual: usize,
    /// Difficulty label → course count. Courses without one are under
    /// `"(none)"`.
    pub by_difficulty: BTreeMap<String, usize>,
    /// Sum of parsed hour counts.
    pub total_hours: u64,
}

pub fn compute_stats(categories: &[Category]) -> CatalogStats {
    let mut stats = CatalogStats {
        categories: categories.len(),
        ..CatalogStats::default()
    };

    for category in categories {
        stats.subcategories += category.subcategories.len();
        for course in category.all_courses() {
            stats.courses += 1;
            if course.has_english_version {
                stats.bilingual += 1;
            }
            let label = course
                .difficulty
                .as_ref()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "(none)".to_string());
            *stats.by_difficulty.entry(label).or_insert(0) += 1;
            if let Some(hours) = course.duration.as_ref().and_then(|d| d.value) {
                stats.total_hours += u64::from(hours);
            }
        }
    }
    stats
}

/// Run the stats command: build the catalog and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let categories = build_catalog(config)?;
    let stats = compute_stats(&categories);

    println!("Course Catalog — Stats");
    println!("======================");
    println!();
    println!("  Docs root:      {}", config.docs.root.display());
    println!();
    println!("  Categories:     {}", stats.categories);
    println!("  Subcategories:  {}", stats.subcategories);
    println!("  Courses:        {}", stats.courses);
    println!(
        "  Bilingual:      {} / {} ({}%)",
        stats.bilingual,
        stats.courses,
        if stats.courses > 0 {
            (stats.bilingual * 100) / stats.courses
        } else {
            0
        }
    );
    println!("  Total hours:    {}", stats.total_hours);

    if !stats.by_difficulty.is_empty() {
        println!();
        println!("  By difficulty:");
        for (label, count) in &stats.by_difficulty {
            println!("    {:<20} {:>5}", label, count);
        }
    }

    if !categories.is_empty() {
        println!();
        println!("  {:<32} {:>8}", "CATEGORY", "COURSES");
        println!("  {}", "-".repeat(41));
        for category in &categories {
            println!("  {:<32} {:>8}", category.slug, category.course_count());
        }
    }

    Ok(())
}
