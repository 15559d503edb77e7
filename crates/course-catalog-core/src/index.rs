//! Search index construction and the cache that holds it.
//!
//! [`build_index`] flattens a category tree into [`SearchIndexEntry`]
//! records. [`IndexCache`] keeps the most recent build behind an
//! `RwLock` so request handlers share one copy; it is passed around
//! explicitly (usually in an `Arc`) rather than living in a global.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::models::{Category, Course, SearchIndexEntry};

/// Flattens `categories` into index entries: each category's own courses
/// first, then each subcategory's, in tree order.
pub fn build_index(categories: &[Category]) -> Vec<SearchIndexEntry> {
    let mut entries = Vec::new();
    for category in categories {
        for course in &category.courses {
            entries.push(entry_for(course, category, ""));
        }
        for sub in &category.subcategories {
            for course in &sub.courses {
                entries.push(entry_for(course, category, &sub.name));
            }
        }
    }
    entries
}

fn entry_for(course: &Course, category: &Category, subcategory: &str) -> SearchIndexEntry {
    SearchIndexEntry {
        id: course.id.clone(),
        title: course.title.clone(),
        title_en: course.title_en.clone().unwrap_or_default(),
        description: course.description.clone(),
        description_en: course.description_en.clone(),
        summary: course.summary.clone(),
        summary_en: course.summary_en.clone(),
        university: course.university.clone(),
        programming_language: course.programming_language.clone(),
        category: category.name.clone(),
        category_slug: category.slug.clone(),
        subcategory: subcategory.to_string(),
        has_chinese_version: !course.content.trim().is_empty(),
        has_english_version: course.has_english_version,
    }
}

/// A built index and when it was built.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    pub entries: Vec<SearchIndexEntry>,
    pub built_at: DateTime<Utc>,
}

impl SearchIndex {
    pub fn new(entries: Vec<SearchIndexEntry>) -> Self {
        Self {
            entries,
            built_at: Utc::now(),
        }
    }
}

/// Lazily-built, explicitly-invalidated holder for the search index.
#[derive(Debug, Default)]
pub struct IndexCache {
    current: RwLock<Option<Arc<SearchIndex>>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached index, building it with `build` on first use.
    ///
    /// A failed build leaves the cache empty and returns the error.
    pub fn get_or_build<E, F>(&self, build: F) -> Result<Arc<SearchIndex>, E>
    where
        F: FnOnce() -> Result<Vec<SearchIndexEntry>, E>,
    {
        if let Some(index) = self.get() {
            return Ok(index);
        }
        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have filled the slot while we waited.
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }
        let index = Arc::new(SearchIndex::new(build()?));
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Discards the current index and builds a fresh one.
    pub fn rebuild<E, F>(&self, build: F) -> Result<Arc<SearchIndex>, E>
    where
        F: FnOnce() -> Result<Vec<SearchIndexEntry>, E>,
    {
        self.invalidate();
        self.get_or_build(build)
    }

    /// Drops the cached index; the next lookup rebuilds it.
    pub fn invalidate(&self) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// The cached index, if one has been built.
    pub fn get(&self) -> Option<Arc<SearchIndex>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.get().map(|index| index.built_at)
    }
}
