//! Weighted substring search over the course index.
//!
//! # Scoring
//!
//! The query is lowercased and matched as a plain substring against each
//! field of a [`SearchIndexEntry`]. Every field that contains it adds a
//! fixed weight:
//!
//! | Field | Weight |
//! |-------|--------|
//! | `title` | 10 |
//! | `titleEn` | 10 |
//! | `description` | 5 |
//! | `descriptionEn` | 5 |
//! | `university` | 7 |
//! | `programmingLanguage` | 6 |
//! | `category` | 3 |
//! | `subcategory` | 2 |
//!
//! Entries scoring zero are dropped. The rest are sorted by score
//! (descending) with a stable sort, so ties keep index order. There is no
//! tokenization, stemming, or length normalization.

use std::fmt;

use crate::models::{Locale, SearchHit, SearchIndexEntry, SearchPage};

pub const WEIGHT_TITLE: u32 = 10;
pub const WEIGHT_TITLE_EN: u32 = 10;
pub const WEIGHT_DESCRIPTION: u32 = 5;
pub const WEIGHT_DESCRIPTION_EN: u32 = 5;
pub const WEIGHT_UNIVERSITY: u32 = 7;
pub const WEIGHT_LANGUAGE: u32 = 6;
pub const WEIGHT_CATEGORY: u32 = 3;
pub const WEIGHT_SUBCATEGORY: u32 = 2;

/// Search validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    EmptyQuery,
    InvalidLimit,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::EmptyQuery => write!(f, "query must not be empty"),
            SearchError::InvalidLimit => write!(f, "limit must be at least 1"),
        }
    }
}

impl std::error::Error for SearchError {}

/// Summed field weights for `entry`. `query` must already be lowercased.
pub fn score(entry: &SearchIndexEntry, query: &str) -> u32 {
    let fields: [(&str, u32); 8] = [
        (entry.title.as_str(), WEIGHT_TITLE),
        (entry.title_en.as_str(), WEIGHT_TITLE_EN),
        (entry.description.as_str(), WEIGHT_DESCRIPTION),
        (entry.description_en.as_str(), WEIGHT_DESCRIPTION_EN),
        (entry.university.as_str(), WEIGHT_UNIVERSITY),
        (entry.programming_language.as_str(), WEIGHT_LANGUAGE),
        (entry.category.as_str(), WEIGHT_CATEGORY),
        (entry.subcategory.as_str(), WEIGHT_SUBCATEGORY),
    ];
    fields
        .iter()
        .filter(|(text, _)| !text.is_empty() && text.to_lowercase().contains(query))
        .map(|(_, weight)| weight)
        .sum()
}

/// All entries with a non-zero score, best first.
pub fn rank<'a>(
    query: &str,
    corpus: &'a [SearchIndexEntry],
) -> Result<Vec<(&'a SearchIndexEntry, u32)>, SearchError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let mut scored: Vec<(&SearchIndexEntry, u32)> = corpus
        .iter()
        .map(|entry| (entry, score(entry, &needle)))
        .filter(|(_, s)| *s > 0)
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(scored)
}

/// The `limit` best matches for `query`.
pub fn search(
    query: &str,
    corpus: &[SearchIndexEntry],
    limit: usize,
    locale: Locale,
) -> Result<Vec<SearchHit>, SearchError> {
    let ranked = rank(query, corpus)?;
    Ok(ranked
        .into_iter()
        .take(limit)
        .map(|(entry, s)| SearchHit::from_entry(entry, s, locale))
        .collect())
}

/// One page of ranked matches. `page` is 1-based; page 0 is treated as 1.
/// A page past the end comes back with empty `results` but the real
/// `total`.
pub fn search_page(
    query: &str,
    corpus: &[SearchIndexEntry],
    page: usize,
    limit: usize,
    locale: Locale,
) -> Result<SearchPage, SearchError> {
    if limit == 0 {
        return Err(SearchError::InvalidLimit);
    }
    let ranked = rank(query, corpus)?;
    let page = page.max(1);
    let total = ranked.len();
    let total_pages = total.div_ceil(limit);

    let results = ranked
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .map(|(entry, s)| SearchHit::from_entry(entry, s, locale))
        .collect();

    Ok(SearchPage {
        results,
        total,
        page,
        total_pages,
    })
}
