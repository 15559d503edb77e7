//! Core data models shared by the builder, the search index, and the
//! HTTP/CLI surfaces.
//!
//! Every type here is a plain value rebuilt from the markdown tree on
//! demand. JSON field names are camelCase to match what the site's
//! frontend consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty tier of a course.
///
/// Star ratings are bucketed into the three named tiers; any other label
/// text is kept verbatim in [`Difficulty::Other`]. Serialized as a plain
/// string either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Other(String),
}

impl Difficulty {
    /// Buckets a star count: up to 2 is Beginner, up to 4 Intermediate,
    /// anything above Advanced.
    pub fn from_stars(stars: usize) -> Self {
        match stars {
            0..=2 => Difficulty::Beginner,
            3..=4 => Difficulty::Intermediate,
            _ => Difficulty::Advanced,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Other(raw) => raw,
        }
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Beginner" => Difficulty::Beginner,
            "Intermediate" => Difficulty::Intermediate,
            "Advanced" => Difficulty::Advanced,
            _ => Difficulty::Other(value),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        match value {
            Difficulty::Other(raw) => raw,
            tier => tier.as_str().to_string(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Course length as written in the markdown, plus the hour count when one
/// could be read out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDuration {
    /// Parsed number of hours; `None` when the text has no `<n> hours` shape.
    pub value: Option<u32>,
    /// The label value exactly as it appeared in the file.
    pub original_text: String,
}

/// Display language for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Ok(Locale::Zh),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(format!("unknown locale: '{}'. Use zh or en.", other)),
        }
    }
}

/// A single course, assembled from a base markdown file and (optionally)
/// its English counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// `category`, `subcategory` and file-stem slugs joined by the
    /// configured separator. Unique within its category+subcategory.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    /// Raw markdown of the base file.
    pub content: String,
    /// Raw markdown of the counterpart file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_en: Option<String>,
    pub summary: String,
    pub summary_en: String,
    pub description: String,
    pub description_en: String,
    pub programming_language: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub duration: Option<CourseDuration>,
    pub university: String,
    pub prerequisites: String,
    pub has_english_version: bool,
    /// Slug of the owning category.
    pub category: String,
    /// Slug of the owning subcategory, if the course lives one level down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Path of the base file relative to the docs root, `/`-separated.
    pub source_path: String,
}

impl Course {
    /// Title for the given locale, falling back to the base title.
    pub fn title_for(&self, locale: Locale) -> &str {
        match (locale, self.title_en.as_deref()) {
            (Locale::En, Some(t)) if !t.is_empty() => t,
            _ => &self.title,
        }
    }

    /// Markdown body for the given locale, falling back to the base content.
    pub fn content_for(&self, locale: Locale) -> &str {
        match (locale, self.content_en.as_deref()) {
            (Locale::En, Some(c)) if !c.trim().is_empty() => c,
            _ => &self.content,
        }
    }

    /// Summary for the given locale, falling back to the base summary.
    pub fn summary_for(&self, locale: Locale) -> &str {
        pick(locale, &self.summary, &self.summary_en)
    }

    /// Drops both markdown bodies. Used for list views.
    pub fn strip_content(&mut self) {
        self.content.clear();
        self.content_en = None;
    }
}

/// A second-level grouping inside a [`Category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub name: String,
    pub slug: String,
    pub courses: Vec<Course>,
}

/// A top-level grouping, derived from a directory under the docs root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub subcategories: Vec<Subcategory>,
    /// Courses that live directly in the category directory.
    pub courses: Vec<Course>,
}

impl Category {
    /// Courses owned directly, then each subcategory's in order.
    pub fn all_courses(&self) -> impl Iterator<Item = &Course> {
        self.courses
            .iter()
            .chain(self.subcategories.iter().flat_map(|s| s.courses.iter()))
    }

    pub fn course_count(&self) -> usize {
        self.all_courses().count()
    }

    pub fn strip_content(&mut self) {
        self.courses.iter_mut().for_each(Course::strip_content);
        for sub in &mut self.subcategories {
            sub.courses.iter_mut().for_each(Course::strip_content);
        }
    }
}

/// Denormalized, locale-merged projection of a [`Course`] used only for
/// keyword search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndexEntry {
    pub id: String,
    pub title: String,
    pub title_en: String,
    pub description: String,
    pub description_en: String,
    pub summary: String,
    pub summary_en: String,
    pub university: String,
    pub programming_language: String,
    /// Display name of the category.
    pub category: String,
    pub category_slug: String,
    /// Display name of the subcategory, empty when the course has none.
    pub subcategory: String,
    pub has_chinese_version: bool,
    pub has_english_version: bool,
}

/// A scored search result with its text fields resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub summary: String,
    pub university: String,
    pub programming_language: String,
    pub category: String,
    pub category_slug: String,
    pub subcategory: String,
    pub has_english_version: bool,
    pub score: u32,
}

impl SearchHit {
    pub fn from_entry(entry: &SearchIndexEntry, score: u32, locale: Locale) -> Self {
        Self {
            id: entry.id.clone(),
            title: pick(locale, &entry.title, &entry.title_en).to_string(),
            description: pick(locale, &entry.description, &entry.description_en).to_string(),
            summary: pick(locale, &entry.summary, &entry.summary_en).to_string(),
            university: entry.university.clone(),
            programming_language: entry.programming_language.clone(),
            category: entry.category.clone(),
            category_slug: entry.category_slug.clone(),
            subcategory: entry.subcategory.clone(),
            has_english_version: entry.has_english_version,
            score,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<SearchHit>,
    /// Number of matching entries across all pages.
    pub total: usize,
    /// 1-based page number that was returned.
    pub page: usize,
    pub total_pages: usize,
}

fn pick<'a>(locale: Locale, base: &'a str, en: &'a str) -> &'a str {
    if locale == Locale::En && !en.is_empty() {
        en
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_buckets_are_monotonic() {
        assert_eq!(Difficulty::from_stars(1), Difficulty::Beginner);
        assert_eq!(Difficulty::from_stars(2), Difficulty::Beginner);
        assert_eq!(Difficulty::from_stars(3), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_stars(4), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_stars(5), Difficulty::Advanced);
        assert_eq!(Difficulty::from_stars(9), Difficulty::Advanced);
    }

    #[test]
    fn difficulty_serializes_as_plain_string() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"Intermediate\"");
        let json = serde_json::to_string(&Difficulty::Other("中等".into())).unwrap();
        assert_eq!(json, "\"中等\"");

        let back: Difficulty = serde_json::from_str("\"Advanced\"").unwrap();
        assert_eq!(back, Difficulty::Advanced);
    }

    #[test]
    fn duration_uses_camel_case_keys() {
        let d = CourseDuration {
            value: Some(60),
            original_text: "60 hours".into(),
        };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["value"], 60);
        assert_eq!(v["originalText"], "60 hours");
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ZH".parse::<Locale>().unwrap(), Locale::Zh);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn hit_prefers_english_fields_only_when_present() {
        let entry = SearchIndexEntry {
            id: "a".into(),
            title: "数据结构".into(),
            title_en: "Data Structures".into(),
            description: "描述".into(),
            description_en: String::new(),
            summary: "摘要".into(),
            summary_en: "Summary".into(),
            university: String::new(),
            programming_language: "Java".into(),
            category: "基础".into(),
            category_slug: "basics".into(),
            subcategory: String::new(),
            has_chinese_version: true,
            has_english_version: true,
        };
        let hit = SearchHit::from_entry(&entry, 10, Locale::En);
        assert_eq!(hit.title, "Data Structures");
        assert_eq!(hit.description, "描述");
        assert_eq!(hit.summary, "Summary");

        let hit = SearchHit::from_entry(&entry, 10, Locale::Zh);
        assert_eq!(hit.title, "数据结构");
    }
}
