//! Base/counterpart pairing.
//!
//! A course is a base file (Chinese) plus an optional English counterpart.
//! The counterpart is looked up first as a sibling named with the
//! configured suffix (`cs61b.md` → `cs61b.en.md`), then, when
//! `docs.en_root` is set, at the same relative path in the English tree.
//!
//! Nothing in here fails. Unreadable files are logged and degrade to
//! whatever data is still available.

use std::path::{Path, PathBuf};

use course_catalog_core::metadata::{parse_course_markdown, CourseMetadata, ParseOptions};

use crate::config::{DocsConfig, NamingConfig};

/// Merged metadata for one course plus its English-only fields.
#[derive(Debug, Clone)]
pub struct PairedCourse {
    pub meta: CourseMetadata,
    pub title_en: Option<String>,
    pub content_en: Option<String>,
    pub has_english_version: bool,
}

/// Reads and parses `base_path`, finds its counterpart, and merges the two.
pub fn resolve_pair(
    base_path: &Path,
    docs: &DocsConfig,
    naming: &NamingConfig,
    options: &ParseOptions,
) -> PairedCourse {
    let file_name = base_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = naming.stem(&file_name);

    let base =
        read_course(base_path, stem, options).unwrap_or_else(|| CourseMetadata::fallback(stem));

    let counterpart = counterpart_candidates(base_path, docs, naming)
        .into_iter()
        .find(|p| p.is_file())
        .and_then(|path| {
            let meta = read_course(&path, stem, options)?;
            if meta.is_empty() {
                tracing::warn!(path = %path.display(), "counterpart is empty, ignoring");
                return None;
            }
            Some(meta)
        });

    match counterpart {
        Some(en) => merge(base, en),
        None => PairedCourse {
            meta: base,
            title_en: None,
            content_en: None,
            has_english_version: false,
        },
    }
}

/// Counterpart locations to try, in order.
pub fn counterpart_candidates(
    base_path: &Path,
    docs: &DocsConfig,
    naming: &NamingConfig,
) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    let Some(file_name) = base_path.file_name() else {
        return candidates;
    };
    candidates.push(
        base_path.with_file_name(naming.counterpart_name(&file_name.to_string_lossy())),
    );

    if let Some(en_root) = &docs.en_root {
        if let Ok(relative) = base_path.strip_prefix(&docs.root) {
            candidates.push(en_root.join(relative));
        }
    }
    candidates
}

fn read_course(path: &Path, stem: &str, options: &ParseOptions) -> Option<CourseMetadata> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(parse_course_markdown(&text, stem, options)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read course file");
            None
        }
    }
}

/// Counterpart labels override the base when non-empty; English text comes
/// from the counterpart, falling back to the base file's English section.
fn merge(mut base: CourseMetadata, en: CourseMetadata) -> PairedCourse {
    if !en.programming_language.is_empty() {
        base.programming_language = en.programming_language;
    }
    if en.difficulty.is_some() {
        base.difficulty = en.difficulty;
    }
    if en.duration.is_some() {
        base.duration = en.duration;
    }
    if !en.university.is_empty() {
        base.university = en.university;
    }
    if !en.prerequisites.is_empty() {
        base.prerequisites = en.prerequisites;
    }

    let description_en = first_non_empty([en.description_en, en.description]);
    if !description_en.is_empty() {
        base.description_en = description_en;
    }
    let summary_en = first_non_empty([en.summary_en, en.summary]);
    if !summary_en.is_empty() {
        base.summary_en = summary_en;
    }

    PairedCourse {
        meta: base,
        title_en: Some(en.title),
        content_en: Some(en.content),
        has_english_version: true,
    }
}

fn first_non_empty<const N: usize>(values: [String; N]) -> String {
    values
        .into_iter()
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}
