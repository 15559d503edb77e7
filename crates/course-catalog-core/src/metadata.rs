//! Heuristic metadata extraction from course markdown.
//!
//! Course files are loosely structured: an H1 title, then somewhere an
//! "introduction" heading followed by a bullet list of labeled fields and a
//! free-text paragraph:
//!
//! ```text
//! # CS61B: Data Structures
//!
//! ## 课程简介
//!
//! - 所属大学：UC Berkeley
//! - 编程语言：Java
//! - 课程难度：🌟🌟🌟
//! - 预计学时：60 小时
//!
//! CS61B is the second course in Berkeley's CS61 series...
//! ```
//!
//! Labels are matched through [`LABEL_RULES`], a table of label variants
//! mapped to field setters. Anything the scanner does not recognise is
//! ignored; a file with no introduction section yields empty metadata.
//! Parsing never fails.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{CourseDuration, Difficulty};

/// Default summary length cap, in characters.
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 150;

const ZH_MARKERS: &[&str] = &["课程简介", "课程介绍"];
const EN_MARKERS: &[&str] = &["course introduction", "course overview", "introduction"];

const STAR_GLYPHS: &[char] = &['🌟', '⭐', '★'];

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:hours?|hrs?|小时|学时|课时)").expect("valid regex")
});
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid regex"));
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").expect("valid regex"));
static ITALIC_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*]*)\*").expect("valid regex"));
// `_` is a word character, so `\b` only holds where the underscore
// touches a non-word neighbour and snake_case identifiers are left alone.
static ITALIC_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_]+)_\b").expect("valid regex"));

/// Parser tuning.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Summaries longer than this many characters are cut and suffixed
    /// with `...`.
    pub summary_max_chars: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }
}

/// Everything extracted from a single markdown file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseMetadata {
    pub title: String,
    /// The full file text, untouched.
    pub content: String,
    pub summary: String,
    pub summary_en: String,
    /// Cleaned introduction paragraph before truncation.
    pub description: String,
    pub description_en: String,
    pub programming_language: String,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<CourseDuration>,
    pub university: String,
    pub prerequisites: String,
}

impl CourseMetadata {
    /// Minimal record used when a file cannot be read.
    pub fn fallback(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// True when the file produced no usable text at all.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A row of the label table: any of `variants` found (case-insensitively)
/// in a bullet's label routes the bullet's value to `apply`.
struct LabelRule {
    variants: &'static [&'static str],
    apply: fn(&mut CourseMetadata, &str),
}

/// Checked in order; the first rule with a matching variant wins.
const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        variants: &["编程语言", "programming language", "语言", "language"],
        apply: set_language,
    },
    LabelRule {
        variants: &["难度", "difficulty"],
        apply: set_difficulty,
    },
    LabelRule {
        variants: &["学时", "课时", "时长", "class hour", "duration"],
        apply: set_duration,
    },
    LabelRule {
        variants: &["所属大学", "大学", "university", "offered by"],
        apply: set_university,
    },
    LabelRule {
        variants: &["先修要求", "先修课程", "prerequisite"],
        apply: set_prerequisites,
    },
];

fn set_language(meta: &mut CourseMetadata, value: &str) {
    meta.programming_language = value.to_string();
}

fn set_difficulty(meta: &mut CourseMetadata, value: &str) {
    meta.difficulty = Some(parse_difficulty(value));
}

fn set_duration(meta: &mut CourseMetadata, value: &str) {
    meta.duration = Some(parse_duration(value));
}

fn set_university(meta: &mut CourseMetadata, value: &str) {
    meta.university = value.to_string();
}

fn set_prerequisites(meta: &mut CourseMetadata, value: &str) {
    meta.prerequisites = value.to_string();
}

/// Parse one course file. `fallback_title` is used when the text has no
/// `# ` heading (callers pass the file stem).
pub fn parse_course_markdown(
    text: &str,
    fallback_title: &str,
    options: &ParseOptions,
) -> CourseMetadata {
    let text = text.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = text.lines().collect();

    let title = extract_title(&lines);
    let title_line = title.as_ref().map(|(idx, _)| *idx);

    let mut meta = CourseMetadata {
        title: title
            .map(|(_, t)| t)
            .unwrap_or_else(|| fallback_title.to_string()),
        content: text.to_string(),
        ..CourseMetadata::default()
    };

    let zh_section = find_marker(&lines, ZH_MARKERS, &[title_line]);
    let en_section = find_marker(&lines, EN_MARKERS, &[title_line, zh_section]);

    // Labels come from whichever introduction appears first; the other
    // section only fills fields the first one left empty.
    let (primary, secondary) = match (zh_section, en_section) {
        (Some(zh), Some(en)) if en < zh => (Some(en), Some(zh)),
        (Some(zh), en) => (Some(zh), en),
        (None, en) => (en, None),
    };

    let Some(primary) = primary else {
        return meta;
    };

    let primary_text = read_section(&lines, primary, &mut meta);
    let secondary_text = secondary.map(|idx| {
        let mut extra = CourseMetadata::default();
        let text = read_section(&lines, idx, &mut extra);
        fill_missing(&mut meta, extra);
        text
    });

    let (zh_text, en_text) = match (zh_section, en_section) {
        (Some(zh), Some(_)) if zh == primary => (Some(primary_text), secondary_text),
        (Some(_), Some(_)) => (secondary_text, Some(primary_text)),
        (Some(_), None) => (Some(primary_text), None),
        (None, _) => (None, Some(primary_text)),
    };

    let zh_description = zh_text.map(|t| clean_markdown(&t)).unwrap_or_default();
    let en_description = en_text.map(|t| clean_markdown(&t)).unwrap_or_default();

    meta.description = if zh_description.is_empty() {
        en_description.clone()
    } else {
        zh_description
    };
    meta.description_en = en_description;
    meta.summary = truncate_summary(&meta.description, options.summary_max_chars);
    meta.summary_en = truncate_summary(&meta.description_en, options.summary_max_chars);

    meta
}

/// First `# ` line with a non-blank title, and its line index. Blank H1s
/// are skipped.
fn extract_title(lines: &[&str]) -> Option<(usize, String)> {
    lines.iter().enumerate().find_map(|(idx, line)| {
        let title = line.strip_prefix("# ")?.trim();
        (!title.is_empty()).then(|| (idx, title.to_string()))
    })
}

/// Index of the first line that names an introduction section. Lines in
/// `skip` (the title, a section claimed by another marker set) never match.
fn find_marker(lines: &[&str], markers: &[&str], skip: &[Option<usize>]) -> Option<usize> {
    lines.iter().enumerate().find_map(|(idx, line)| {
        if skip.contains(&Some(idx)) {
            return None;
        }
        let trimmed = line.trim();
        let is_heading = trimmed.starts_with('#');
        let bare = strip_emphasis(trimmed.trim_start_matches('#'))
            .trim()
            .trim_end_matches(|c: char| c == ':' || c == '：')
            .trim()
            .to_lowercase();
        let hit = markers.iter().any(|m| {
            if is_heading {
                bare.contains(m)
            } else {
                bare == *m
            }
        });
        hit.then_some(idx)
    })
}

/// Consume one introduction section starting at the marker line: apply
/// labeled bullets to `meta` and return the raw summary paragraph.
fn read_section(lines: &[&str], marker: usize, meta: &mut CourseMetadata) -> String {
    let mut i = marker + 1;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }
        match line.strip_prefix('-') {
            Some(item) => {
                apply_label(item, meta);
                i += 1;
            }
            None => break,
        }
    }

    // Stray key/value lines and sub-headings still count as metadata.
    while i < lines.len() {
        let line = lines[i].trim();
        let still_metadata = line.is_empty()
            || line.contains(':')
            || line.contains('：')
            || line.starts_with('-')
            || line.starts_with("##");
        if !still_metadata {
            break;
        }
        i += 1;
    }

    let mut paragraph: Vec<&str> = Vec::new();
    while i < lines.len() {
        let line = lines[i].trim();
        if line.starts_with('#') || line.starts_with("---") {
            break;
        }
        if line.is_empty() {
            if !paragraph.is_empty() {
                break;
            }
        } else {
            paragraph.push(line);
        }
        i += 1;
    }

    paragraph.join(" ")
}

fn apply_label(item: &str, meta: &mut CourseMetadata) {
    let Some(split) = item.find(|c: char| c == ':' || c == '：') else {
        return;
    };
    let sep_len = item[split..].chars().next().map_or(1, char::len_utf8);
    let label = strip_emphasis(&item[..split]).trim().to_lowercase();
    let value = strip_emphasis(&item[split + sep_len..]).trim().to_string();
    if label.is_empty() || value.is_empty() {
        return;
    }

    if let Some(rule) = LABEL_RULES
        .iter()
        .find(|rule| rule.variants.iter().any(|v| label.contains(v)))
    {
        (rule.apply)(meta, &value);
    }
}

fn fill_missing(meta: &mut CourseMetadata, extra: CourseMetadata) {
    if meta.programming_language.is_empty() {
        meta.programming_language = extra.programming_language;
    }
    if meta.difficulty.is_none() {
        meta.difficulty = extra.difficulty;
    }
    if meta.duration.is_none() {
        meta.duration = extra.duration;
    }
    if meta.university.is_empty() {
        meta.university = extra.university;
    }
    if meta.prerequisites.is_empty() {
        meta.prerequisites = extra.prerequisites;
    }
}

/// Star glyphs are counted and bucketed; any other text passes through.
pub fn parse_difficulty(value: &str) -> Difficulty {
    let stars = value.chars().filter(|c| STAR_GLYPHS.contains(c)).count();
    if stars > 0 {
        Difficulty::from_stars(stars)
    } else {
        Difficulty::Other(value.trim().to_string())
    }
}

/// Reads `<n> hours` / `<n> 小时` style values. The original text is
/// always kept; `value` is `None` when no hour count is found.
pub fn parse_duration(value: &str) -> CourseDuration {
    let value_num = DURATION_RE
        .captures(value)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    CourseDuration {
        value: value_num,
        original_text: value.to_string(),
    }
}

/// Removes images, links (keeping their text), inline code, bold and
/// italic markers, then collapses whitespace.
pub fn clean_markdown(text: &str) -> String {
    let text = IMAGE_RE.replace_all(text, "${1}");
    let text = LINK_RE.replace_all(&text, "${1}");
    let text = CODE_RE.replace_all(&text, "${1}");
    let text = strip_emphasis(&text);
    let text = text.replace('`', "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_emphasis(text: &str) -> String {
    let text = BOLD_RE.replace_all(text, "${1}${2}");
    let text = ITALIC_STAR_RE.replace_all(&text, "${1}");
    let text = ITALIC_UNDERSCORE_RE.replace_all(&text, "${1}");
    text.replace("**", "")
}

/// Cuts `text` to `max_chars` characters and appends `...` when it was
/// longer.
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
