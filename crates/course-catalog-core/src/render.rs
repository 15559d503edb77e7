//! Presentation helpers for course pages.

use pulldown_cmark::{html, Options, Parser};

use crate::models::{CourseDuration, Locale};

/// Renders course markdown to HTML with tables, strikethrough and task
/// lists enabled.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(content, options);
    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Removes the first `# ` heading line so the page can show the title on
/// its own. Text before the heading is kept.
pub fn strip_leading_title(content: &str) -> String {
    let mut removed = false;
    let mut out = String::with_capacity(content.len());
    for line in content.lines() {
        if !removed && line.starts_with("# ") {
            removed = true;
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    if !removed {
        return content.to_string();
    }
    out.trim_start_matches('\n').to_string()
}

/// Duration text for display. Parsed hour counts are re-rendered in the
/// requested language; anything else is shown as written.
pub fn localize_duration(duration: &CourseDuration, locale: Locale) -> String {
    match (duration.value, locale) {
        (Some(n), Locale::En) => format!("{} hours", n),
        (Some(n), Locale::Zh) => format!("{} 小时", n),
        (None, _) => duration.original_text.clone(),
    }
}
