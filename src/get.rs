//! Course retrieval by id.
//!
//! Used by both the `catalog get` CLI command and `GET /api/courses/{id}`.

use anyhow::{bail, Result};
use serde::Serialize;

use course_catalog_core::models::{Category, Course, Locale};
use course_catalog_core::render::{localize_duration, render_markdown, strip_leading_title};

use crate::catalog::{build_catalog, find_course};
use crate::config::Config;

/// A course plus its page body rendered for one locale.
#[derive(Debug, Clone, Serialize)]
pub struct CoursePage {
    pub course: Course,
    pub html: String,
}

impl CoursePage {
    pub fn render(course: &Course, locale: Locale) -> Self {
        let body = strip_leading_title(course.content_for(locale));
        Self {
            course: course.clone(),
            html: render_markdown(&body),
        }
    }
}

/// Looks up `id` in an already-built tree.
pub fn course_page(categories: &[Category], id: &str, locale: Locale) -> Option<CoursePage> {
    find_course(categories, id).map(|course| CoursePage::render(course, locale))
}

/// CLI entry point: builds the catalog and prints one course.
pub fn run_get(config: &Config, id: &str, locale: Locale, html: bool) -> Result<()> {
    let categories = build_catalog(config)?;
    let Some(page) = course_page(&categories, id, locale) else {
        bail!("course not found: {}", id);
    };
    let course = &page.course;

    if html {
        println!("{}", page.html);
        return Ok(());
    }

    println!("--- Course ---");
    println!("id:           {}", course.id);
    println!("title:        {}", course.title_for(locale));
    println!("category:     {}", course.category);
    if let Some(ref sub) = course.subcategory {
        println!("subcategory:  {}", sub);
    }
    if !course.university.is_empty() {
        println!("university:   {}", course.university);
    }
    if !course.programming_language.is_empty() {
        println!("language:     {}", course.programming_language);
    }
    if let Some(ref difficulty) = course.difficulty {
        println!("difficulty:   {}", difficulty);
    }
    if let Some(ref duration) = course.duration {
        println!("duration:     {}", localize_duration(duration, locale));
    }
    if !course.prerequisites.is_empty() {
        println!("prerequisites: {}", course.prerequisites);
    }
    println!("english:      {}", if course.has_english_version { "yes" } else { "no" });
    println!("source:       {}", course.source_path);
    println!();

    let summary = course.summary_for(locale);
    if !summary.is_empty() {
        println!("--- Summary ---");
        println!("{}", summary);
        println!();
    }

    println!("--- Content ---");
    println!("{}", course.content_for(locale));

    Ok(())
}
