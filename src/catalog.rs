//! Course tree builder.
//!
//! [`build_catalog`] is the single place the docs tree is turned into
//! [`Category`] values. The CLI commands, the HTTP handlers, the search
//! index, and the export all call it with the loaded [`Config`].
//!
//! Layout:
//!
//! ```text
//! docs/
//! ├── images/                  (reserved, skipped)
//! ├── 编程入门/                 category
//! │   ├── cs50.md              course owned by the category
//! │   ├── cs50.en.md           its English counterpart
//! │   └── Python/              subcategory
//! │       └── cs61a.md
//! └── 操作系统/
//!     └── mit6.s081.md
//! ```
//!
//! Directories below the subcategory level are ignored.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

use course_catalog_core::models::{Category, Course, Subcategory};
use course_catalog_core::slug::slugify;

use crate::config::Config;
use crate::pairing::resolve_pair;
use crate::scan::Scanner;

/// Walks `config.docs.root` and assembles the full category tree.
pub fn build_catalog(config: &Config) -> Result<Vec<Category>> {
    let scanner = Scanner::new(config)?;
    let top = scanner.list(scanner.root())?;
    for stray in &top.files {
        tracing::debug!(path = %stray.display(), "course file outside any category, skipping");
    }

    let mut category_slugs = SlugAllocator::default();
    let mut categories = Vec::with_capacity(top.dirs.len());

    for dir in &top.dirs {
        let name = dir_name(dir);
        let slug = category_slugs.allocate(slugify(&name, &config.slugs));
        let listing = scanner.list(dir)?;

        let courses = build_courses(&scanner, config, &listing.files, &slug, None);

        let mut sub_slugs = SlugAllocator::default();
        let mut subcategories = Vec::with_capacity(listing.dirs.len());
        for sub_dir in &listing.dirs {
            let sub_name = dir_name(sub_dir);
            let sub_slug = sub_slugs.allocate(slugify(&sub_name, &config.slugs));
            let sub_listing = scanner.list(sub_dir)?;
            for deeper in &sub_listing.dirs {
                tracing::debug!(path = %deeper.display(), "nested directory ignored");
            }

            let courses = build_courses(
                &scanner,
                config,
                &sub_listing.files,
                &slug,
                Some(sub_slug.as_str()),
            );
            subcategories.push(Subcategory {
                name: sub_name,
                slug: sub_slug,
                courses,
            });
        }

        categories.push(Category {
            name,
            slug,
            subcategories,
            courses,
        });
    }

    let course_count: usize = categories.iter().map(Category::course_count).sum();
    tracing::info!(
        root = %config.docs.root.display(),
        categories = categories.len(),
        courses = course_count,
        "catalog built"
    );

    Ok(categories)
}

fn build_courses(
    scanner: &Scanner,
    config: &Config,
    files: &[std::path::PathBuf],
    category_slug: &str,
    subcategory_slug: Option<&str>,
) -> Vec<Course> {
    let options = config.parse_options();
    let mut slugs = SlugAllocator::default();

    files
        .iter()
        .map(|path| {
            let file_name = dir_name(path);
            let stem = config.naming.stem(&file_name);
            let course_slug = slugs.allocate(slugify(stem, &config.slugs));

            let mut parts = vec![category_slug];
            parts.extend(subcategory_slug);
            parts.push(&course_slug);
            let id = parts.join(config.naming.id_separator.as_str());

            let paired = resolve_pair(path, &config.docs, &config.naming, &options);
            let meta = paired.meta;
            Course {
                id,
                title: meta.title,
                title_en: paired.title_en,
                content: meta.content,
                content_en: paired.content_en,
                summary: meta.summary,
                summary_en: meta.summary_en,
                description: meta.description,
                description_en: meta.description_en,
                programming_language: meta.programming_language,
                difficulty: meta.difficulty,
                duration: meta.duration,
                university: meta.university,
                prerequisites: meta.prerequisites,
                has_english_version: paired.has_english_version,
                category: category_slug.to_string(),
                subcategory: subcategory_slug.map(str::to_string),
                source_path: scanner.relative(path),
            }
        })
        .collect()
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Hands out unique slugs within one directory, suffixing repeats with
/// `-2`, `-3`, ...
#[derive(Default)]
struct SlugAllocator {
    seen: HashMap<String, usize>,
}

impl SlugAllocator {
    fn allocate(&mut self, slug: String) -> String {
        let count = self.seen.entry(slug.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            return slug;
        }
        let mut n = *count;
        loop {
            let candidate = format!("{}-{}", slug, n);
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(candidate.clone(), 1);
                return candidate;
            }
            n += 1;
        }
    }
}

pub fn find_course<'a>(categories: &'a [Category], id: &str) -> Option<&'a Course> {
    categories
        .iter()
        .flat_map(Category::all_courses)
        .find(|c| c.id == id)
}

pub fn find_category<'a>(categories: &'a [Category], slug: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.slug == slug)
}

/// CLI entry point: prints the category tree.
pub fn run_tree(config: &Config) -> Result<()> {
    let categories = build_catalog(config)?;
    if categories.is_empty() {
        println!("No categories found under {}", config.docs.root.display());
        return Ok(());
    }

    for category in &categories {
        println!(
            "{} [{}] ({} courses)",
            category.name,
            category.slug,
            category.course_count()
        );
        for course in &category.courses {
            print_course_line(course, "  ");
        }
        for sub in &category.subcategories {
            println!("  {} [{}]", sub.name, sub.slug);
            for course in &sub.courses {
                print_course_line(course, "    ");
            }
        }
    }
    Ok(())
}

fn print_course_line(course: &Course, indent: &str) {
    let en = if course.has_english_version { " [en]" } else { "" };
    println!("{}- {}  {}{}", indent, course.id, course.title, en);
}
