//! Directory listing for the docs tree.
//!
//! The catalog only ever looks one level into a directory at a time, so
//! [`Scanner::list`] walks with `min_depth(1)`/`max_depth(1)` and sorts by
//! file name. Hidden entries, reserved directory names, and paths matching
//! `docs.exclude_globs` (relative to the docs root) are dropped here so the
//! builder never sees them.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Config, NamingConfig};

/// Subdirectories and base course files found directly inside a directory.
#[derive(Debug, Default)]
pub struct Listing {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

pub struct Scanner {
    root: PathBuf,
    reserved: Vec<String>,
    excludes: GlobSet,
    naming: NamingConfig,
}

impl Scanner {
    /// Fails when the docs root is missing or an exclude glob is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        let root = config.docs.root.clone();
        if !root.is_dir() {
            bail!("Docs root does not exist: {}", root.display());
        }

        Ok(Self {
            root,
            reserved: config.docs.reserved_dirs.clone(),
            excludes: build_globset(&config.docs.exclude_globs)?,
            naming: config.naming.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists `dir` one level deep. Any I/O error aborts with the offending
    /// path in the context.
    pub fn list(&self, dir: &Path) -> Result<Listing> {
        let mut listing = Listing::default();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            if self.excludes.is_match(self.relative(path)) {
                tracing::debug!(path = %path.display(), "excluded by glob");
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if self.reserved.iter().any(|r| r.as_str() == name) {
                    continue;
                }
                listing.dirs.push(path.to_path_buf());
            } else if file_type.is_file() && self.naming.is_base_file(&name) {
                listing.files.push(path.to_path_buf());
            }
        }

        Ok(listing)
    }

    /// `path` relative to the docs root, `/`-separated.
    pub fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern).with_context(|| format!("Invalid exclude glob: {}", pattern))?,
        );
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn lists_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("b-dir")).unwrap();
        fs::create_dir_all(root.join("a-dir")).unwrap();
        fs::create_dir_all(root.join("images")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("z.md"), "# Z").unwrap();
        fs::write(root.join("a.md"), "# A").unwrap();
        fs::write(root.join("a.en.md"), "# A").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        fs::write(root.join(".hidden.md"), "x").unwrap();

        let scanner = Scanner::new(&Config::for_root(root)).unwrap();
        let listing = scanner.list(root).unwrap();
        assert_eq!(file_names(&listing.dirs), vec!["a-dir", "b-dir"]);
        assert_eq!(file_names(&listing.files), vec!["a.md", "z.md"]);
    }

    #[test]
    fn exclude_globs_apply_to_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("cat")).unwrap();
        fs::write(root.join("cat/keep.md"), "# K").unwrap();
        fs::write(root.join("cat/README.md"), "# R").unwrap();

        let mut cfg = Config::for_root(root);
        cfg.docs.exclude_globs = vec!["**/README.md".to_string()];
        let scanner = Scanner::new(&cfg).unwrap();
        let listing = scanner.list(&root.join("cat")).unwrap();
        assert_eq!(file_names(&listing.files), vec!["keep.md"]);
        assert_eq!(scanner.relative(&root.join("cat/keep.md")), "cat/keep.md");
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::for_root(tmp.path().join("nope"));
        let err = Scanner::new(&cfg).err().unwrap();
        assert!(err.to_string().contains("does not exist"));
    }
}
