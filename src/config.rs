//! TOML configuration for the catalog.
//!
//! Every section has defaults, so a config file only needs the keys it
//! wants to change. [`load_config`] parses and validates; tests build an
//! in-memory config with [`Config::for_root`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use course_catalog_core::metadata::{ParseOptions, DEFAULT_SUMMARY_MAX_CHARS};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory name → slug overrides, checked before the built-in table.
    #[serde(default)]
    pub slugs: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocsConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Optional parallel tree holding English counterparts at the same
    /// relative paths.
    #[serde(default)]
    pub en_root: Option<PathBuf>,
    #[serde(default = "default_reserved_dirs")]
    pub reserved_dirs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            en_root: None,
            reserved_dirs: default_reserved_dirs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./docs")
}
fn default_reserved_dirs() -> Vec<String> {
    vec!["images".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct NamingConfig {
    #[serde(default = "default_base_extension")]
    pub base_extension: String,
    #[serde(default = "default_counterpart_suffix")]
    pub counterpart_suffix: String,
    #[serde(default = "default_id_separator")]
    pub id_separator: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            base_extension: default_base_extension(),
            counterpart_suffix: default_counterpart_suffix(),
            id_separator: default_id_separator(),
        }
    }
}

impl NamingConfig {
    /// True for files that are base course files: the base extension but
    /// not the counterpart suffix.
    pub fn is_base_file(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.base_extension) && !file_name.ends_with(&self.counterpart_suffix)
    }

    /// File name without the base extension.
    pub fn stem<'a>(&self, file_name: &'a str) -> &'a str {
        file_name
            .strip_suffix(self.base_extension.as_str())
            .unwrap_or(file_name)
    }

    /// Sibling counterpart name for a base file name.
    pub fn counterpart_name(&self, file_name: &str) -> String {
        format!("{}{}", self.stem(file_name), self.counterpart_suffix)
    }
}

fn default_base_extension() -> String {
    ".md".to_string()
}
fn default_counterpart_suffix() -> String {
    ".en.md".to_string()
}
fn default_id_separator() -> String {
    "--".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummaryConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    DEFAULT_SUMMARY_MAX_CHARS
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl SearchConfig {
    /// Requested page size, defaulted and clamped to `[1, max_limit]`.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

fn default_limit() -> usize {
    10
}
fn default_max_limit() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Config {
    /// Default configuration pointed at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            docs: DocsConfig {
                root: root.into(),
                ..DocsConfig::default()
            },
            naming: NamingConfig::default(),
            summary: SummaryConfig::default(),
            search: SearchConfig::default(),
            server: ServerConfig::default(),
            slugs: HashMap::new(),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            summary_max_chars: self.summary.max_chars,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.summary.max_chars == 0 {
        bail!("summary.max_chars must be > 0");
    }

    if config.search.default_limit < 1 {
        bail!("search.default_limit must be >= 1");
    }
    if config.search.default_limit > config.search.max_limit {
        bail!(
            "search.default_limit ({}) must not exceed search.max_limit ({})",
            config.search.default_limit,
            config.search.max_limit
        );
    }

    let naming = &config.naming;
    if naming.base_extension.is_empty() || !naming.base_extension.starts_with('.') {
        bail!(
            "naming.base_extension must start with '.', got '{}'",
            naming.base_extension
        );
    }
    if !naming.counterpart_suffix.ends_with(&naming.base_extension)
        || naming.counterpart_suffix == naming.base_extension
    {
        bail!(
            "naming.counterpart_suffix '{}' must end with '{}' and differ from it",
            naming.counterpart_suffix,
            naming.base_extension
        );
    }
    if naming.id_separator.is_empty() {
        bail!("naming.id_separator must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load_str(toml: &str) -> Result<Config> {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.toml");
        std::fs::write(&path, toml).unwrap();
        load_config(&path)
    }

    #[test]
    fn empty_file_gets_defaults() {
        let cfg = load_str("").unwrap();
        assert_eq!(cfg.docs.root, PathBuf::from("./docs"));
        assert_eq!(cfg.docs.reserved_dirs, vec!["images"]);
        assert_eq!(cfg.naming.counterpart_suffix, ".en.md");
        assert_eq!(cfg.naming.id_separator, "--");
        assert_eq!(cfg.summary.max_chars, 150);
        assert_eq!(cfg.search.default_limit, 10);
        assert_eq!(cfg.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn slug_table_and_en_root() {
        let cfg = load_str(
            r#"
[docs]
root = "/srv/docs"
en_root = "/srv/docs-en"

[slugs]
"量子计算" = "quantum"
"#,
        )
        .unwrap();
        assert_eq!(cfg.docs.en_root, Some(PathBuf::from("/srv/docs-en")));
        assert_eq!(cfg.slugs.get("量子计算").map(String::as_str), Some("quantum"));
    }

    #[test]
    fn rejects_bad_values() {
        let err = load_str("[summary]\nmax_chars = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_chars"));

        let err = load_str("[search]\ndefault_limit = 50\nmax_limit = 20\n").unwrap_err();
        assert!(err.to_string().contains("default_limit"));

        let err = load_str("[naming]\ncounterpart_suffix = \".md\"\n").unwrap_err();
        assert!(err.to_string().contains("counterpart_suffix"));

        let err = load_str("[naming]\nbase_extension = \"md\"\n").unwrap_err();
        assert!(err.to_string().contains("base_extension"));

        let err = load_str("[naming]\nid_separator = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("id_separator"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.toml"));
    }

    #[test]
    fn naming_helpers() {
        let naming = NamingConfig::default();
        assert!(naming.is_base_file("cs61b.md"));
        assert!(!naming.is_base_file("cs61b.en.md"));
        assert!(!naming.is_base_file("notes.txt"));
        assert_eq!(naming.stem("cs61b.md"), "cs61b");
        assert_eq!(naming.counterpart_name("cs61b.md"), "cs61b.en.md");
    }

    #[test]
    fn limit_is_clamped() {
        let search = SearchConfig::default();
        assert_eq!(search.effective_limit(None), 10);
        assert_eq!(search.effective_limit(Some(0)), 1);
        assert_eq!(search.effective_limit(Some(1000)), 100);
    }
}
