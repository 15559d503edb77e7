//! URL slugs for category, subcategory, and course names.
//!
//! Directory names are usually Chinese, so a lookup table maps the common
//! ones to readable English slugs. Names missing from both the caller's
//! table and the built-in one fall back to lowercase hyphenation, which
//! keeps non-ASCII letters intact.

use std::collections::HashMap;

/// Built-in name → slug pairs for the category names the docs tree has
/// historically used.
pub const BUILTIN_SLUGS: &[(&str, &str)] = &[
    ("编程入门", "programming-intro"),
    ("电子基础", "electronics-basics"),
    ("数学基础", "math-basics"),
    ("数学进阶", "math-advanced"),
    ("编程语言", "programming-languages"),
    ("系统开发工具", "dev-tools"),
    ("体系结构", "computer-architecture"),
    ("数据结构与算法", "data-structures-and-algorithms"),
    ("软件工程", "software-engineering"),
    ("操作系统", "operating-systems"),
    ("并行与分布式系统", "parallel-and-distributed-systems"),
    ("系统安全", "system-security"),
    ("计算机网络", "computer-networks"),
    ("数据库系统", "database-systems"),
    ("编译原理", "compilers"),
    ("计算机图形学", "computer-graphics"),
    ("Web开发", "web-development"),
    ("数据科学", "data-science"),
    ("人工智能", "artificial-intelligence"),
    ("机器学习", "machine-learning"),
    ("机器学习系统", "machine-learning-systems"),
    ("深度学习", "deep-learning"),
    ("深度生成模型", "deep-generative-models"),
    ("机器学习进阶", "advanced-machine-learning"),
];

/// Slug for `name`: `table` first, then [`BUILTIN_SLUGS`], then
/// [`hyphenate`].
pub fn slugify(name: &str, table: &HashMap<String, String>) -> String {
    let name = name.trim();
    if let Some(slug) = table.get(name) {
        return slug.clone();
    }
    if let Some((_, slug)) = BUILTIN_SLUGS.iter().find(|(n, _)| *n == name) {
        return slug.to_string();
    }
    hyphenate(name)
}

/// Lowercases `name`, keeps alphanumeric characters (any script), and
/// collapses every other run of characters into a single `-`.
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    let slug = out.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_table_overrides_builtin() {
        let mut table = HashMap::new();
        table.insert("操作系统".to_string(), "os".to_string());
        assert_eq!(slugify("操作系统", &table), "os");
        assert_eq!(slugify("操作系统", &HashMap::new()), "operating-systems");
    }

    #[test]
    fn fallback_hyphenates() {
        let table = HashMap::new();
        assert_eq!(slugify("CS61B: Data Structures", &table), "cs61b-data-structures");
        assert_eq!(slugify("  MIT 6.S081  ", &table), "mit-6-s081");
        assert_eq!(slugify("量子计算", &table), "量子计算");
    }

    #[test]
    fn empty_names_get_placeholder() {
        assert_eq!(hyphenate("---"), "untitled");
        assert_eq!(hyphenate(""), "untitled");
    }
}
