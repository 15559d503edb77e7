//! # Course Catalog
//!
//! A bilingual course catalog built from a tree of markdown files.
//!
//! Chinese base files (`cs61b.md`) and optional English counterparts
//! (`cs61b.en.md`) are grouped by directory into categories and
//! subcategories. Metadata is read heuristically from each file's
//! introduction section and the result is served as a JSON API, printed by
//! the CLI, or exported for static sites.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌──────────────┐
//! │ docs tree  │──▶│  scan +   │──▶│   catalog    │
//! │ *.md/.en.md│   │  pairing  │   │  (Category)  │
//! └────────────┘   └───────────┘   └──────┬───────┘
//!                                         │
//!                      ┌──────────────────┼─────────────┐
//!                      ▼                  ▼             ▼
//!                ┌──────────┐      ┌────────────┐  ┌─────────┐
//!                │   CLI    │      │ IndexCache │  │ export  │
//!                │(catalog) │      │  + HTTP    │  │  JSON   │
//!                └──────────┘      └────────────┘  └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! catalog tree                          # print the category tree
//! catalog search "数据结构" --locale en  # ranked keyword search
//! catalog get data-structures-and-algorithms--cs61b --html
//! catalog serve                         # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`scan`] | One-level directory listing with filters |
//! | [`pairing`] | Base/counterpart lookup and merge |
//! | [`catalog`] | Category tree builder |
//! | [`get`] | Course lookup and page rendering |
//! | [`search`] | Index build and CLI search |
//! | [`stats`] | Catalog summary counts |
//! | [`export`] | JSON export for static sites |
//! | [`server`] | HTTP server |
//!
//! Parsing, scoring and rendering live in [`course_catalog_core`].

pub mod catalog;
pub mod config;
pub mod export;
pub mod get;
pub mod pairing;
pub mod scan;
pub mod search;
pub mod server;
pub mod stats;
