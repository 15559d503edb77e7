//! # Course Catalog Core
//!
//! Filesystem-free logic for Course Catalog: course models, the markdown
//! metadata parser, slug generation, the search index and scorer, and
//! markdown page rendering.
//!
//! Nothing in this crate touches the filesystem, the network, or an async
//! runtime. The application crate walks the docs tree and hands raw file
//! text to [`metadata::parse_course_markdown`], then feeds the assembled
//! [`models::Category`] tree into [`index::build_index`].

pub mod index;
pub mod metadata;
pub mod models;
pub mod render;
pub mod search;
pub mod slug;
