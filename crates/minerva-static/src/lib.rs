//! Static blog builder for minerva.
//!
//! Builds a deployable site from Markdown posts and a theme of minijinja
//! templates: rendered posts, index, list, 404 and optional search pages,
//! theme assets and post attachments.

pub mod builder;
pub mod config;
pub mod error;
pub mod post;
pub mod search;
pub mod stage;
pub mod templates;

pub use builder::{BuildResult, SiteBuilder, OUTPUT_DIR};
pub use config::SiteConfig;
pub use error::BuildError;
pub use post::{Post, PostIndex};
pub use search::{Pagefind, SearchFlag, SearchIndexer, PAGEFIND_BINARY, PAGEFIND_URL};
pub use stage::OutputTree;
pub use templates::{Page, TemplateDefaults, TemplateKind, TemplateSet};
