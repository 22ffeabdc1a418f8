//! Markdown front matter extraction and HTML rendering.
//!
//! Posts are CommonMark documents that open with a `---` block of `key: value`
//! lines. This crate reads that block and renders the document body to HTML.

pub mod frontmatter;
pub mod render;

pub use frontmatter::{extract_metadata, FrontmatterError, Metadata};
pub use render::{MarkdownRenderer, TrustedHtml};
