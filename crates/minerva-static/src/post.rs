//! Posts produced by a build.

use std::path::Path;

use indexmap::IndexMap;
use minerva_mdx::{Metadata, TrustedHtml};

/// Post metadata keyed by slug, in the order the posts were built.
pub type PostIndex = IndexMap<String, Metadata>;

/// A rendered post.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Source file name without its extension
    pub slug: String,

    /// Front matter pairs
    pub metadata: Metadata,

    /// Rendered Markdown body
    pub rendered_html: TrustedHtml,
}

/// Derive a post slug from its source path.
pub fn slug_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
