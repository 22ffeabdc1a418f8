//! Errors raised while building a site.

use std::io;
use std::path::PathBuf;

/// Errors that can occur during build.
///
/// Every variant is fatal: the build stops at the first one and output that
/// was already written stays on disk.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing metadata for post {}", path.display())]
    MissingMetadata { path: PathBuf },

    #[error("Malformed metadata in post {}: {line:?} is not a `key: value` pair", path.display())]
    MalformedMetadata { path: PathBuf, line: String },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Failed to render template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to copy assets at {}: {source}", path.display())]
    AssetIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub(crate) fn asset_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::AssetIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
