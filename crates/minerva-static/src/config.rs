//! Site configuration (`settings.toml`).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::BuildError;

/// Display strings for one language.
pub type LanguageMetadata = BTreeMap<String, String>;

/// Configuration file structure.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    settings: toml::Table,
}

/// Keys of the `[settings]` table the builder itself reads.
#[derive(Debug, Deserialize)]
struct KnownSettings {
    theme: String,
    language: String,
    metadata: BTreeMap<String, LanguageMetadata>,
    #[serde(default)]
    pagefind: bool,
}

/// Read-only site configuration, loaded once per build.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    theme: String,
    language: String,
    active_metadata: LanguageMetadata,
    enable_search_index: bool,
    settings: toml::Table,
}

impl SiteConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let content = fs::read_to_string(path).map_err(|e| {
            BuildError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// The active language must be one of the `metadata` keys.
    pub fn from_toml_str(content: &str) -> Result<Self, BuildError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| BuildError::Configuration(format!("Failed to parse config: {}", e)))?;

        let mut known: KnownSettings = toml::Value::Table(file.settings.clone())
            .try_into()
            .map_err(|e| BuildError::Configuration(format!("Invalid [settings]: {}", e)))?;

        if known.theme.trim().is_empty() {
            return Err(BuildError::Configuration(
                "settings.theme must not be empty".to_string(),
            ));
        }

        let active_metadata = known
            .metadata
            .remove(&known.language)
            .ok_or_else(|| {
                BuildError::Configuration(format!(
                    "Unknown language '{}': no [settings.metadata.{}] table",
                    known.language, known.language
                ))
            })?;

        Ok(Self {
            theme: known.theme,
            language: known.language,
            active_metadata,
            enable_search_index: known.pagefind,
            settings: file.settings,
        })
    }

    /// Name of the active theme directory under `themes/`.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Display strings of the active language.
    pub fn metadata(&self) -> &LanguageMetadata {
        &self.active_metadata
    }

    /// Whether a search page is rendered for the external indexer.
    pub fn enable_search_index(&self) -> bool {
        self.enable_search_index
    }

    /// The whole `[settings]` table, unknown keys included.
    pub fn settings(&self) -> &toml::Table {
        &self.settings
    }
}
