//! Search indexing with pagefind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use minerva_static::stage::write_ignore_marker;
use minerva_static::{
    Pagefind, SearchFlag, SearchIndexer, OUTPUT_DIR, PAGEFIND_BINARY, PAGEFIND_URL,
};

use crate::commands::build::{build_blocking, load_builder};

/// Flags of the pagefind command.
#[derive(Debug, Clone, Copy, Default)]
pub struct PagefindOptions {
    pub build: bool,
    pub version: bool,
    pub update: bool,
    pub clean: bool,
    pub serve: bool,
}

impl PagefindOptions {
    fn flags(&self) -> Vec<SearchFlag> {
        let mut flags = Vec::new();
        if self.version {
            flags.push(SearchFlag::Version);
        }
        if self.serve {
            flags.push(SearchFlag::Serve);
        }
        flags
    }
}

/// Run the pagefind command.
pub async fn run(folder: &Path, config_path: &Path, options: PagefindOptions) -> Result<()> {
    let binary = ensure_binary(&folder.join("tools"), options.update).await?;

    if options.build {
        build_blocking(load_builder(folder, config_path)?, options.clean).await?;
    }

    let site_dir = folder.join(OUTPUT_DIR);
    let flags = options.flags();
    let status = tokio::task::spawn_blocking(move || Pagefind.invoke(&binary, &site_dir, &flags))
        .await?
        .context("Failed to run pagefind")?;

    if !status.success() {
        anyhow::bail!("pagefind exited with {}", status);
    }

    Ok(())
}

/// Make sure the pagefind binary is present in `tools_dir`, downloading it if needed.
pub async fn ensure_binary(tools_dir: &Path, force: bool) -> Result<PathBuf> {
    fs::create_dir_all(tools_dir)
        .with_context(|| format!("Failed to create {}", tools_dir.display()))?;
    write_ignore_marker(tools_dir)
        .with_context(|| format!("Failed to write ignore marker in {}", tools_dir.display()))?;

    let binary = tools_dir.join(PAGEFIND_BINARY);
    if !force && binary.exists() {
        tracing::info!("Pagefind binary found");
        return Ok(binary);
    }

    tracing::info!("Pagefind binary not found");
    tracing::info!("Downloading pagefind from {}", PAGEFIND_URL);
    let archive = reqwest::get(PAGEFIND_URL)
        .await
        .and_then(|response| response.error_for_status())
        .context("Failed to download pagefind")?
        .bytes()
        .await
        .context("Failed to download pagefind")?;

    tracing::info!("Extracting pagefind into {}", tools_dir.display());
    unpack_archive(&archive, tools_dir)?;

    if !binary.exists() {
        anyhow::bail!("Pagefind archive did not contain {}", PAGEFIND_BINARY);
    }

    Ok(binary)
}

/// Unpack a `.tar.gz` archive into `dest`.
fn unpack_archive(archive: &[u8], dest: &Path) -> Result<()> {
    tar::Archive::new(GzDecoder::new(archive))
        .unpack(dest)
        .with_context(|| format!("Failed to extract pagefind archive into {}", dest.display()))
}
