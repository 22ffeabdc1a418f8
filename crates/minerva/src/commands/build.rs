//! Static site build command.

use std::path::Path;

use anyhow::{Context, Result};
use minerva_static::{BuildResult, SiteBuilder, SiteConfig};

use crate::commands::serve;

/// Load the configuration and create a builder for the blog in `folder`.
pub fn load_builder(folder: &Path, config_path: &Path) -> Result<SiteBuilder> {
    tracing::info!("Loading minerva config");
    let config = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    Ok(SiteBuilder::new(folder, config))
}

/// Run a build on the blocking thread pool.
pub async fn build_blocking(builder: SiteBuilder, clean: bool) -> Result<BuildResult> {
    tracing::info!(
        "Building with theme '{}' ({})",
        builder.config().theme(),
        builder.config().language()
    );

    let result = tokio::task::spawn_blocking(move || builder.build(clean)).await??;
    Ok(result)
}

/// Run the build command, then serve the output if a port is given.
pub async fn run(
    folder: &Path,
    config_path: &Path,
    clean: bool,
    serve_port: Option<u16>,
) -> Result<()> {
    let builder = load_builder(folder, config_path)?;

    let result = build_blocking(builder, clean).await?;

    tracing::info!("Built {} posts in {}ms", result.posts, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    if let Some(port) = serve_port {
        serve::run(port, result.output_dir).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fails_without_config() {
        let temp = tempfile::tempdir().unwrap();

        let err = run(temp.path(), &temp.path().join("settings.toml"), false, None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("settings.toml"));
    }

    #[tokio::test]
    async fn builds_blog_folder() {
        let temp = tempfile::tempdir().unwrap();
        crate::commands::init::run(temp.path(), false).await.unwrap();

        run(temp.path(), &temp.path().join("settings.toml"), true, None)
            .await
            .unwrap();

        assert!(temp.path().join("build/posts/hello.html").exists());
        assert!(temp.path().join("build/index.html").exists());
    }
}
