//! Output tree staging: directory lifecycle, theme assets and post data.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BuildError;

/// Name of the tracking-exclusion marker written into generated directories.
pub const IGNORE_MARKER: &str = ".gitignore";

/// The on-disk build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTree {
    root: PathBuf,
}

impl OutputTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one `<slug>.html` per post.
    pub fn posts_dir(&self) -> PathBuf {
        self.root.join("posts")
    }

    /// Post attachments copied from the source `posts/data`.
    pub fn data_dir(&self) -> PathBuf {
        self.posts_dir().join("data")
    }

    /// Copy of the theme asset directory.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    /// Path of a top-level page such as `index.html`.
    pub fn page(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Path of a rendered post.
    pub fn post(&self, slug: &str) -> PathBuf {
        self.posts_dir().join(format!("{}.html", slug))
    }
}

/// Prepare the output tree for a build.
///
/// With `clean`, any existing tree is removed first. Existing directories are
/// reused otherwise. Theme assets are merged into `assets/`.
pub fn prepare(
    target_root: &Path,
    theme_assets: &Path,
    clean: bool,
) -> Result<OutputTree, BuildError> {
    let tree = OutputTree::new(target_root);

    if clean {
        tracing::info!("Cleaning existing output folder at {}", target_root.display());
        if let Err(e) = fs::remove_dir_all(target_root) {
            tracing::debug!("Nothing removed at {}: {}", target_root.display(), e);
        }
    }

    tracing::info!("Creating output folder at {}", target_root.display());
    fs::create_dir_all(tree.posts_dir()).map_err(|e| BuildError::write(tree.posts_dir(), e))?;
    write_ignore_marker(target_root).map_err(|e| BuildError::write(target_root, e))?;

    let copied = copy_dir_merge(theme_assets, &tree.assets_dir())?;
    tracing::debug!("Copied {} theme assets from {}", copied, theme_assets.display());

    Ok(tree)
}

/// Copy `<source_root>/posts/data` into the output tree.
///
/// Returns `false` when the source has no post data; that is not an error.
pub fn stage_post_data(source_root: &Path, tree: &OutputTree) -> Result<bool, BuildError> {
    tracing::info!("Building posts/data assets");

    let data_dir = source_root.join("posts").join("data");
    if !data_dir.is_dir() {
        tracing::warn!("No posts/data folder found at {}", data_dir.display());
        return Ok(false);
    }

    let copied = copy_dir_merge(&data_dir, &tree.data_dir())?;
    tracing::debug!("Copied {} post data files", copied);
    Ok(true)
}

/// Recursively copy `from` into `to`.
///
/// Files already present at the destination are overwritten; files that only
/// exist at the destination are left alone. Returns the number of files copied.
pub fn copy_dir_merge(from: &Path, to: &Path) -> Result<usize, BuildError> {
    if !from.is_dir() {
        return Err(BuildError::asset_io(
            from,
            io::Error::new(io::ErrorKind::NotFound, "source directory not found"),
        ));
    }

    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            BuildError::asset_io(path, e.into())
        })?;

        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::asset_io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| BuildError::asset_io(entry.path(), e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Write a `.gitignore` ignoring everything in `dir`.
pub fn write_ignore_marker(dir: &Path) -> io::Result<()> {
    fs::write(dir.join(IGNORE_MARKER), "*")
}
