//! External search indexer (Pagefind).
//!
//! Indexing runs out of process. The builder only guarantees that the output
//! tree exists and holds a `search.html` placeholder before the indexer runs.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Pagefind release binary name.
#[cfg(windows)]
pub const PAGEFIND_BINARY: &str = "pagefind_extended.exe";
#[cfg(not(windows))]
pub const PAGEFIND_BINARY: &str = "pagefind_extended";

/// Pagefind release archive for the host platform.
#[cfg(windows)]
pub const PAGEFIND_URL: &str = "https://github.com/CloudCannon/pagefind/releases/download/v1.1.0/pagefind_extended-v1.1.0-x86_64-pc-windows-msvc.tar.gz";
#[cfg(not(windows))]
pub const PAGEFIND_URL: &str = "https://github.com/CloudCannon/pagefind/releases/download/v1.1.0/pagefind_extended-v1.1.0-x86_64-unknown-linux-musl.tar.gz";

/// Optional indexer behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFlag {
    /// Print the indexer version
    Version,
    /// Serve the site after indexing
    Serve,
}

/// A search indexer run against a built site.
pub trait SearchIndexer {
    /// Run `binary` over `site_dir` and wait for it to exit.
    fn invoke(&self, binary: &Path, site_dir: &Path, flags: &[SearchFlag])
        -> io::Result<ExitStatus>;
}

/// Runs the Pagefind command line tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagefind;

impl Pagefind {
    /// Command line arguments for one indexer run.
    pub fn arguments(site_dir: &Path, flags: &[SearchFlag]) -> Vec<OsString> {
        let mut args = vec![OsString::from("--site"), site_dir.as_os_str().to_owned()];
        for flag in flags {
            args.push(OsString::from(match flag {
                SearchFlag::Version => "--version",
                SearchFlag::Serve => "--serve",
            }));
        }
        args
    }
}

impl SearchIndexer for Pagefind {
    fn invoke(
        &self,
        binary: &Path,
        site_dir: &Path,
        flags: &[SearchFlag],
    ) -> io::Result<ExitStatus> {
        tracing::info!("Running {} on {}", binary.display(), site_dir.display());
        Command::new(binary)
            .args(Self::arguments(site_dir, flags))
            .status()
    }
}
