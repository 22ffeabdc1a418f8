//! Minerva CLI - simple static blog engine.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "minerva")]
#[command(about = "Simple static blog engine")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Blog folder
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Path to the config file (defaults to <folder>/settings.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static site into <folder>/build
    Build {
        /// Clean up the build directory before building
        #[arg(long)]
        clean: bool,

        /// Serve the static site on localhost after building
        #[arg(long)]
        serve: bool,

        /// Port to serve on
        #[arg(long, default_value = "8000")]
        serve_port: u16,
    },

    /// Index the built site with pagefind
    #[command(disable_version_flag = true)]
    Pagefind {
        /// Re-build the site before indexing
        #[arg(long)]
        build: bool,

        /// Display the pagefind version
        #[arg(long = "version")]
        show_version: bool,

        /// Force download of the pagefind binary
        #[arg(long)]
        update: bool,

        /// Clean up the build directory before building
        #[arg(long)]
        clean: bool,

        /// Serve the indexed site with pagefind
        #[arg(long)]
        serve: bool,
    },

    /// Create a starter blog in the blog folder
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let folder = cli.folder.unwrap_or_else(|| PathBuf::from("."));
    let config = cli.config.unwrap_or_else(|| folder.join("settings.toml"));

    // Execute command
    match cli.command {
        Commands::Build {
            clean,
            serve,
            serve_port,
        } => {
            let port = serve.then_some(serve_port);
            commands::build::run(&folder, &config, clean, port).await?;
        }
        Commands::Pagefind {
            build,
            show_version,
            update,
            clean,
            serve,
        } => {
            let options = commands::pagefind::PagefindOptions {
                build,
                version: show_version,
                update,
                clean,
                serve,
            };
            commands::pagefind::run(&folder, &config, options).await?;
        }
        Commands::Init { yes } => {
            commands::init::run(&folder, yes).await?;
        }
    }

    Ok(())
}
