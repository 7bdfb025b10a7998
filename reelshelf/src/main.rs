//! `reelshelf`: browse the remote catalog or page through a local library.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reelshelf_config::CatalogConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{BrowseArgs, LibraryArgs};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "reelshelf", version)]
#[command(about = "Browse the remote catalog and page through your local library")]
struct Cli {
    /// Configuration file (TOML or JSON); skips config discovery
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a remote catalog listing page by page
    Browse(BrowseArgs),
    /// Load a JSON library and drive the windowed pager with scroll positions
    Library(LibraryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reelshelf_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (config, source) = match cli.config.as_deref() {
        Some(path) => CatalogConfig::load_from_path(path),
        None => CatalogConfig::load_from_env(),
    }
    .context("failed to load configuration")?;
    info!(%source, base_url = %config.remote.base_url, "starting reelshelf");

    match cli.command {
        Command::Browse(args) => commands::browse::run(&config, args).await,
        Command::Library(args) => commands::library::run(&config, args).await,
    }
}
