//! `inkticker`: refresh the price dashboard once.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dashboard::{Config, RunOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inkticker")]
#[command(about = "Stock and crypto price dashboard for Inky e-paper boards", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    /// Save the image but do not push it to the board
    #[arg(long)]
    no_display: bool,
    /// Save the image here instead of `outputs.local`
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.main.loglevel.to_ascii_lowercase()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(config = %cli.config.display(), "starting inkticker");

    let options = RunOptions {
        no_display: cli.no_display,
        output: cli.output,
    };
    dashboard::app::run(config, &options)
        .await
        .context("refreshing dashboard")?;
    Ok(())
}
