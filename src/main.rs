//! Scenecast CLI - Text to Animation Generator
//!
//! Command-line interface for generating and previewing animated scenes.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scenecast::cli::{commands, Cli};
use scenecast::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --verbose wins over RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Scenecast v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    // One event loop, matching the cooperative model of the library
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    let outcome = runtime.block_on(commands::run(cli.command, &config));
    if let Err(e) = &outcome {
        for hint in commands::error_hints(e) {
            eprintln!("  hint: {}", hint);
        }
    }
    outcome
}
