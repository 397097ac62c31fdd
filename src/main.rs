//! Alchemer tap CLI
//!
//! Command-line interface for syncing Alchemer surveys

use alchemer_tap::cli::{Cli, Runner};
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Stdout carries the record stream, so logs go to stderr
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        error!("Error: {e}");
        std::process::exit(1);
    }
}
