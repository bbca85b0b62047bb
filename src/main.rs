use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flickr2blog::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    flickr2blog::run(&cli).context("flickr2blog failed")
}
