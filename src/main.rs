mod auth;
mod cli;
mod config;
mod context;
mod error;
mod output;
mod providers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use env_logger::{Env, Target};
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Progress lines belong on stdout next to the rest of the CI job log.
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting ciprune - superseded pipeline cleanup");
    cli.execute().await?;

    Ok(())
}
