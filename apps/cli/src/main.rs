//! toolcatalog CLI: build and refresh a JSON catalog of software tools.
//!
//! Merges a curated input list into an existing catalog, optionally
//! enriching each tool from its public web pages.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
