//! Cravey CLI: restaurant listing enrichment.
//!
//! Runs the enrichment HTTP server, enriches CSV files locally, or sends
//! them to a remote server.

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
