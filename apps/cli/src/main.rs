//! footernotes CLI (`cft`): turn inline citations into managed footnotes.
//!
//! Rewrites `([Title](URL))` citations in Markdown files into `[^domain-n]`
//! references collected in a footnotes block at the end of the document.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
