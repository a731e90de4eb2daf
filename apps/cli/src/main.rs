//! coursemigrate CLI: move exported LMS wiki pages into the course website.
//!
//! Extracts each mapped page's body content, strips lecture-recording
//! artifacts and re-renders it with the site template.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
