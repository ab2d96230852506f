//! Strand - builds a site from declared resources, writing only what is referenced.

mod cli;
mod config;
mod link;
mod logger;
mod page;
mod stage;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Manifest;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let manifest = Manifest::load(&cli)?;

    let result = match &cli.command {
        Commands::Build { .. } => cli::build::build_site(&manifest, false).map(|_| ()),
        Commands::Check { .. } => cli::check::check_site(&manifest).map(|_| ()),
    };

    if let Err(err) = &result
        && let Some(hint) = cli::link_hint(err)
    {
        log!("hint"; "{}", hint);
    }
    result
}
