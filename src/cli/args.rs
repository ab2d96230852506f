//! Command-line interface definitions.

use crate::link::UrlStyle;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Strand reference-linked site builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Manifest file path (default: strand.toml)
    #[arg(short = 'C', long, default_value = "strand.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site into the output directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Validate the manifest and report what a build would write
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

/// Shared arguments for Build and Check commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Also write a gzip tarball of the output to this path
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub archive: Option<PathBuf>,

    /// How pages link to other resources (root, relative)
    #[arg(short, long, value_parser = parse_url_style)]
    pub urls: Option<UrlStyle>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

fn parse_url_style(s: &str) -> Result<UrlStyle, String> {
    match s.to_ascii_lowercase().as_str() {
        "root" => Ok(UrlStyle::Root),
        "relative" => Ok(UrlStyle::Relative),
        other => Err(format!("unknown url style `{other}` (expected root or relative)")),
    }
}
