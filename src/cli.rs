use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Config;
use crate::diff::DiffRequest;

/// Compare two revisions of an Eagle board, schematic or library.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// File to diff from
    pub from: PathBuf,

    /// File to diff to
    pub to: PathBuf,

    /// Page to compare on multi-page schematics (default: every sheet)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,

    /// File to write the diff document into (default: temporary, previewed)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compare libraries semantically instead of line by line
    #[arg(short, long)]
    pub semantic: bool,

    /// Also write every page composite as a PNG into this directory
    #[arg(long)]
    pub pages_dir: Option<PathBuf>,

    /// TOML configuration overriding tool paths, DPI and layer groups
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn build_request(args: &Args) -> DiffRequest {
    DiffRequest {
        from: args.from.clone(),
        to: args.to.clone(),
        page: args.page,
        output: args.output.clone(),
        semantic: args.semantic,
        pages_dir: args.pages_dir.clone(),
    }
}

pub fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}
