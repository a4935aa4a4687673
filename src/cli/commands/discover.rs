//! Implementation of the `smelter discover` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::services::{discover_paths, DEFAULT_EXTENSION};

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Directory to search
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Source file extension
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

#[derive(Debug, serde::Serialize)]
pub struct DiscoverOutput {
    pub root: PathBuf,
    pub extension: String,
    pub files: Vec<PathBuf>,
}

impl CommandOutput for DiscoverOutput {
    fn to_human(&self) -> String {
        if self.files.is_empty() {
            return format!("No .{} files found under {}", self.extension, self.root.display());
        }
        let mut lines: Vec<String> = self.files.iter().map(|f| f.display().to_string()).collect();
        lines.push(format!("\n{} file(s)", self.files.len()));
        lines.join("\n")
    }
}

pub fn execute(args: DiscoverArgs, json_mode: bool) -> Result<()> {
    let files = discover_paths(&args.dir, &args.extension);
    output(
        &DiscoverOutput {
            root: args.dir,
            extension: args.extension,
            files,
        },
        json_mode,
    );
    Ok(())
}
