//! Init command - write a starter uze.toml

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::manifest::UzeManifest;

/// Arguments for the init command
#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to the current directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Where to write the manifest
    #[arg(short, long, default_value = "uze.toml")]
    pub output: PathBuf,

    /// Overwrite an existing manifest
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let name = match args.name {
        Some(name) => name,
        None => std::env::current_dir()
            .ok()
            .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "uzebox-game".to_string()),
    };

    let manifest = UzeManifest::starter(&name);
    std::fs::write(&args.output, manifest.to_toml()?)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!("Created {:?} for project '{}'", args.output, name);
    Ok(())
}
