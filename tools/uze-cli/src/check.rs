//! Check command - parse every source listed in uze.toml
//!
//! Patch sources must parse cleanly; a wave file must yield at least one
//! table.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::manifest::UzeManifest;

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// Path to uze.toml manifest
    #[arg(default_value = "uze.toml")]
    pub manifest: PathBuf,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    tracing::info!("Checking manifest {:?}", args.manifest);
    let manifest = UzeManifest::load(&args.manifest)?;
    manifest.validate()?;

    let base = args
        .manifest
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();

    for path in manifest.patch_paths(&base) {
        let data = uze_patch::read_patches_and_structs(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        println!(
            "{}: {} patches, {} structs",
            path.display(),
            data.patches.len(),
            data.structs.len()
        );
    }

    if let Some(path) = manifest.wave_path(&base) {
        let tables = uze_patch::read_waves(&path, manifest.waves.max_tables);
        if tables.is_empty() {
            anyhow::bail!("No wave data loaded from {}", path.display());
        }
        println!("{}: {} waves", path.display(), tables.len());
    }

    tracing::info!("Project '{}' is valid!", manifest.project.name);
    Ok(())
}
