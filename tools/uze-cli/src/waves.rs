//! Waves command - re-export wave tables in canonical .byte form

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the waves command
#[derive(Args)]
pub struct WavesArgs {
    /// Input wave file
    #[arg(required_unless_present = "builtin")]
    pub input: Option<PathBuf>,

    /// Output file (default: input with .export.inc extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of tables to read
    #[arg(long, default_value_t = uze_patch::MAX_WAVES)]
    pub max: usize,

    /// Export the built-in kernel waves instead of reading a file
    #[arg(long, conflicts_with = "input", requires = "output")]
    pub builtin: bool,
}

/// Execute the waves command
pub fn execute(args: WavesArgs) -> Result<()> {
    if args.builtin {
        let output = args
            .output
            .context("--builtin needs an output file (-o)")?;
        uze_patch::write_waves(&output, &uze_patch::builtin_waves())?;
        println!("{}: {} waves", output.display(), uze_patch::DEFAULT_NUM_WAVES);
        return Ok(());
    }

    let input = args.input.context("No input wave file given")?;
    if args.max == 0 || args.max > uze_patch::MAX_WAVES {
        anyhow::bail!("--max must be 1-{}", uze_patch::MAX_WAVES);
    }

    let tables = uze_patch::read_waves(&input, args.max);
    if tables.is_empty() {
        anyhow::bail!("No wave data loaded from {}", input.display());
    }

    let output = args
        .output
        .unwrap_or_else(|| input.with_extension("export.inc"));
    uze_patch::write_waves(&output, &tables)?;

    println!("{}: {} waves", output.display(), tables.len());
    Ok(())
}
