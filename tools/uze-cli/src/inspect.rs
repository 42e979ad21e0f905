//! Inspect command - print the contents of a patch source file

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use uze_patch::{Opcode, SourceData};

/// Arguments for the inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Patch source file (.inc/.c/.h)
    pub input: PathBuf,

    /// Print JSON instead of a listing
    #[arg(long)]
    pub json: bool,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    let data = uze_patch::read_patches_and_structs(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print!("{}", render_listing(&data));
    }
    Ok(())
}

/// Human-readable listing of patches (one command per line) and structs
fn render_listing(data: &SourceData) -> String {
    let mut out = String::new();

    for patch in &data.patches {
        out.push_str(&format!("patch {} ({} values)\n", patch.name, patch.values.len()));
        for cmd in patch.commands() {
            let name = cmd
                .kind()
                .map(Opcode::name)
                .map(str::to_string)
                .unwrap_or_else(|| cmd.opcode.to_string());
            out.push_str(&format!("  {:>4}  {:<14}{}\n", cmd.delay, name, cmd.param));
        }
    }

    for record in &data.structs {
        out.push_str(&format!("struct {} ({} fields)\n", record.name, record.fields.len()));
        for entry in record.entries() {
            out.push_str(&format!(
                "  {:<6}{:<12}{:<12}{}..{}\n",
                entry.kind.label(),
                entry.pcm,
                entry.patch,
                entry.loop_start,
                entry.loop_end
            ));
        }
    }

    out
}
