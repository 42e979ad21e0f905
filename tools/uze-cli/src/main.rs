//! uze - Uzebox patch source tool
//!
//! # Commands
//!
//! - `uze init` - Create a new uze.toml manifest
//! - `uze check` - Parse every source listed in uze.toml
//! - `uze inspect` - Print the patches and instrument structs of a source file
//! - `uze waves` - Re-export a wave file (or the built-in waves) in canonical form
//!
//! # Manifest (uze.toml)
//!
//! ```toml
//! [project]
//! name = "my-game"
//!
//! [sources]
//! patches = ["data/patches.inc"]
//! waves = "data/waves.inc"
//!
//! [waves]
//! max_tables = 32
//! ```

mod check;
mod init;
mod inspect;
mod manifest;
mod waves;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// uze - Uzebox patch source tool
#[derive(Parser)]
#[command(name = "uze")]
#[command(about = "Inspect and convert Uzebox patch and wave sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new uze.toml manifest
    Init(init::InitArgs),

    /// Parse every source listed in uze.toml
    Check(check::CheckArgs),

    /// Print patches and structs from a source file
    Inspect(inspect::InspectArgs),

    /// Re-export wave tables in canonical .byte form
    Waves(waves::WavesArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
        Commands::Waves(args) => waves::execute(args),
    }
}
