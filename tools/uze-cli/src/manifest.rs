//! uze.toml manifest parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// uze.toml manifest structure
#[derive(Debug, Serialize, Deserialize)]
pub struct UzeManifest {
    pub project: ProjectSection,
    #[serde(default)]
    pub sources: SourcesSection,
    #[serde(default)]
    pub waves: WavesSection,
}

/// Project metadata section
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectSection {
    pub name: String,
}

/// Source files to process, relative to the manifest's directory
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SourcesSection {
    /// Patch/struct source files (`.inc`, `.c`, `.h`)
    #[serde(default)]
    pub patches: Vec<String>,
    /// Wavetable file
    #[serde(default)]
    pub waves: Option<String>,
}

/// Wave loading options
#[derive(Debug, Serialize, Deserialize)]
pub struct WavesSection {
    /// Maximum number of tables to load.
    /// Default: 32 (every slot the engine addresses)
    #[serde(default = "default_max_tables")]
    pub max_tables: usize,
}

impl Default for WavesSection {
    fn default() -> Self {
        Self {
            max_tables: default_max_tables(),
        }
    }
}

fn default_max_tables() -> usize {
    uze_patch::MAX_WAVES
}

impl UzeManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse uze.toml")
    }

    /// Starter manifest for `uze init`
    pub fn starter(name: &str) -> Self {
        Self {
            project: ProjectSection {
                name: name.to_string(),
            },
            sources: SourcesSection {
                patches: vec!["patches.inc".to_string()],
                waves: None,
            },
            waves: WavesSection::default(),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize uze.toml")
    }

    /// Validate manifest fields
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            anyhow::bail!("project.name in uze.toml must not be empty");
        }

        let max = uze_patch::MAX_WAVES;
        if self.waves.max_tables == 0 || self.waves.max_tables > max {
            anyhow::bail!(
                "Invalid waves.max_tables {} in uze.toml (must be 1-{})",
                self.waves.max_tables,
                max
            );
        }

        if self.sources.patches.is_empty() && self.sources.waves.is_none() {
            tracing::warn!("uze.toml lists no sources, nothing to check");
        }

        Ok(())
    }

    /// Resolve the patch source paths against `base`
    pub fn patch_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.sources.patches.iter().map(|p| base.join(p)).collect()
    }

    /// Resolve the wave file path against `base`
    pub fn wave_path(&self, base: &Path) -> Option<PathBuf> {
        self.sources.waves.as_ref().map(|p| base.join(p))
    }
}
