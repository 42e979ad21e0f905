//! File entry points
//!
//! Thin path-based wrappers over the in-memory codec. Each call opens, reads
//! or writes, and closes its file; nothing is cached between calls.

use std::fs;
use std::path::Path;

use crate::error::CodecError;
use crate::source::{SourceData, parse_source, write_source};
use crate::wave::{WaveTable, decode_waves, encode_waves};

fn read_text(path: &Path) -> Result<String, CodecError> {
    let bytes = fs::read(path).map_err(|source| CodecError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_text(path: &Path, text: &str) -> Result<(), CodecError> {
    fs::write(path, text).map_err(|source| CodecError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every patch and instrument struct declared in a source file
///
/// Fails if the file can't be read or any declaration is malformed; no
/// partial results are returned.
pub fn read_patches_and_structs(path: impl AsRef<Path>) -> Result<SourceData, CodecError> {
    let path = path.as_ref();
    let text = read_text(path)?;

    let data = parse_source(&text).inspect_err(|e| {
        tracing::warn!("Failed to parse {:?}: {}", path, e);
    })?;

    tracing::info!(
        "{:?} opened with {} patches and {} structs",
        path,
        data.patches.len(),
        data.structs.len()
    );
    Ok(data)
}

/// Write patches and instrument structs as a C source file
pub fn write_patches_and_structs(
    path: impl AsRef<Path>,
    data: &SourceData,
) -> Result<(), CodecError> {
    let path = path.as_ref();
    write_text(path, &write_source(data))?;
    tracing::info!("{:?} written", path);
    Ok(())
}

/// Read up to `max_tables` wavetables from a wave file
///
/// An unreadable file and a file without wave data both give an empty
/// result; the caller only learns how many tables loaded.
pub fn read_waves(path: impl AsRef<Path>, max_tables: usize) -> Vec<WaveTable> {
    let path = path.as_ref();
    let text = match read_text(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{}", e);
            return Vec::new();
        }
    };

    let tables = decode_waves(&text, max_tables);
    if tables.is_empty() {
        tracing::info!("No wave data found in {:?}", path);
    } else {
        tracing::info!("Loaded {} waves from {:?}", tables.len(), path);
    }
    tables
}

/// Write wavetables to a wave file in the export format
pub fn write_waves(path: impl AsRef<Path>, tables: &[WaveTable]) -> Result<(), CodecError> {
    let path = path.as_ref();
    write_text(path, &encode_waves(tables))?;
    tracing::info!("Waves saved to {:?} ({} tables)", path, tables.len());
    Ok(())
}
