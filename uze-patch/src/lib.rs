//! Uze-Patch: Uzebox patch source codec
//!
//! This crate converts between the C-like array declarations used by the
//! Uzebox sound engine and structured data an editor can work with:
//!
//! - **Patches** - `const char NAME[] PROGMEM = { ... };` command streams,
//!   conventionally grouped in (delay, opcode, parameter) triples
//! - **Instrument structs** - `const struct PatchStruct NAME[] PROGMEM = { {..}, ... };`
//!   tables of (type, pcm, patch, loop start, loop end) tuples
//! - **Wavetables** - `.byte` directive listings holding 256-sample 8-bit waves
//!
//! # Key Features
//!
//! - **Hand-written scanner**: declaration headers are matched literally and
//!   payloads are extracted with a brace-depth scanner, no regex engine
//! - **Atomic extraction**: one malformed declaration fails the whole file
//! - **Lossless wave codec**: the signed/unsigned sample shift is a bijection,
//!   so exported wave files load back bit-for-bit
//! - **Stateless**: every call owns its inputs and outputs
//!
//! # Usage
//!
//! ```
//! use uze_patch::{extract_patches, normalize};
//!
//! let src = "const char bass[] PROGMEM = { 0, PC_WAVE, 4, 2, PATCH_END }; // lead";
//! let patches = extract_patches(&normalize(src)).unwrap();
//!
//! assert_eq!(patches[0].name, "bass");
//! assert_eq!(patches[0].values, vec![0, 2, 4, 2, 15]);
//! ```
//!
//! Wave files round-trip through the decoder and encoder:
//!
//! ```
//! use uze_patch::{WaveTable, decode_waves, encode_waves};
//!
//! let wave = WaveTable::from_fn(|i| i as u8);
//! let text = encode_waves(std::slice::from_ref(&wave));
//! assert_eq!(decode_waves(&text, 1), vec![wave]);
//! ```

mod builtin;
mod error;
mod instrument;
pub mod io;
mod patch;
mod scan;
mod source;
mod symbols;
mod wave;

pub use builtin::builtin_waves;
pub use error::{CodecError, DeclKind};
pub use instrument::{InstrumentEntry, InstrumentKind, StructRecord, extract_structs};
pub use io::{read_patches_and_structs, read_waves, write_patches_and_structs, write_waves};
pub use patch::{Opcode, PatchCommand, PatchRecord, extract_patches};
pub use source::{SourceData, normalize, parse_source, strip_block_comments, write_source};
pub use symbols::{parse_c_long, resolve, symbol_table};
pub use wave::{WaveBank, WaveTable, decode_waves, encode_waves, sample_from_byte, sample_to_byte};

// =============================================================================
// Constants
// =============================================================================

/// Number of samples in one wavetable
pub const WAVE_SIZE: usize = 256;

/// Number of wavetable slots the sound engine addresses
pub const MAX_WAVES: usize = 32;

/// Number of built-in waves shipped with the kernel
pub const DEFAULT_NUM_WAVES: usize = 10;

/// Samples per `.byte` line in exported wave files
pub const BYTES_PER_LINE: usize = 16;

/// First line of every exported wave file
pub const WAVE_EXPORT_HEADER: &str = "/* Created by Uzebox Patch Studio: wavetable export */";

/// Studio version stamped into saved patch sources
pub const STUDIO_VERSION: &str = "0.0.4";

/// Sample value of a silent wave (signed zero)
pub const SILENCE: u8 = 128;

// =============================================================================
// Tests
// =============================================================================
