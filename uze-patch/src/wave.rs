//! Wavetable codec
//!
//! Wave files list samples as `.byte` directives holding signed 8-bit values.
//! In memory samples are unsigned with 128 as the zero line, so decoding adds
//! 128 to the signed byte and encoding subtracts it again. The shift is a
//! bijection on 0..=255, which makes `decode(encode(w)) == w` for every wave.

use std::fmt::{self, Write};

use crate::source::strip_block_comments;
use crate::symbols::parse_c_long;
use crate::{
    BYTES_PER_LINE, DEFAULT_NUM_WAVES, MAX_WAVES, SILENCE, WAVE_EXPORT_HEADER, WAVE_SIZE,
};

/// Directive that introduces sample data (matched case-insensitively)
const BYTE_DIRECTIVE: &[u8; 5] = b".byte";

/// Map a source byte value to an unsigned sample
///
/// Only the low 8 bits are used; they are read as a two's-complement byte and
/// shifted up by 128.
pub fn sample_from_byte(value: i64) -> u8 {
    let signed = value as u8 as i8;
    (signed as i16 + 128) as u8
}

/// Map an unsigned sample back to the byte pattern written in wave files
pub fn sample_to_byte(sample: u8) -> u8 {
    (sample as i16 - 128) as i8 as u8
}

/// One 256-sample wavetable
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaveTable([u8; WAVE_SIZE]);

impl WaveTable {
    /// A flat wave at the zero line
    pub fn silent() -> Self {
        Self::filled(SILENCE)
    }

    pub fn filled(sample: u8) -> Self {
        Self([sample; WAVE_SIZE])
    }

    pub fn from_fn(f: impl FnMut(usize) -> u8) -> Self {
        Self(std::array::from_fn(f))
    }

    /// Build a table from exactly `WAVE_SIZE` samples
    pub fn from_samples(samples: &[u8]) -> Option<Self> {
        samples.try_into().ok().map(Self)
    }

    pub fn samples(&self) -> &[u8; WAVE_SIZE] {
        &self.0
    }

    pub fn samples_mut(&mut self) -> &mut [u8; WAVE_SIZE] {
        &mut self.0
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        Self::silent()
    }
}

impl From<[u8; WAVE_SIZE]> for WaveTable {
    fn from(samples: [u8; WAVE_SIZE]) -> Self {
        Self(samples)
    }
}

/// Return the text after a case-insensitive `.byte` prefix, if present
fn byte_directive_args(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let n = BYTE_DIRECTIVE.len();
    if bytes.len() < n || !bytes[..n].eq_ignore_ascii_case(BYTE_DIRECTIVE) {
        return None;
    }
    Some(&line[n..])
}

/// Decode up to `max_tables` wavetables from wave file text
///
/// Block comments are stripped and `;` starts a line comment. Samples from
/// all `.byte` lines form one stream that is cut into `WAVE_SIZE` tables.
/// A trailing partial table is dropped, and input past `max_tables` tables
/// is ignored. An empty result means no wave data was found.
pub fn decode_waves(text: &str, max_tables: usize) -> Vec<WaveTable> {
    let src = strip_block_comments(text);
    let mut tables = Vec::new();
    let mut buffer: Vec<u8> = Vec::with_capacity(WAVE_SIZE);

    if max_tables == 0 {
        return tables;
    }

    for raw in src.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let code = match raw.find(';') {
            Some(semi) => &raw[..semi],
            None => raw,
        };
        let line = code.trim_start_matches([' ', '\t']);

        let Some(args) = byte_directive_args(line) else {
            continue;
        };

        for token in args.split(',') {
            let token = token.trim_matches([' ', '\t']);
            if token.is_empty() {
                continue;
            }

            buffer.push(sample_from_byte(parse_c_long(token)));

            if buffer.len() == WAVE_SIZE {
                if let Some(table) = WaveTable::from_samples(&buffer) {
                    tables.push(table);
                }
                buffer.clear();
                if tables.len() >= max_tables {
                    tracing::debug!("Reached wave limit ({}), ignoring the rest", max_tables);
                    return tables;
                }
            }
        }
    }

    if !buffer.is_empty() {
        tracing::debug!("Dropping {} trailing samples (incomplete wave)", buffer.len());
    }
    tables
}

/// Encode wavetables as `.byte` directive text
///
/// Output is a fixed header comment, then per table a `; Wave #N` line and
/// `WAVE_SIZE / BYTES_PER_LINE` lines of `0xNN` bytes, each table followed
/// by a blank line.
pub fn encode_waves(tables: &[WaveTable]) -> String {
    WaveExport(tables).to_string()
}

/// `Display` adapter that renders a wave export file
struct WaveExport<'a>(&'a [WaveTable]);

impl fmt::Display for WaveExport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", WAVE_EXPORT_HEADER)?;
        writeln!(f)?;

        for (index, table) in self.0.iter().enumerate() {
            writeln!(f, "; Wave #{}", index)?;

            for line in table.samples().chunks(BYTES_PER_LINE) {
                f.write_str("  .byte ")?;
                for (i, &sample) in line.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "0x{:02X}", sample_to_byte(sample))?;
                }
                writeln!(f)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

/// The editor's wave memory: `MAX_WAVES` slots, of which `count` are active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveBank {
    tables: Vec<WaveTable>,
    count: usize,
}

impl WaveBank {
    /// All slots silent, none active
    pub fn silent() -> Self {
        Self {
            tables: vec![WaveTable::silent(); MAX_WAVES],
            count: 0,
        }
    }

    /// Built-in waves in the first `DEFAULT_NUM_WAVES` slots, silence after
    ///
    /// Call once at startup to get the kernel's default wave set.
    pub fn with_builtins() -> Self {
        let mut bank = Self::silent();
        for (slot, wave) in bank.tables.iter_mut().zip(crate::builtin_waves()) {
            *slot = wave;
        }
        bank.count = DEFAULT_NUM_WAVES;
        bank
    }

    /// Replace the active waves with `tables` (at most `MAX_WAVES`)
    ///
    /// When fewer than `DEFAULT_NUM_WAVES` are loaded the remaining default
    /// slots are zeroed so stale built-ins don't linger. Returns the new
    /// active count.
    pub fn load(&mut self, tables: &[WaveTable]) -> usize {
        let loaded = tables.len().min(MAX_WAVES);
        self.tables[..loaded].clone_from_slice(&tables[..loaded]);

        if loaded < DEFAULT_NUM_WAVES {
            for slot in &mut self.tables[loaded..DEFAULT_NUM_WAVES] {
                *slot = WaveTable::filled(0);
            }
        }

        self.count = loaded;
        loaded
    }

    /// Change the number of active waves (clamped to 1..=MAX_WAVES)
    ///
    /// Newly activated slots are zeroed.
    pub fn set_count(&mut self, count: usize) -> usize {
        let count = count.clamp(1, MAX_WAVES);
        if count > self.count {
            for slot in &mut self.tables[self.count..count] {
                *slot = WaveTable::filled(0);
            }
        }
        self.count = count;
        count
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// The active waves, in slot order
    pub fn active(&self) -> &[WaveTable] {
        &self.tables[..self.count]
    }

    pub fn get(&self, slot: usize) -> Option<&WaveTable> {
        self.tables.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut WaveTable> {
        self.tables.get_mut(slot)
    }
}

impl Default for WaveBank {
    fn default() -> Self {
        Self::silent()
    }
}
