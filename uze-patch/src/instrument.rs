//! Instrument struct declarations
//!
//! `const struct PatchStruct NAME[] PROGMEM = { {type, pcm, patch, loop_start, loop_end}, ... };`
//!
//! Fields mix keywords (`NULL`), identifiers (patch and PCM names) and
//! numbers, so they are kept as raw strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

use crate::error::{CodecError, DeclKind};
use crate::scan::extract_declarations;
use crate::symbols::parse_c_long;

/// Fields per instrument tuple
pub const STRUCT_FIELDS: usize = 5;

/// One `const struct PatchStruct NAME[] PROGMEM = { ... };` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructRecord {
    pub name: String,
    /// All tuple fields flattened in order
    pub fields: Vec<String>,
}

impl StructRecord {
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Group the fields into instrument entries (incomplete tuples are dropped)
    pub fn entries(&self) -> impl Iterator<Item = InstrumentEntry<'_>> {
        self.fields
            .chunks_exact(STRUCT_FIELDS)
            .map(|tuple| InstrumentEntry {
                kind: InstrumentKind::from_field(&tuple[0]),
                pcm: &tuple[1],
                patch: &tuple[2],
                loop_start: &tuple[3],
                loop_end: &tuple[4],
            })
    }
}

/// Sound source of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentKind {
    Wave = 0,
    Noise = 1,
    Pcm = 2,
}

impl InstrumentKind {
    /// Parse a type field, clamping out-of-range values into 0..=2
    pub fn from_field(field: &str) -> Self {
        match parse_c_long(field).clamp(0, 2) {
            0 => InstrumentKind::Wave,
            1 => InstrumentKind::Noise,
            _ => InstrumentKind::Pcm,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InstrumentKind::Wave => "Wave",
            InstrumentKind::Noise => "Noise",
            InstrumentKind::Pcm => "PCM",
        }
    }
}

/// Borrowed view of one instrument tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentEntry<'a> {
    pub kind: InstrumentKind,
    pub pcm: &'a str,
    pub patch: &'a str,
    pub loop_start: &'a str,
    pub loop_end: &'a str,
}

/// Extract every instrument struct declaration from normalized source
///
/// Fails if any declaration has unbalanced braces or no fields; nothing is
/// returned in that case.
pub fn extract_structs(normalized: &str) -> Result<Vec<StructRecord>, CodecError> {
    extract_declarations(normalized, DeclKind::Struct, |name, values| {
        let mut fields: Vec<&str> = values.split(',').collect();
        // Every tuple ends with a delimiter, drop the empty piece after the last one
        if fields.last() == Some(&"") {
            fields.pop();
        }

        if fields.is_empty() {
            tracing::warn!("Struct '{}' has no fields", name);
            return Err(CodecError::EmptyPayload {
                kind: DeclKind::Struct,
                name: name.to_string(),
            });
        }

        if fields.len() % STRUCT_FIELDS != 0 {
            tracing::debug!(
                "Struct '{}' has {} fields, not a multiple of {}",
                name,
                fields.len(),
                STRUCT_FIELDS
            );
        }

        tracing::debug!("Struct '{}': {} fields", name, fields.len());
        Ok(StructRecord::new(name, fields))
    })
}

/// Write one struct declaration in the studio's save format
pub(crate) fn write_struct(out: &mut impl Write, record: &StructRecord) -> fmt::Result {
    writeln!(out, "const struct PatchStruct {}[] PROGMEM = {{", record.name)?;

    if record.fields.is_empty() {
        writeln!(out, "  {{0, NULL, NULL, 0, 0}},")?;
    }

    for tuple in record.fields.chunks(STRUCT_FIELDS) {
        let field = |i: usize| tuple.get(i).map(String::as_str).unwrap_or("0");
        let kind = InstrumentKind::from_field(field(0)) as i64;
        writeln!(
            out,
            "  {{{}, {}, {}, {}, {}}},",
            kind,
            field(1),
            field(2),
            field(3),
            field(4)
        )?;
    }

    writeln!(out, "}};")
}

/// Write `#define` lines for the patches referenced by instrument tuples
///
/// Each distinct upper-cased reference maps to the index of the first tuple
/// using it. `NULL` references are skipped.
pub(crate) fn write_patch_defines(out: &mut impl Write, structs: &[StructRecord]) -> fmt::Result {
    let mut defines: BTreeMap<String, usize> = BTreeMap::new();

    for record in structs {
        for (index, tuple) in record.fields.chunks(STRUCT_FIELDS).enumerate() {
            let Some(patch) = tuple.get(2) else {
                continue;
            };
            let key = patch.to_uppercase();
            if key.is_empty() || key == "NULL" {
                continue;
            }
            defines.entry(key).or_insert(index);
        }
    }

    for (name, index) in defines {
        writeln!(out, "#define {} {}", name, index)?;
    }
    Ok(())
}
