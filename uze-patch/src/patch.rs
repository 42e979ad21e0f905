//! Patch declarations
//!
//! A patch is a flat list of integers. The sound engine reads it as
//! (delay, command, parameter) triples, with `PATCH_END` terminating the
//! stream. The final `PATCH_END` may omit its parameter to save a byte.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

use crate::error::{CodecError, DeclKind};
use crate::scan::extract_declarations;
use crate::symbols::resolve;

/// One `const char NAME[] PROGMEM = { ... };` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub name: String,
    pub values: Vec<i64>,
}

impl PatchRecord {
    pub fn new(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Group the values into commands
    ///
    /// A trailing `PATCH_END` without a parameter gets parameter 0. Any other
    /// incomplete trailing group is dropped.
    pub fn commands(&self) -> impl Iterator<Item = PatchCommand> + '_ {
        self.values.chunks(3).filter_map(|chunk| match *chunk {
            [delay, opcode, param] => Some(PatchCommand {
                delay,
                opcode,
                param,
            }),
            [delay, opcode] if opcode == Opcode::PatchEnd as i64 => Some(PatchCommand {
                delay,
                opcode,
                param: 0,
            }),
            _ => None,
        })
    }
}

/// A single timed patch command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchCommand {
    /// Ticks to wait before running the command
    pub delay: i64,
    /// Raw command id, see [`Opcode`]
    pub opcode: i64,
    pub param: i64,
}

impl PatchCommand {
    /// The command as a known opcode, if it is one
    pub fn kind(&self) -> Option<Opcode> {
        Opcode::from_value(self.opcode)
    }
}

/// Patch command ids understood by the sound engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    EnvSpeed = 0,
    NoiseParams = 1,
    Wave = 2,
    NoteUp = 3,
    NoteDown = 4,
    NoteCut = 5,
    NoteHold = 6,
    EnvVol = 7,
    Pitch = 8,
    TremoloLevel = 9,
    TremoloRate = 10,
    Slide = 11,
    SlideSpeed = 12,
    LoopStart = 13,
    LoopEnd = 14,
    PatchEnd = 15,
}

impl Opcode {
    /// All opcodes in id order
    pub const ALL: [Opcode; 16] = [
        Opcode::EnvSpeed,
        Opcode::NoiseParams,
        Opcode::Wave,
        Opcode::NoteUp,
        Opcode::NoteDown,
        Opcode::NoteCut,
        Opcode::NoteHold,
        Opcode::EnvVol,
        Opcode::Pitch,
        Opcode::TremoloLevel,
        Opcode::TremoloRate,
        Opcode::Slide,
        Opcode::SlideSpeed,
        Opcode::LoopStart,
        Opcode::LoopEnd,
        Opcode::PatchEnd,
    ];

    pub fn from_value(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Editor-facing name (`ENV_SPEED`, `WAVE`, ...)
    pub fn name(self) -> &'static str {
        match self {
            Opcode::EnvSpeed => "ENV_SPEED",
            Opcode::NoiseParams => "NOISE_PARAMS",
            Opcode::Wave => "WAVE",
            Opcode::NoteUp => "NOTE_UP",
            Opcode::NoteDown => "NOTE_DOWN",
            Opcode::NoteCut => "NOTE_CUT",
            Opcode::NoteHold => "NOTE_HOLD",
            Opcode::EnvVol => "ENV_VOL",
            Opcode::Pitch => "PITCH",
            Opcode::TremoloLevel => "TREMOLO_LEVEL",
            Opcode::TremoloRate => "TREMOLO_RATE",
            Opcode::Slide => "SLIDE",
            Opcode::SlideSpeed => "SLIDE_SPEED",
            Opcode::LoopStart => "LOOP_START",
            Opcode::LoopEnd => "LOOP_END",
            Opcode::PatchEnd => "PATCH_END",
        }
    }

    /// Source symbol (`PC_ENV_SPEED`, ..., `PATCH_END`)
    pub fn symbol(self) -> String {
        match self {
            Opcode::PatchEnd => self.name().to_string(),
            _ => format!("PC_{}", self.name()),
        }
    }
}

/// Extract every patch declaration from normalized source
///
/// Values may be engine symbols or integer literals of any radix. Fails if
/// any declaration has unbalanced braces or no values; nothing is returned
/// in that case.
pub fn extract_patches(normalized: &str) -> Result<Vec<PatchRecord>, CodecError> {
    extract_declarations(normalized, DeclKind::Patch, |name, values| {
        let values: Vec<i64> = values
            .split(',')
            .filter(|token| !token.is_empty())
            .map(resolve)
            .collect();

        if values.is_empty() {
            tracing::warn!("Patch '{}' has no values", name);
            return Err(CodecError::EmptyPayload {
                kind: DeclKind::Patch,
                name: name.to_string(),
            });
        }

        tracing::debug!("Patch '{}': {} values", name, values.len());
        Ok(PatchRecord::new(name, values))
    })
}

/// Write one patch declaration in the studio's save format
pub(crate) fn write_patch(out: &mut impl Write, patch: &PatchRecord) -> fmt::Result {
    writeln!(out, "const char {}[] PROGMEM = {{", patch.name)?;

    if patch.values.is_empty() {
        writeln!(out, "  0, PC_PATCH_END,")?;
    }

    let triples = patch.values.len().div_ceil(3);
    for (i, chunk) in patch.values.chunks(3).enumerate() {
        let delay = chunk[0];
        let opcode = chunk.get(1).copied().unwrap_or(0);
        let param = chunk.get(2).copied().unwrap_or(0);

        if opcode >= Opcode::PatchEnd as i64 {
            if i + 1 == triples {
                writeln!(out, "  {}, PATCH_END,", delay)?;
            } else {
                writeln!(out, "  {}, PATCH_END, {},", delay, param)?;
            }
        } else {
            match Opcode::from_value(opcode) {
                Some(op) => writeln!(out, "  {}, {}, {},", delay, op.symbol(), param)?,
                None => writeln!(out, "  {}, {}, {},", delay, opcode, param)?,
            }
        }
    }

    writeln!(out, "}};")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::normalize;

    fn patches(src: &str) -> Result<Vec<PatchRecord>, CodecError> {
        extract_patches(&normalize(src))
    }

    #[test]
    fn test_extract_symbolic_patch() {
        let result = patches("const char foo[] PROGMEM = { 1, PC_WAVE, 0 };").unwrap();
        assert_eq!(result, vec![PatchRecord::new("foo", vec![1, 2, 0])]);
    }

    #[test]
    fn test_missing_close_brace_fails() {
        let result = patches("const char foo[] PROGMEM = { 1, 2, 0");
        assert!(matches!(result, Err(CodecError::Unterminated { .. })));
    }

    #[test]
    fn test_stray_close_brace_fails() {
        let result = patches("const char foo[] PROGMEM = } 1, 2 {");
        assert!(matches!(result, Err(CodecError::Unbalanced { .. })));
    }

    #[test]
    fn test_empty_payload_fails() {
        let result = patches("const char foo[] PROGMEM = { , , };");
        match result {
            Err(CodecError::EmptyPayload { kind, name }) => {
                assert_eq!(kind, DeclKind::Patch);
                assert_eq!(name, "foo");
            }
            other => panic!("expected EmptyPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_later_bad_declaration_discards_earlier() {
        let src = "
const char good[] PROGMEM = { 0, PC_WAVE, 1, 0, PATCH_END };
const char bad[] PROGMEM = { };
";
        assert!(patches(src).is_err());
    }

    #[test]
    fn test_multiple_patches_in_order_with_duplicates() {
        let src = "
const char b[] PROGMEM = { 0x10, PC_PITCH, 060 };
const char a[] PROGMEM={ 5 };
const char b[] PROGMEM = { 1 };
";
        let result = patches(src).unwrap();
        let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "b"]);
        assert_eq!(result[0].values, vec![16, 8, 48]);
        assert_eq!(result[2].values, vec![1]);
    }

    #[test]
    fn test_header_inside_payload_is_found_again() {
        // Searching resumes after each header, so a header nested in an
        // earlier payload is still extracted on its own
        let src = "const char a[] PROGMEM = { 1, const char b[] PROGMEM = { 2 }, 3 };";
        let result = patches(src).unwrap();
        assert_eq!(
            result,
            vec![
                PatchRecord::new("a", vec![1, 0, 3]),
                PatchRecord::new("b", vec![2]),
            ]
        );
    }

    #[test]
    fn test_header_without_payload_borrows_next() {
        let src = "const char a[] PROGMEM = ; const char b[] PROGMEM = { 7 };";
        let result = patches(src).unwrap();
        assert_eq!(
            result,
            vec![
                PatchRecord::new("a", vec![7]),
                PatchRecord::new("b", vec![7]),
            ]
        );
    }

    #[test]
    fn test_unknown_symbols_and_garbage() {
        let result = patches("const char p[] PROGMEM = { FOO, 12ms, -3 };").unwrap();
        assert_eq!(result[0].values, vec![0, 12, -3]);
    }

    #[test]
    fn test_commented_out_patch_is_ignored() {
        let src = "
// const char old[] PROGMEM = { 1 ;
/* const char older[] PROGMEM = { */
const char live[] PROGMEM = { 7 };
";
        let result = patches(src).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "live");
    }

    #[test]
    fn test_no_patches_is_ok() {
        assert_eq!(patches("int x = 3;").unwrap(), vec![]);
        assert_eq!(patches("").unwrap(), vec![]);
    }

    #[test]
    fn test_commands_grouping() {
        let patch = PatchRecord::new("p", vec![0, 2, 4, 3, 15]);
        let commands: Vec<_> = patch.commands().collect();
        assert_eq!(
            commands,
            vec![
                PatchCommand {
                    delay: 0,
                    opcode: 2,
                    param: 4
                },
                PatchCommand {
                    delay: 3,
                    opcode: 15,
                    param: 0
                },
            ]
        );
        assert_eq!(commands[0].kind(), Some(Opcode::Wave));

        let ragged = PatchRecord::new("p", vec![0, 2, 4, 9]);
        assert_eq!(ragged.commands().count(), 1);
    }

    #[test]
    fn test_opcode_symbols_resolve() {
        for op in Opcode::ALL {
            assert_eq!(resolve(&op.symbol()), op as i64, "{}", op.symbol());
            assert_eq!(Opcode::from_value(op as i64), Some(op));
        }
        assert_eq!(Opcode::from_value(16), None);
        assert_eq!(Opcode::from_value(-1), None);
    }

    #[test]
    fn test_write_patch_format() {
        let mut out = String::new();
        write_patch(&mut out, &PatchRecord::new("lead", vec![0, 2, 3, 6, 15, 0])).unwrap();
        assert_eq!(
            out,
            "const char lead[] PROGMEM = {\n  0, PC_WAVE, 3,\n  6, PATCH_END,\n};\n"
        );
    }

    #[test]
    fn test_write_patch_mid_stream_end_keeps_param() {
        let mut out = String::new();
        write_patch(&mut out, &PatchRecord::new("p", vec![0, 15, 5, 1, 40, 2])).unwrap();
        assert_eq!(
            out,
            "const char p[] PROGMEM = {\n  0, PATCH_END, 5,\n  1, PATCH_END,\n};\n"
        );
    }

    #[test]
    fn test_write_empty_patch() {
        let mut out = String::new();
        write_patch(&mut out, &PatchRecord::new("p", vec![])).unwrap();
        assert_eq!(out, "const char p[] PROGMEM = {\n  0, PC_PATCH_END,\n};\n");
    }
}
