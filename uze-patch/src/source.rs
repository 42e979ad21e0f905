//! Patch source text handling
//!
//! Comment stripping and whitespace normalization ahead of extraction, plus
//! the whole-file parse/write pair used by the file entry points.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::STUDIO_VERSION;
use crate::error::CodecError;
use crate::instrument::{StructRecord, extract_structs, write_patch_defines, write_struct};
use crate::patch::{PatchRecord, extract_patches, write_patch};

/// Everything extracted from one patch source file, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceData {
    pub patches: Vec<PatchRecord>,
    pub structs: Vec<StructRecord>,
}

/// Remove every `/* ... */` block
///
/// Blocks may span lines and end at the first `*/`. An unterminated `/*`
/// and everything after it is kept as-is.
pub fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("/*") {
        let Some(len) = rest[start + 2..].find("*/") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + 2 + len + 2..];
    }

    out.push_str(rest);
    out
}

/// Remove `//` comments up to (not including) the next line break
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("//") {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let end = rest.find(['\r', '\n']).unwrap_or(rest.len());
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

/// Normalize patch source for the declaration scanner
///
/// Block comments go first, then line comments, so a comment body can never
/// be fused into code. Tabs and line breaks become spaces and space runs
/// collapse to one.
pub fn normalize(text: &str) -> String {
    let code = strip_line_comments(&strip_block_comments(text));

    let mut out = String::with_capacity(code.len());
    for c in code.chars() {
        let c = match c {
            '\t' | '\r' | '\n' => ' ',
            c => c,
        };
        if c == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Parse a whole patch source file
///
/// Patches and structs are extracted from the same normalized text. Either
/// extraction failing fails the file.
pub fn parse_source(text: &str) -> Result<SourceData, CodecError> {
    let clean = normalize(text);
    let patches = extract_patches(&clean)?;
    let structs = extract_structs(&clean)?;
    Ok(SourceData { patches, structs })
}

/// Render patches and structs back to C source
///
/// Patches come first since structs reference them by name. Each distinct
/// patch reference used by a struct also gets a `#define` with the index of
/// the first tuple that uses it.
pub fn write_source(data: &SourceData) -> String {
    SourceFile(data).to_string()
}

/// `Display` adapter that renders a whole source file
struct SourceFile<'a>(&'a SourceData);

impl fmt::Display for SourceFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/* Created with Uzebox Patch Studio {} */", STUDIO_VERSION)?;

        for patch in &self.0.patches {
            write_patch(f, patch)?;
        }
        for record in &self.0.structs {
            write_struct(f, record)?;
        }
        write_patch_defines(f, &self.0.structs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_block_comments() {
        assert_eq!(strip_block_comments("a /* x */ b"), "a  b");
        assert_eq!(strip_block_comments("a /* x\ny */b /* z */c"), "a b c");
        assert_eq!(strip_block_comments("/**/"), "");
        assert_eq!(strip_block_comments("a /* open"), "a /* open");
        assert_eq!(strip_block_comments("a /* x */ b /* open"), "a  b /* open");
    }

    #[test]
    fn test_block_comment_is_non_greedy() {
        assert_eq!(strip_block_comments("/* a */ keep /* b */"), " keep ");
    }

    #[test]
    fn test_normalize_line_comments() {
        assert_eq!(normalize("a // note\nb"), "a b");
        assert_eq!(normalize("a // note\r\nb"), "a b");
        assert_eq!(normalize("// only"), "");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize("a\t\tb\r\n\r\nc    d"), "a b c d");
        assert_eq!(normalize("  lead  "), " lead ");
    }

    #[test]
    fn test_normalize_block_before_line() {
        // `//` inside a block comment must not eat the code after it
        assert_eq!(normalize("/* see http://x */ a\nb"), " a b");
        // A block opener inside a line comment still spans lines
        assert_eq!(normalize("x // /* \n y */ z"), "x ");
    }

    #[test]
    fn test_parse_source_both_kinds() {
        let src = "\
/* Created with Uzebox Patch Studio 0.0.4 */
const char lead[] PROGMEM = {
  0, PC_WAVE, 3,
  2, PATCH_END,
};
const struct PatchStruct instruments[] PROGMEM = {
  {0, NULL, lead, 0, 0},
};
";
        let data = parse_source(src).unwrap();
        assert_eq!(data.patches.len(), 1);
        assert_eq!(data.patches[0].values, vec![0, 2, 3, 2, 15]);
        assert_eq!(data.structs.len(), 1);
        assert_eq!(data.structs[0].fields, vec!["0", "NULL", "lead", "0", "0"]);
    }

    #[test]
    fn test_parse_source_struct_failure_fails_file() {
        let src = "const char a[] PROGMEM = { 1 };\nconst struct PatchStruct s[] PROGMEM = { };";
        assert!(matches!(
            parse_source(src),
            Err(CodecError::EmptyPayload { .. })
        ));
    }

    #[test]
    fn test_write_source_round_trip() {
        let data = SourceData {
            patches: vec![
                PatchRecord::new("lead", vec![0, 2, 3, 4, 7, 200, 1, 15, 0]),
                PatchRecord::new("hit", vec![0, 1, 0x40, 3, 15, 9, 0, 15, 0]),
            ],
            structs: vec![StructRecord::new(
                "instruments",
                ["0", "NULL", "lead", "0", "0", "1", "NULL", "hit", "0", "0"],
            )],
        };

        let text = write_source(&data);
        let back = parse_source(&text).unwrap();

        assert_eq!(back.patches[0].values, vec![0, 2, 3, 4, 7, 200, 1, 15]);
        assert_eq!(back.patches[1].values, vec![0, 1, 0x40, 3, 15, 9, 0, 15]);
        assert_eq!(back.structs, data.structs);
        assert!(text.ends_with("#define HIT 1\n#define LEAD 0\n"));
    }
}
