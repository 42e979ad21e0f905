//! Declaration scanner shared by the patch and struct extractors
//!
//! Extraction is two explicit passes over normalized source:
//!
//! 1. **Header match** - find `<prefix><NAME>[] PROGMEM = ` literally
//! 2. **Payload scan** - walk braces from the end of the header, collecting
//!    the characters that sit at the declaration's value depth
//!
//! The next header search resumes right after the previous header, not after
//! its payload, so a malformed payload anywhere fails the whole file.

use crate::error::{CodecError, DeclKind};

/// Header prefix for patch declarations
const PATCH_PREFIX: &str = "const char ";

/// Header prefix for instrument struct declarations
const STRUCT_PREFIX: &str = "const struct PatchStruct ";

/// Literal text between the declaration name and the `=`
const HEADER_SUFFIX: &str = "[] PROGMEM";

impl DeclKind {
    fn prefix(self) -> &'static str {
        match self {
            DeclKind::Patch => PATCH_PREFIX,
            DeclKind::Struct => STRUCT_PREFIX,
        }
    }

    /// Brace depth at which values live
    fn value_depth(self) -> usize {
        match self {
            DeclKind::Patch => 1,
            DeclKind::Struct => 2,
        }
    }
}

/// A matched declaration header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header<'a> {
    /// Declared array name
    pub name: &'a str,
    /// Byte offset just past the header (after `=` and its optional space)
    pub end: usize,
}

/// Find the first header of `kind` at or after byte offset `from`
pub(crate) fn find_header(text: &str, from: usize, kind: DeclKind) -> Option<Header<'_>> {
    let prefix = kind.prefix();
    let mut search = from;

    while let Some(offset) = text[search..].find(prefix) {
        let start = search + offset;
        if let Some(header) = match_header_tail(text, start + prefix.len()) {
            return Some(header);
        }
        search = start + 1;
    }
    None
}

/// Match `NAME[] PROGMEM ?= ?` at `pos`
fn match_header_tail(text: &str, pos: usize) -> Option<Header<'_>> {
    let bytes = text.as_bytes();

    let first = *bytes.get(pos)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let name_len = bytes[pos..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    let name = &text[pos..pos + name_len];

    let mut end = pos + name_len;
    if !text[end..].starts_with(HEADER_SUFFIX) {
        return None;
    }
    end += HEADER_SUFFIX.len();

    if bytes.get(end) == Some(&b' ') {
        end += 1;
    }
    if bytes.get(end) != Some(&b'=') {
        return None;
    }
    end += 1;
    if bytes.get(end) == Some(&b' ') {
        end += 1;
    }

    Some(Header { name, end })
}

/// Why a payload scan failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanError {
    /// `}` with no open brace
    Unbalanced,
    /// Input ended with braces still open
    Unterminated,
}

impl ScanError {
    fn into_codec(self, kind: DeclKind, name: &str) -> CodecError {
        let name = name.to_string();
        match self {
            ScanError::Unbalanced => CodecError::Unbalanced { kind, name },
            ScanError::Unterminated => CodecError::Unterminated { kind, name },
        }
    }
}

/// Collect the value text of the declaration payload starting at `text`
///
/// Non-space characters at the value depth are kept. For structs each
/// closing tuple brace appends a `,` so consecutive tuples flatten into one
/// comma-separated list.
pub(crate) fn scan_payload(text: &str, kind: DeclKind) -> Result<String, ScanError> {
    let value_depth = kind.value_depth();
    let mut depth = 0usize;
    let mut values = String::new();

    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Err(ScanError::Unbalanced);
                }
                depth -= 1;
                if depth == 0 {
                    return Ok(values);
                }
                if kind == DeclKind::Struct && depth + 1 == value_depth {
                    values.push(',');
                }
            }
            ' ' => {}
            c if depth == value_depth => values.push(c),
            _ => {}
        }
    }

    Err(ScanError::Unterminated)
}

/// Run header matching and payload scanning over a whole normalized source
///
/// `build` turns each declaration's name and collected value text into a
/// record. The first error from either stage aborts the call.
pub(crate) fn extract_declarations<T>(
    text: &str,
    kind: DeclKind,
    mut build: impl FnMut(&str, &str) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    let mut records = Vec::new();
    let mut search = 0;

    while let Some(header) = find_header(text, search, kind) {
        search = header.end;

        let values = scan_payload(&text[header.end..], kind)
            .map_err(|e| e.into_codec(kind, header.name))?;
        records.push(build(header.name, &values)?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_header_spacing() {
        for src in [
            "const char lead[] PROGMEM = {",
            "const char lead[] PROGMEM ={",
            "const char lead[] PROGMEM= {",
            "const char lead[] PROGMEM={",
        ] {
            let header = find_header(src, 0, DeclKind::Patch).unwrap();
            assert_eq!(header.name, "lead", "{src}");
            assert_eq!(&src[header.end..], "{", "{src}");
        }
    }

    #[test]
    fn test_find_header_rejects_non_matches() {
        assert!(find_header("const char 1lead[] PROGMEM = {", 0, DeclKind::Patch).is_none());
        assert!(find_header("const char lead[4] PROGMEM = {", 0, DeclKind::Patch).is_none());
        assert!(find_header("const char lead[] = {", 0, DeclKind::Patch).is_none());
        assert!(find_header("const char lead[] PROGMEM {", 0, DeclKind::Patch).is_none());
        assert!(find_header("const struct PatchStruct s[] PROGMEM = {", 0, DeclKind::Patch).is_none());
    }

    #[test]
    fn test_find_header_skips_failed_candidate() {
        let src = "const char x[3]; const char _a1[] PROGMEM = {0};";
        let header = find_header(src, 0, DeclKind::Patch).unwrap();
        assert_eq!(header.name, "_a1");
    }

    #[test]
    fn test_find_header_struct() {
        let src = "const struct PatchStruct instruments[] PROGMEM = {";
        let header = find_header(src, 0, DeclKind::Struct).unwrap();
        assert_eq!(header.name, "instruments");
        assert!(find_header(src, 0, DeclKind::Patch).is_none());
    }

    #[test]
    fn test_scan_payload_patch() {
        assert_eq!(scan_payload("{ 1, 2 , 3 }; rest", DeclKind::Patch).unwrap(), "1,2,3");
        // Nested values are skipped at patch depth
        assert_eq!(scan_payload("{1,{9,9},2}", DeclKind::Patch).unwrap(), "1,,2");
    }

    #[test]
    fn test_scan_payload_struct_flattens_tuples() {
        assert_eq!(
            scan_payload("{ {0, NULL, a, 0, 0}, {1,NULL,b,0,0} };", DeclKind::Struct).unwrap(),
            "0,NULL,a,0,0,1,NULL,b,0,0,"
        );
    }

    #[test]
    fn test_scan_payload_errors() {
        assert_eq!(scan_payload("} {1}", DeclKind::Patch), Err(ScanError::Unbalanced));
        assert_eq!(scan_payload("{ 1, 2, 0", DeclKind::Patch), Err(ScanError::Unterminated));
        assert_eq!(scan_payload("", DeclKind::Patch), Err(ScanError::Unterminated));
        assert_eq!(scan_payload("{ {0,1}", DeclKind::Struct), Err(ScanError::Unterminated));
    }
}
