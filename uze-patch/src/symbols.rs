//! Symbolic constants and integer literal parsing
//!
//! Patch sources reference engine constants by name (`PC_WAVE`, `WSAW`, ...).
//! The table below mirrors the kernel's defines; anything not in it is parsed
//! as a C integer literal.

use hashbrown::HashMap;
use std::sync::LazyLock;

/// Engine constants understood in patch payloads
const DEFINES: &[(&str, i64)] = &[
    // Built-in wave indices, long form
    ("WAVE_SINE", 0),
    ("WAVE_SAWTOOTH", 1),
    ("WAVE_TRIANGLE", 2),
    ("WAVE_SQUARE_25", 3),
    ("WAVE_SQUARE_50", 4),
    ("WAVE_SQUARE_75", 5),
    ("WAVE_FUZZY_SINE1", 6),
    ("WAVE_FUZZY_SINE2", 7),
    ("WAVE_FUZZY_SINE3", 8),
    ("WAVE_FILTERED_SQUARE", 9),
    // Built-in wave indices, short form
    ("WSIN", 0),
    ("WSAW", 1),
    ("WTRI", 2),
    ("WS25", 3),
    ("WS50", 4),
    ("WS75", 5),
    ("WFS1", 6),
    ("WFS2", 7),
    ("WFS3", 8),
    ("WFSQ", 9),
    // Patch commands
    ("PC_ENV_SPEED", 0),
    ("PC_NOISE_PARAMS", 1),
    ("PC_WAVE", 2),
    ("PC_NOTE_UP", 3),
    ("PC_NOTE_DOWN", 4),
    ("PC_NOTE_CUT", 5),
    ("PC_NOTE_HOLD", 6),
    ("PC_ENV_VOL", 7),
    ("PC_PITCH", 8),
    ("PC_TREMOLO_LEVEL", 9),
    ("PC_TREMOLO_RATE", 10),
    ("PC_SLIDE", 11),
    ("PC_SLIDE_SPEED", 12),
    ("PC_LOOP_START", 13),
    ("PC_LOOP_END", 14),
    ("PATCH_END", 15),
];

static SYMBOLS: LazyLock<HashMap<&'static str, i64>> =
    LazyLock::new(|| DEFINES.iter().copied().collect());

/// The process-wide symbol table (built on first access, never mutated)
pub fn symbol_table() -> &'static HashMap<&'static str, i64> {
    &SYMBOLS
}

/// Resolve a payload token to an integer
///
/// Exact symbol lookup first, then [`parse_c_long`]. Unknown identifiers
/// resolve to 0.
pub fn resolve(token: &str) -> i64 {
    match SYMBOLS.get(token) {
        Some(&value) => value,
        None => parse_c_long(token),
    }
}

/// Parse an integer literal the way C's `strtol(s, NULL, 0)` does
///
/// - leading whitespace and one `+`/`-` sign are accepted
/// - `0x`/`0X` selects hex, a leading `0` selects octal, else decimal
/// - the longest valid prefix is used and the rest ignored
/// - no digits at all yields 0
/// - out-of-range values saturate to `i64::MIN`/`i64::MAX`
pub fn parse_c_long(s: &str) -> i64 {
    let bytes = s.trim_start().as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let rest = &bytes[pos..];
    let (radix, digits) = match rest {
        [b'0', b'x' | b'X', next, ..] if next.is_ascii_hexdigit() => (16, &rest[2..]),
        [b'0', ..] => (8, rest),
        _ => (10, rest),
    };

    let mut magnitude: i128 = 0;
    for &b in digits {
        let Some(digit) = (b as char).to_digit(radix) else {
            break;
        };
        // Past i64 range the result saturates, stop growing
        if magnitude <= i64::MAX as i128 + 1 {
            magnitude = magnitude * radix as i128 + digit as i128;
        }
    }

    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_symbols() {
        assert_eq!(resolve("PC_WAVE"), 2);
        assert_eq!(resolve("PATCH_END"), 15);
        assert_eq!(resolve("WAVE_FILTERED_SQUARE"), 9);
        assert_eq!(resolve("WS75"), 5);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert_eq!(resolve("pc_wave"), 0);
        assert_eq!(resolve("PC_WAVE "), 0);
    }

    #[test]
    fn test_unknown_symbol_resolves_to_zero() {
        assert_eq!(resolve("PC_UNKNOWN"), 0);
        assert_eq!(resolve("NULL"), 0);
        assert_eq!(resolve(""), 0);
    }

    #[test]
    fn test_parse_c_long_radix() {
        assert_eq!(parse_c_long("42"), 42);
        assert_eq!(parse_c_long("0x1F"), 31);
        assert_eq!(parse_c_long("0XfF"), 255);
        assert_eq!(parse_c_long("017"), 15);
        assert_eq!(parse_c_long("0"), 0);
        assert_eq!(parse_c_long("-12"), -12);
        assert_eq!(parse_c_long("+7"), 7);
        assert_eq!(parse_c_long("  -0x10"), -16);
    }

    #[test]
    fn test_parse_c_long_prefix() {
        assert_eq!(parse_c_long("12abc"), 12);
        assert_eq!(parse_c_long("019"), 1);
        assert_eq!(parse_c_long("0x"), 0);
        assert_eq!(parse_c_long("0xg1"), 0);
        assert_eq!(parse_c_long("abc"), 0);
        assert_eq!(parse_c_long("-"), 0);
    }

    #[test]
    fn test_parse_c_long_saturates() {
        assert_eq!(parse_c_long("99999999999999999999999"), i64::MAX);
        assert_eq!(parse_c_long("-99999999999999999999999"), i64::MIN);
        assert_eq!(parse_c_long("-9223372036854775808"), i64::MIN);
    }

    #[test]
    fn test_symbol_table_is_shared() {
        let a = symbol_table() as *const _;
        let b = symbol_table() as *const _;
        assert_eq!(a, b);
        assert_eq!(symbol_table().len(), DEFINES.len());
    }
}
