//! Codec error types

use std::fmt;
use std::path::PathBuf;

/// Which kind of declaration a parse error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// `const char NAME[] PROGMEM = { ... };`
    Patch,
    /// `const struct PatchStruct NAME[] PROGMEM = { {...}, ... };`
    Struct,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Patch => write!(f, "patch"),
            DeclKind::Struct => write!(f, "struct"),
        }
    }
}

/// Errors returned by the codec
///
/// Unknown symbols are not errors: they resolve to 0.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Source file missing or unreadable
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination file could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `}` appeared before any matching `{`
    #[error("unbalanced braces in {kind} '{name}'")]
    Unbalanced { kind: DeclKind, name: String },

    /// Input ended before the declaration's braces closed
    #[error("unterminated {kind} '{name}'")]
    Unterminated { kind: DeclKind, name: String },

    /// The declaration's payload held no values
    #[error("{kind} '{name}' has no values")]
    EmptyPayload { kind: DeclKind, name: String },
}

impl CodecError {
    /// True for the parse failures that abort an extraction
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CodecError::Unbalanced { .. }
                | CodecError::Unterminated { .. }
                | CodecError::EmptyPayload { .. }
        )
    }
}
