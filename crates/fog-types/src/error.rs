use std::fmt;

use thiserror::Error;

/// Failure classification shared by every FOG error type.
///
/// Each crate keeps its own error enum; `kind()` on those enums maps a
/// concrete failure onto one of these buckets so callers can branch without
/// matching crate-specific variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed external input (unparsable address, bad vote mode).
    InvalidInput,
    /// A hash or index is absent from a list.
    NotFound,
    /// A duplicate append was attempted.
    AlreadyExists,
    /// A resolved value failed its type check, or a read failed.
    InvalidRead,
    /// A save or append was rejected, or the input variant is unsupported.
    NotAllowed,
    /// Unexpected failure with no clearer classification.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidInput => "invalid input",
            Self::NotFound => "not found",
            Self::AlreadyExists => "already exists",
            Self::InvalidRead => "invalid read",
            Self::NotAllowed => "not allowed",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Errors produced while parsing or checking foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid vote mode {0}: expected -1, 0 or 1")]
    InvalidMode(i32),
}

impl TypeError {
    /// Every type-level failure is bad caller input.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}
