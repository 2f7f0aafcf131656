//! Error types for page operations.

use fog_crypto::KeyError;
use fog_store::StoreError;
use fog_types::{ErrorKind, TypeError};
use thiserror::Error;

/// Errors produced by page, root and session operations.
///
/// Every variant names the target it concerns (which list, which index or
/// hash, which root child) so a failure deep inside a save is traceable
/// without a backtrace.
#[derive(Debug, Error)]
pub enum PageError {
    /// Malformed caller input or configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A hash or index is absent from a list.
    #[error("{target} not found: {source}")]
    NotFound {
        target: String,
        #[source]
        source: StoreError,
    },

    /// A duplicate append was attempted.
    #[error("{target} already exists")]
    AlreadyExists { target: String },

    /// A reference, root child or list entry could not be read as the
    /// expected type.
    #[error("failed to read {target}: {source}")]
    InvalidRead {
        target: String,
        #[source]
        source: StoreError,
    },

    /// The store rejected a write, or the operation does not accept this input.
    #[error("{op} on {target} not allowed: {reason}")]
    NotAllowed {
        op: &'static str,
        target: String,
        reason: String,
    },

    #[error("internal error in {op} on {target}: {reason}")]
    Internal {
        op: &'static str,
        target: String,
        reason: String,
    },
}

impl PageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InvalidRead { .. } => ErrorKind::InvalidRead,
            Self::NotAllowed { .. } => ErrorKind::NotAllowed,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// A failed list lookup: positions and hashes absent from the list are
    /// `NotFound`, anything else (including a dangling entry) is a bad read.
    pub(crate) fn lookup(target: String, source: StoreError) -> Self {
        match source {
            StoreError::IndexOutOfRange { .. } | StoreError::NotInList(_) => {
                Self::NotFound { target, source }
            }
            _ => Self::InvalidRead { target, source },
        }
    }

    /// A failed dereference.
    pub(crate) fn read(target: String, source: StoreError) -> Self {
        Self::InvalidRead { target, source }
    }

    /// A write the store refused.
    pub(crate) fn write(op: &'static str, target: String, source: StoreError) -> Self {
        Self::NotAllowed {
            op,
            target,
            reason: source.to_string(),
        }
    }

    pub(crate) fn internal(op: &'static str, target: String, source: StoreError) -> Self {
        Self::Internal {
            op,
            target,
            reason: source.to_string(),
        }
    }
}

impl From<TypeError> for PageError {
    fn from(e: TypeError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<KeyError> for PageError {
    fn from(e: KeyError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// Convenience alias for page results.
pub type PageResult<T> = Result<T, PageError>;
