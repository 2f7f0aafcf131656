use fog_types::{ErrorKind, ObjectId};

use crate::object::ObjectKind;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch for {id}: stored bytes hash to {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The object exists but is not of the kind the reference expects.
    #[error("object {id:?} is a {actual}, expected a {expected}")]
    KindMismatch {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// Attempted to write an object hashing to the null ID.
    #[error("cannot store object with null ID")]
    NullObjectId,

    /// List lookup past the end of the list.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// List lookup by a hash the list does not contain.
    #[error("no entry with hash {0:?}")]
    NotInList(ObjectId),

    /// A write-back through an element whose slot has since been replaced.
    #[error("stale element at index {index}: expected {expected:?}, found {found:?}")]
    StaleElement {
        index: usize,
        expected: ObjectId,
        found: ObjectId,
    },

    /// The store has no root yet.
    #[error("store has no root")]
    Uninitialized,

    /// `init` called on a store that already has a root.
    #[error("store already has root {0:?}")]
    AlreadyInitialized(ObjectId),

    #[error("root slot {index} out of range ({slots} slots)")]
    SlotOutOfRange { index: usize, slots: usize },

    #[error("root slot {0} is empty")]
    EmptySlot(usize),

    #[error("lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::IndexOutOfRange { .. } | Self::NotInList(_) => {
                ErrorKind::NotFound
            }
            Self::HashMismatch { .. }
            | Self::Serialization(_)
            | Self::KindMismatch { .. }
            | Self::Uninitialized
            | Self::SlotOutOfRange { .. }
            | Self::EmptySlot(_) => ErrorKind::InvalidRead,
            Self::NullObjectId | Self::StaleElement { .. } => ErrorKind::NotAllowed,
            Self::AlreadyInitialized(_) => ErrorKind::AlreadyExists,
            Self::LockPoisoned => ErrorKind::Internal,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
