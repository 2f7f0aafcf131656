use fog_crypto::ContentHasher;
use fog_types::{Board, ObjectId, Post, Thread, Vote};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// The schema an object was written under.
///
/// The kind is stored next to the bytes and selects the hashing domain, so
/// it is part of an object's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Board,
    Thread,
    Post,
    Vote,
    BoardPage,
    ThreadPage,
    DiffPage,
    UsersPage,
    UserActivityPage,
    Root,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Thread => "thread",
            Self::Post => "post",
            Self::Vote => "vote",
            Self::BoardPage => "board_page",
            Self::ThreadPage => "thread_page",
            Self::DiffPage => "diff_page",
            Self::UsersPage => "users_page",
            Self::UserActivityPage => "user_activity_page",
            Self::Root => "root",
        }
    }

    /// The hasher for objects of this kind.
    pub fn hasher(&self) -> ContentHasher {
        let domain = match self {
            Self::Board => "fog-board-v1",
            Self::Thread => "fog-thread-v1",
            Self::Post => "fog-post-v1",
            Self::Vote => "fog-vote-v1",
            Self::BoardPage => "fog-board-page-v1",
            Self::ThreadPage => "fog-thread-page-v1",
            Self::DiffPage => "fog-diff-page-v1",
            Self::UsersPage => "fog-users-page-v1",
            Self::UserActivityPage => "fog-user-activity-page-v1",
            Self::Root => "fog-root-v1",
        };
        ContentHasher::new(domain)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored object: kind tag + serialized data + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// data; typed access goes through [`Object`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub kind: ObjectKind,
    pub data: Vec<u8>,
    pub size: u64,
}

impl StoredObject {
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// The content-addressed ID of this object.
    pub fn compute_id(&self) -> ObjectId {
        self.kind.hasher().hash(&self.data)
    }
}

/// A value that can live in the store under a fixed [`ObjectKind`].
pub trait Object: Serialize + DeserializeOwned {
    const KIND: ObjectKind;

    /// Serialize into a `StoredObject` tagged with `Self::KIND`.
    fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(Self::KIND, data))
    }

    /// Decode a `StoredObject`, rejecting objects of any other kind.
    fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != Self::KIND {
            return Err(StoreError::KindMismatch {
                id: obj.compute_id(),
                expected: Self::KIND,
                actual: obj.kind,
            });
        }
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// The address this value will have once written.
    fn content_hash(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}

impl Object for Board {
    const KIND: ObjectKind = ObjectKind::Board;
}

impl Object for Thread {
    const KIND: ObjectKind = ObjectKind::Thread;
}

impl Object for Post {
    const KIND: ObjectKind = ObjectKind::Post;
}

impl Object for Vote {
    const KIND: ObjectKind = ObjectKind::Vote;
}
