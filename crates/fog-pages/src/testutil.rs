//! Shared fixtures for the page tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fog_crypto::SigningKey;
use fog_store::{InMemoryObjectStore, ObjectStore, Store, StoreError, StoreResult, StoredObject};
use fog_types::{ObjectId, Post, PubKey};

use crate::config::ForumConfig;
use crate::forum::Forum;

pub(crate) fn author() -> PubKey {
    SigningKey::from_seed("test author").unwrap().pub_key()
}

pub(crate) fn post(title: &str) -> Post {
    Post::new(title, "body", author())
}

/// A non-master forum with no root.
pub(crate) fn forum() -> Forum {
    Forum::in_memory(ForumConfig::default()).unwrap()
}

pub(crate) fn master_forum() -> Forum {
    Forum::in_memory(ForumConfig {
        master: true,
        ..ForumConfig::default()
    })
    .unwrap()
}

/// An in-memory store whose writes can be switched off mid-test.
#[derive(Default)]
pub(crate) struct SwitchedStore {
    inner: InMemoryObjectStore,
    refuse: AtomicBool,
}

impl SwitchedStore {
    pub(crate) fn refuse_writes(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }
}

impl ObjectStore for SwitchedStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        self.inner.read(id)
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(StoreError::LockPoisoned);
        }
        self.inner.write(object)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        self.inner.exists(id)
    }
}

/// A non-master forum over a [`SwitchedStore`].
pub(crate) fn switched_forum() -> (Forum, Arc<SwitchedStore>) {
    let objects = Arc::new(SwitchedStore::default());
    let store = Store::new(Arc::clone(&objects) as Arc<dyn ObjectStore>);
    let forum = Forum::new(store, ForumConfig::default()).unwrap();
    (forum, objects)
}
