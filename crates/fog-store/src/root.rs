//! The versioned root object and the store handle that tracks it.
//!
//! A [`Root`] has a fixed number of child slots chosen when the store is
//! initialized. Writing a slot produces a new root object with `seq + 1`, and
//! the store's head moves to that new root's hash. Old roots stay readable.

use std::sync::{Arc, RwLock};

use fog_types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryObjectStore;
use crate::object::{Object, ObjectKind};
use crate::reference::Ref;
use crate::traits::ObjectStore;

/// The single object all graph traversal starts from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Version counter; bumped on every slot write.
    pub seq: u64,
    /// Child slots by index. `None` until first written.
    pub children: Vec<Option<ObjectId>>,
}

impl Root {
    pub fn new(slots: usize) -> Self {
        Self {
            seq: 0,
            children: vec![None; slots],
        }
    }

    /// The child in `index`, failing if the slot does not exist or is empty.
    pub fn child(&self, index: usize) -> StoreResult<ObjectId> {
        self.children
            .get(index)
            .copied()
            .ok_or(StoreError::SlotOutOfRange {
                index,
                slots: self.children.len(),
            })?
            .ok_or(StoreError::EmptySlot(index))
    }
}

impl Object for Root {
    const KIND: ObjectKind = ObjectKind::Root;
}

/// An object store plus the hash of its current root.
pub struct Store {
    objects: Arc<dyn ObjectStore>,
    head: RwLock<Option<ObjectId>>,
}

impl Store {
    /// A store with no root yet. Call [`Store::init`] before use.
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self {
            objects,
            head: RwLock::new(None),
        }
    }

    /// An empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryObjectStore::new()))
    }

    /// Reopen a store at a known root, checking that the root resolves.
    pub fn open(objects: Arc<dyn ObjectStore>, head: ObjectId) -> StoreResult<Self> {
        Ref::<Root>::from_id(head).resolve(objects.as_ref())?;
        Ok(Self {
            objects,
            head: RwLock::new(Some(head)),
        })
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        self.objects.as_ref()
    }

    /// Hash of the current root, if any.
    pub fn head(&self) -> StoreResult<Option<ObjectId>> {
        let head = self.head.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(*head)
    }

    /// Write an empty root with `slots` child slots and make it the head.
    pub fn init(&self, slots: usize) -> StoreResult<ObjectId> {
        let mut head = self.head.write().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(existing) = *head {
            return Err(StoreError::AlreadyInitialized(existing));
        }
        let id = Ref::store(self.objects(), &Root::new(slots))?.id();
        *head = Some(id);
        info!(root = %id.short_hex(), slots, "initialized root");
        Ok(id)
    }

    /// The current root.
    pub fn root(&self) -> StoreResult<Root> {
        let head = self.head()?.ok_or(StoreError::Uninitialized)?;
        Ref::<Root>::from_id(head).resolve(self.objects())
    }

    /// Reference held in root slot `index`.
    pub fn slot<T: Object>(&self, index: usize) -> StoreResult<Ref<T>> {
        Ok(Ref::from_id(self.root()?.child(index)?))
    }

    /// Resolve the value held in root slot `index`.
    pub fn resolve_by_index<T: Object>(&self, index: usize) -> StoreResult<T> {
        self.slot::<T>(index)?.resolve(self.objects())
    }

    /// Store `value` in root slot `index`, producing a new root.
    ///
    /// Returns the new root hash, which is also the new head.
    pub fn set_by_index<T: Object>(&self, index: usize, value: &T) -> StoreResult<ObjectId> {
        let mut head = self.head.write().map_err(|_| StoreError::LockPoisoned)?;
        let current = (*head).ok_or(StoreError::Uninitialized)?;
        let mut root = Ref::<Root>::from_id(current).resolve(self.objects())?;

        let slots = root.children.len();
        let slot = root
            .children
            .get_mut(index)
            .ok_or(StoreError::SlotOutOfRange { index, slots })?;
        *slot = Some(Ref::store(self.objects(), value)?.id());
        root.seq += 1;

        let id = Ref::store(self.objects(), &root)?.id();
        *head = Some(id);
        debug!(
            slot = index,
            kind = %T::KIND,
            seq = root.seq,
            root = %id.short_hex(),
            "advanced root"
        );
        Ok(id)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("head", &self.head().ok().flatten())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_types::{Board, PubKey, Thread};

    fn board(name: &str) -> Board {
        Board {
            name: name.into(),
            desc: String::new(),
            created: 0,
        }
    }

    #[test]
    fn uninitialized_store_has_no_root() {
        let store = Store::in_memory();
        assert!(store.head().unwrap().is_none());
        assert!(matches!(store.root(), Err(StoreError::Uninitialized)));
        assert!(matches!(
            store.set_by_index(0, &board("b")),
            Err(StoreError::Uninitialized)
        ));
    }

    #[test]
    fn init_creates_empty_slots_once() {
        let store = Store::in_memory();
        let id = store.init(3).unwrap();
        assert_eq!(store.head().unwrap(), Some(id));
        assert_eq!(store.root().unwrap(), Root::new(3));
        assert!(matches!(store.init(3), Err(StoreError::AlreadyInitialized(_))));
        assert!(matches!(
            store.resolve_by_index::<Board>(1),
            Err(StoreError::EmptySlot(1))
        ));
    }

    #[test]
    fn every_set_advances_head() {
        let store = Store::in_memory();
        let genesis = store.init(2).unwrap();
        let first = store.set_by_index(0, &board("b")).unwrap();
        let second = store.set_by_index(0, &board("b")).unwrap();
        assert_ne!(genesis, first);
        assert_ne!(first, second);
        assert_eq!(store.root().unwrap().seq, 2);
        assert_eq!(store.resolve_by_index::<Board>(0).unwrap(), board("b"));
    }

    #[test]
    fn slot_bounds_and_kinds_are_checked() {
        let store = Store::in_memory();
        store.init(1).unwrap();
        assert!(matches!(
            store.set_by_index(1, &board("b")),
            Err(StoreError::SlotOutOfRange { index: 1, slots: 1 })
        ));
        store.set_by_index(0, &board("b")).unwrap();
        let err = store.resolve_by_index::<Thread>(0).unwrap_err();
        assert!(matches!(err, StoreError::KindMismatch { .. }));
    }

    #[test]
    fn reopen_at_previous_root() {
        let objects: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
        let store = Store::new(Arc::clone(&objects));
        store.init(1).unwrap();
        let old = store.set_by_index(0, &board("old")).unwrap();
        store.set_by_index(0, &board("new")).unwrap();

        let reopened = Store::open(Arc::clone(&objects), old).unwrap();
        assert_eq!(reopened.resolve_by_index::<Board>(0).unwrap(), board("old"));

        let thread = Thread {
            name: "t".into(),
            desc: String::new(),
            creator: PubKey::from_bytes([1; 32]),
            created: 0,
        };
        let not_a_root = Ref::store(objects.as_ref(), &thread).unwrap().id();
        assert!(Store::open(objects, not_a_root).is_err());
    }
}
