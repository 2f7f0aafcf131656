//! Typed references into the object store.
//!
//! A [`Ref<T>`] is an [`ObjectId`] that remembers, at the type level, which
//! kind of object it points at. Resolution decodes with `T`, so a reference
//! to a thread can never hand back a post: the stored kind is checked against
//! `T::KIND` and a mismatch is an error.
//!
//! A [`RefList<T>`] is an ordered sequence of references. It only grows.
//! Position `i` holds the `i`-th appended entry for the lifetime of the list,
//! which is what lets a reader resume from a remembered length.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use fog_types::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::Object;
use crate::traits::ObjectStore;

/// A content-addressed pointer to a `T`.
pub struct Ref<T> {
    id: ObjectId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    /// Wrap an ID. Nothing is checked until the reference is resolved.
    pub const fn from_id(id: ObjectId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl<T: Object> Ref<T> {
    /// Write `value` and return a reference to it.
    pub fn store(store: &dyn ObjectStore, value: &T) -> StoreResult<Self> {
        let id = store.write(&value.to_stored_object()?)?;
        Ok(Self::from_id(id))
    }

    /// Read and decode the referenced value.
    pub fn resolve(&self, store: &dyn ObjectStore) -> StoreResult<T> {
        let obj = store.read(&self.id)?.ok_or(StoreError::NotFound(self.id))?;
        T::from_stored_object(&obj)
    }

    /// Point this reference at a new value.
    pub fn set_value(&mut self, store: &dyn ObjectStore, value: &T) -> StoreResult<()> {
        self.id = store.write(&value.to_stored_object()?)?;
        Ok(())
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Ref<T> {}

impl<T> std::hash::Hash for Ref<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: Object> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref<{}>({})", T::KIND, self.id.short_hex())
    }
}

impl<T> Serialize for Ref<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Ref<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ObjectId::deserialize(deserializer).map(Self::from_id)
    }
}

/// A reference bound to its position in a [`RefList`].
///
/// Returned by list lookups so the caller can later write a modified value
/// back into the same slot with [`RefList::set`].
pub struct Element<T> {
    index: usize,
    reference: Ref<T>,
}

impl<T> Element<T> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reference(&self) -> Ref<T> {
        self.reference
    }

    pub fn id(&self) -> ObjectId {
        self.reference.id
    }
}

impl<T> Clone for Element<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Element<T> {}

impl<T> PartialEq for Element<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.reference == other.reference
    }
}

impl<T> Eq for Element<T> {}

impl<T: Object> fmt::Debug for Element<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element[{}]({:?})", self.index, self.reference)
    }
}

/// An ordered, append-only list of references to `T`.
pub struct RefList<T> {
    ids: Vec<ObjectId>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RefList<T> {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of the first entry with this hash.
    pub fn position(&self, id: &ObjectId) -> Option<usize> {
        self.ids.iter().position(|entry| entry == id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.position(id).is_some()
    }

    /// Append an existing reference. Length grows by exactly one.
    pub fn push(&mut self, reference: Ref<T>) -> Element<T> {
        self.ids.push(reference.id);
        Element {
            index: self.ids.len() - 1,
            reference,
        }
    }

    /// The reference at `index` (0-based).
    pub fn by_index(&self, index: usize) -> StoreResult<Ref<T>> {
        self.ids
            .get(index)
            .map(|id| Ref::from_id(*id))
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.ids.len(),
            })
    }

    /// The element at `index`.
    pub fn element(&self, index: usize) -> StoreResult<Element<T>> {
        let reference = self.by_index(index)?;
        Ok(Element { index, reference })
    }

    /// The first element whose hash is `id`.
    pub fn by_hash(&self, id: &ObjectId) -> StoreResult<Element<T>> {
        let index = self.position(id).ok_or(StoreError::NotInList(*id))?;
        Ok(Element {
            index,
            reference: Ref::from_id(*id),
        })
    }

    /// All references in append order.
    pub fn refs(&self) -> impl Iterator<Item = Ref<T>> + '_ {
        self.ids.iter().map(|id| Ref::from_id(*id))
    }
}

impl<T: Object> RefList<T> {
    /// Write `value` and append a reference to it.
    pub fn append(&mut self, store: &dyn ObjectStore, value: &T) -> StoreResult<Element<T>> {
        let reference = Ref::store(store, value)?;
        let element = self.push(reference);
        debug!(
            kind = %T::KIND,
            index = element.index,
            hash = %reference.id.short_hex(),
            "appended reference"
        );
        Ok(element)
    }

    /// Resolve the entry at `index`.
    pub fn resolve(&self, store: &dyn ObjectStore, index: usize) -> StoreResult<T> {
        self.by_index(index)?.resolve(store)
    }

    /// Resolve every entry in `range`, in order. The first failure aborts.
    pub fn resolve_range(&self, store: &dyn ObjectStore, range: Range<usize>) -> StoreResult<Vec<T>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        if range.end > self.ids.len() {
            return Err(StoreError::IndexOutOfRange {
                index: range.end.saturating_sub(1),
                len: self.ids.len(),
            });
        }
        self.ids[range]
            .iter()
            .map(|id| Ref::<T>::from_id(*id).resolve(store))
            .collect()
    }

    /// Replace the value held in `element`'s slot.
    ///
    /// The slot keeps its position; only its hash changes. Fails if the slot
    /// no longer holds the hash the element was read with.
    pub fn set(
        &mut self,
        store: &dyn ObjectStore,
        element: &Element<T>,
        value: &T,
    ) -> StoreResult<Element<T>> {
        let len = self.ids.len();
        let slot = self
            .ids
            .get_mut(element.index)
            .ok_or(StoreError::IndexOutOfRange {
                index: element.index,
                len,
            })?;
        if *slot != element.reference.id {
            return Err(StoreError::StaleElement {
                index: element.index,
                expected: element.reference.id,
                found: *slot,
            });
        }
        let reference = Ref::store(store, value)?;
        *slot = reference.id;
        debug!(
            kind = %T::KIND,
            index = element.index,
            hash = %reference.id.short_hex(),
            "replaced reference"
        );
        Ok(Element {
            index: element.index,
            reference,
        })
    }
}

impl<T> Default for RefList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RefList<T> {
    fn clone(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for RefList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl<T> Eq for RefList<T> {}

impl<T: Object> fmt::Debug for RefList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefList")
            .field("kind", &T::KIND)
            .field("len", &self.ids.len())
            .finish()
    }
}

impl<T> Serialize for RefList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ids.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for RefList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            ids: Vec::deserialize(deserializer)?,
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryObjectStore;
    use fog_types::{Post, PubKey, Thread};

    fn post(n: u64) -> Post {
        Post {
            title: format!("post {n}"),
            body: "body".into(),
            creator: PubKey::from_bytes([7; 32]),
            created: n,
        }
    }

    // -----------------------------------------------------------------------
    // Ref<T>
    // -----------------------------------------------------------------------

    #[test]
    fn ref_store_and_resolve() {
        let store = InMemoryObjectStore::new();
        let r = Ref::store(&store, &post(1)).unwrap();
        assert_eq!(r.resolve(&store).unwrap(), post(1));
        assert_eq!(r.id(), post(1).content_hash().unwrap());
    }

    #[test]
    fn ref_resolve_wrong_kind_fails() {
        let store = InMemoryObjectStore::new();
        let r = Ref::store(&store, &post(1)).unwrap();
        let as_thread: Ref<Thread> = Ref::from_id(r.id());
        let err = as_thread.resolve(&store).unwrap_err();
        assert!(matches!(err, StoreError::KindMismatch { .. }));
    }

    #[test]
    fn ref_resolve_missing_fails() {
        let store = InMemoryObjectStore::new();
        let r: Ref<Post> = Ref::from_id(ObjectId::from_bytes(b"gone"));
        assert!(matches!(r.resolve(&store), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn ref_set_value_repoints() {
        let store = InMemoryObjectStore::new();
        let mut r = Ref::store(&store, &post(1)).unwrap();
        let before = r.id();
        r.set_value(&store, &post(2)).unwrap();
        assert_ne!(r.id(), before);
        assert_eq!(r.resolve(&store).unwrap(), post(2));
    }

    #[test]
    fn ref_serializes_as_bare_id() {
        let r: Ref<Post> = Ref::from_id(ObjectId::from_bytes(b"x"));
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, serde_json::to_string(&r.id()).unwrap());
        let back: Ref<Post> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    // -----------------------------------------------------------------------
    // RefList<T>
    // -----------------------------------------------------------------------

    #[test]
    fn append_grows_by_one_in_order() {
        let store = InMemoryObjectStore::new();
        let mut list = RefList::new();
        for n in 0..4 {
            let el = list.append(&store, &post(n)).unwrap();
            assert_eq!(el.index(), n as usize);
            assert_eq!(list.len(), n as usize + 1);
        }
        assert_eq!(list.resolve(&store, 2).unwrap(), post(2));
    }

    #[test]
    fn lookup_by_index_and_hash() {
        let store = InMemoryObjectStore::new();
        let mut list = RefList::new();
        list.append(&store, &post(0)).unwrap();
        let second = list.append(&store, &post(1)).unwrap();

        assert_eq!(list.by_index(1).unwrap(), second.reference());
        assert_eq!(list.by_hash(&second.id()).unwrap(), second);
        assert!(matches!(
            list.by_index(2),
            Err(StoreError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            list.by_hash(&ObjectId::from_bytes(b"absent")),
            Err(StoreError::NotInList(_))
        ));
    }

    #[test]
    fn resolve_range_is_half_open() {
        let store = InMemoryObjectStore::new();
        let mut list = RefList::new();
        for n in 0..5 {
            list.append(&store, &post(n)).unwrap();
        }
        let got = list.resolve_range(&store, 2..5).unwrap();
        assert_eq!(got, vec![post(2), post(3), post(4)]);
        assert!(list.resolve_range(&store, 3..3).unwrap().is_empty());
        assert!(list.resolve_range(&store, 4..6).is_err());
    }

    #[test]
    fn set_replaces_in_place() {
        let store = InMemoryObjectStore::new();
        let mut list = RefList::new();
        list.append(&store, &post(0)).unwrap();
        let el = list.append(&store, &post(1)).unwrap();
        list.append(&store, &post(2)).unwrap();

        let updated = list.set(&store, &el, &post(9)).unwrap();
        assert_eq!(updated.index(), 1);
        assert_eq!(list.len(), 3);
        assert_eq!(list.resolve(&store, 1).unwrap(), post(9));
        assert!(!list.contains(&el.id()));
    }

    #[test]
    fn set_through_stale_element_fails() {
        let store = InMemoryObjectStore::new();
        let mut list = RefList::new();
        let el = list.append(&store, &post(0)).unwrap();
        list.set(&store, &el, &post(1)).unwrap();

        let err = list.set(&store, &el, &post(2)).unwrap_err();
        assert!(matches!(err, StoreError::StaleElement { index: 0, .. }));
    }

    #[test]
    fn list_serde_roundtrip() {
        let store = InMemoryObjectStore::new();
        let mut list = RefList::new();
        list.append(&store, &post(0)).unwrap();
        list.append(&store, &post(1)).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        let back: RefList<Post> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
        assert_eq!(back.refs().count(), 2);
    }

    proptest::proptest! {
        #[test]
        fn positions_never_move(bodies in proptest::collection::vec(0u64..1000, 1..20)) {
            let store = InMemoryObjectStore::new();
            let mut list = RefList::new();
            let mut seen = Vec::new();
            for n in &bodies {
                seen.push(list.append(&store, &post(*n)).unwrap().reference());
                for (i, r) in seen.iter().enumerate() {
                    proptest::prop_assert_eq!(list.by_index(i).unwrap(), *r);
                }
            }
        }
    }
}
