//! Content-addressed object storage for the Forum Object Graph.
//!
//! Every value in the forum (boards, threads, posts, votes and the pages
//! that link them) is stored as an immutable object identified by its
//! BLAKE3 hash (domain-separated by object kind). On top of the raw store
//! this crate provides typed handles:
//!
//! - [`Ref<T>`] — a single reference that resolves to a `T` or fails
//! - [`RefList<T>`] — an ordered, append-only list of references
//! - [`Element<T>`] — a reference bound to its position in a list
//! - [`Store`] — the object store plus a versioned [`Root`] with fixed,
//!   indexed child slots
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; writing the same bytes twice is a no-op.
//! 2. Reads recompute the hash and reject corrupted objects.
//! 3. A reference's expected kind is carried by its type parameter; decoding
//!    an object of another kind is an error, never a silent reinterpretation.
//! 4. There is no delete. Lists only grow; the root only advances.

pub mod error;
pub mod memory;
pub mod object;
pub mod reference;
pub mod root;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{Object, ObjectKind, StoredObject};
pub use reference::{Element, Ref, RefList};
pub use root::{Root, Store};
pub use traits::ObjectStore;
