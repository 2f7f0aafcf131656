//! Foundation types for the Forum Object Graph (FOG).
//!
//! Every other FOG crate depends on `fog-types`. It holds the values that sit
//! at the far end of references in the object graph, plus the identifiers and
//! error taxonomy shared by the store and the page layer.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (BLAKE3 hash)
//! - [`Board`], [`Thread`], [`Post`], [`Vote`] — Leaf forum records
//! - [`User`], [`PubKey`], [`SecKey`] — Identity material
//! - [`Connection`] — Peer connection descriptor
//! - [`ErrorKind`] — Classification reported by every FOG error

pub mod connection;
pub mod error;
pub mod identity;
pub mod object;
pub mod records;

pub use connection::{check_address, Connection, ConnectionState};
pub use error::{ErrorKind, TypeError};
pub use identity::{PubKey, SecKey, User, UserView};
pub use object::ObjectId;
pub use records::{check_mode, now_millis, Board, Post, Thread, Vote};
