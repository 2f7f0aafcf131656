//! Cryptographic primitives for the Forum Object Graph.
//!
//! Provides the domain-separated BLAKE3 hasher that assigns every stored
//! object its content address, and ed25519 key material for forum users.
//!
//! All crypto operations wrap established libraries.

pub mod hasher;
pub mod signer;

pub use hasher::{ContentHasher, HasherError};
pub use signer::{check_user, KeyError, SigningKey};
