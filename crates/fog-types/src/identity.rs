use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::object::decode_hex32;

/// Raw ed25519 public key bytes identifying a forum participant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PubKey([u8; 32]);

impl PubKey {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        decode_hex32(s).map(Self)
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Raw ed25519 secret key bytes. Never serialized and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecKey([u8; 32]);

impl SecKey {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        decode_hex32(s).map(Self)
    }
}

impl fmt::Debug for SecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecKey(<redacted>)")
    }
}

/// A forum identity.
///
/// `sec_key` is skipped by serde, so any serialized form of a user (stored
/// objects, JSON handed to a client) carries only the alias and public key.
/// A deserialized user therefore has no secret key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub alias: String,
    pub pub_key: PubKey,
    #[serde(skip)]
    pub sec_key: Option<SecKey>,
}

impl User {
    /// A user known only by public key (e.g. learned from another peer).
    pub fn public(alias: impl Into<String>, pub_key: PubKey) -> Self {
        Self {
            alias: alias.into(),
            pub_key,
            sec_key: None,
        }
    }

    /// Returns `true` if this user can sign (holds a secret key).
    pub fn is_local(&self) -> bool {
        self.sec_key.is_some()
    }

    /// The user as shown to clients: alias and hex public key.
    pub fn view(&self) -> UserView {
        UserView {
            alias: self.alias.clone(),
            public_key: self.pub_key.to_hex(),
            secret_key: None,
        }
    }

    /// Like [`User::view`], but also carrying the hex secret key of a local
    /// user. Only for handing keys back to their owner.
    pub fn export_view(&self) -> UserView {
        UserView {
            secret_key: self.sec_key.as_ref().map(SecKey::to_hex),
            ..self.view()
        }
    }
}

/// External JSON form of a [`User`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub alias: String,
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl UserView {
    /// Parse the hex keys back into a [`User`].
    pub fn to_user(&self) -> Result<User, TypeError> {
        Ok(User {
            alias: self.alias.clone(),
            pub_key: PubKey::from_hex(&self.public_key)?,
            sec_key: self
                .secret_key
                .as_deref()
                .map(SecKey::from_hex)
                .transpose()?,
        })
    }
}
