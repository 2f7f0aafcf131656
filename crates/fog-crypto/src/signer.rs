use fog_types::{PubKey, SecKey, User};

/// Ed25519 signing key backing a local forum user.
pub struct SigningKey(ed25519_dalek::SigningKey);

impl SigningKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Derive a key deterministically from a seed phrase.
    ///
    /// The same seed always yields the same identity, so a user can recover
    /// their keys from the seed alone.
    pub fn from_seed(seed: &str) -> Result<Self, KeyError> {
        if seed.trim().is_empty() {
            return Err(KeyError::EmptySeed);
        }
        let secret = blake3::derive_key("fog-user-seed-v1", seed.as_bytes());
        Ok(Self(ed25519_dalek::SigningKey::from_bytes(&secret)))
    }

    pub fn from_sec_key(key: &SecKey) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(key.as_bytes()))
    }

    pub fn pub_key(&self) -> PubKey {
        PubKey::from_bytes(self.0.verifying_key().to_bytes())
    }

    pub fn sec_key(&self) -> SecKey {
        SecKey::from_bytes(self.0.to_bytes())
    }

    /// A local user holding this key.
    pub fn to_user(&self, alias: impl Into<String>) -> User {
        User {
            alias: alias.into(),
            pub_key: self.pub_key(),
            sec_key: Some(self.sec_key()),
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

/// Check that a user's public key is a valid curve point and, for local
/// users, that it matches their secret key.
pub fn check_user(user: &User) -> Result<(), KeyError> {
    ed25519_dalek::VerifyingKey::from_bytes(user.pub_key.as_bytes())
        .map_err(|_| KeyError::InvalidPubKey)?;
    if let Some(sec) = &user.sec_key {
        if SigningKey::from_sec_key(sec).pub_key() != user.pub_key {
            return Err(KeyError::Mismatch);
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("seed must not be empty")]
    EmptySeed,
    #[error("public key is not a valid ed25519 point")]
    InvalidPubKey,
    #[error("public key does not match secret key")]
    Mismatch,
}
