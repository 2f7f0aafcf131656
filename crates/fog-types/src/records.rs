//! Leaf records stored at the far end of references.
//!
//! These are plain values. Their identity in the graph is the content hash of
//! their serialized form, so two records with identical fields are the same
//! object. `created` timestamps keep otherwise equal posts distinct.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::PubKey;
use crate::object::ObjectId;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Check a vote mode: only -1 (down), 0 (neutral) and +1 (up) are valid.
pub fn check_mode(mode: i32) -> Result<i8, TypeError> {
    match mode {
        -1..=1 => Ok(mode as i8),
        other => Err(TypeError::InvalidMode(other)),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub desc: String,
    pub created: u64,
}

impl Board {
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            created: now_millis(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub name: String,
    pub desc: String,
    pub creator: PubKey,
    pub created: u64,
}

impl Thread {
    pub fn new(name: impl Into<String>, desc: impl Into<String>, creator: PubKey) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            creator,
            created: now_millis(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub creator: PubKey,
    pub created: u64,
}

impl Post {
    pub fn new(title: impl Into<String>, body: impl Into<String>, creator: PubKey) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            creator,
            created: now_millis(),
        }
    }
}

/// A vote cast by `creator` on the object `target` (a thread, post or user).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub target: ObjectId,
    pub mode: i8,
    pub tag: String,
    pub creator: PubKey,
    pub created: u64,
}

impl Vote {
    /// Build a vote, rejecting modes outside -1..=1.
    pub fn new(
        target: ObjectId,
        mode: i32,
        tag: impl Into<String>,
        creator: PubKey,
    ) -> Result<Self, TypeError> {
        Ok(Self {
            target,
            mode: check_mode(mode)?,
            tag: tag.into(),
            creator,
            created: now_millis(),
        })
    }
}
