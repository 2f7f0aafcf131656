//! The Forum Object Graph: a forum's whole state as an immutable,
//! content-addressed graph under one versioned root, plus incremental change
//! sets between versions.
//!
//! The root has three slots ([`PageKind`]):
//!
//! - [`BoardPage`] — the board and its [`ThreadPage`]s, each holding posts
//! - [`DiffPage`] — append-only logs of every thread, post and vote
//! - [`UsersPage`] — one [`UserActivityPage`] per registered key
//!
//! All access goes through a [`Session`], obtained from [`Forum::begin`] and
//! holding the forum lock for as long as it lives. A typical round trip loads
//! the pages it needs with [`Pages::load`], mutates them, and writes them back
//! with [`Pages::save`]; [`Session`] bundles the common round trips.
//!
//! ```ignore
//! let forum = Forum::in_memory(ForumConfig { master: true, ..Default::default() })?;
//! forum.genesis(&Board::new("general", ""))?;
//!
//! let session = forum.begin()?;
//! let seen = session.changes(None)?;
//! session.create_thread(&Thread::new("hello", "", key.pub_key()))?;
//! let changes = session.changes(Some(&seen))?; // new_threads == [hello]
//! ```

pub mod board;
pub mod config;
pub mod diff;
pub mod error;
pub mod forum;
pub mod pages;
pub mod session;
pub mod telemetry;
pub mod thread;
pub mod users;

#[cfg(test)]
pub(crate) mod testutil;

pub use board::BoardPage;
pub use config::ForumConfig;
pub use diff::{Changes, Content, DiffPage};
pub use error::{PageError, PageResult};
pub use forum::Forum;
pub use pages::{PageKind, Pages, ROOT_SLOTS};
pub use session::{Posted, Session};
pub use thread::ThreadPage;
pub use users::{UserActivityPage, UsersPage};
