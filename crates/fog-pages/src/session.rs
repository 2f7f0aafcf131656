//! A held forum lock, and the workflows that run under it.
//!
//! Every page operation takes a `&Session`, so store access outside the lock
//! does not type-check. One session covers a whole load, mutate and save
//! sequence; two sessions never overlap.

use std::sync::MutexGuard;

use fog_crypto::check_user;
use fog_store::{Object, ObjectStore, Ref, Store};
use fog_types::{ObjectId, Post, Thread, User, Vote};
use tracing::info;

use crate::diff::{Changes, Content};
use crate::error::{PageError, PageResult};
use crate::pages::{PageKind, Pages};

pub struct Session<'a> {
    store: &'a Store,
    _guard: MutexGuard<'a, ()>,
}

/// Hashes produced by [`Session::create_post`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posted {
    /// The post itself.
    pub post: ObjectId,
    /// The thread page after the post was added. The hash the caller passed
    /// in is no longer in the board.
    pub thread_page: ObjectId,
}

impl<'a> Session<'a> {
    pub(crate) fn new(store: &'a Store, guard: MutexGuard<'a, ()>) -> Self {
        Self {
            store,
            _guard: guard,
        }
    }

    pub fn store(&self) -> &Store {
        self.store
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        self.store.objects()
    }

    /// Start a thread on the board. Returns the new thread page's hash.
    pub fn create_thread(&self, thread: &Thread) -> PageResult<ObjectId> {
        let mut pages = Pages::load(self, &[PageKind::Board, PageKind::Diff])?;
        let thread_ref = Ref::store(self.objects(), thread)
            .map_err(|e| PageError::write("store", "thread".into(), e))?;
        let element = pages.board_mut()?.add_thread(self, thread_ref)?;
        pages.diff_mut()?.add(self, &Content::Thread(thread.clone()))?;
        let root = pages.save(self)?;
        info!(
            thread_page = %element.id().short_hex(),
            root = %root.short_hex(),
            "created thread"
        );
        Ok(element.id())
    }

    /// Add `post` to the thread page with hash `thread_page`.
    pub fn create_post(&self, thread_page: &ObjectId, post: &Post) -> PageResult<Posted> {
        let mut pages = Pages::load(self, &[PageKind::Board, PageKind::Diff])?;
        let hash = post
            .content_hash()
            .map_err(|e| PageError::internal("create_post", "post".into(), e))?;

        let board = pages.board_mut()?;
        let (element, mut page) = board.thread_page(self, thread_page)?;
        page.add_post(self, &hash, post)?;
        let saved = page.save(self, board, &element)?;

        pages.diff_mut()?.add(self, &Content::Post(post.clone()))?;
        let root = pages.save(self)?;
        info!(
            post = %hash.short_hex(),
            thread_page = %saved.id().short_hex(),
            root = %root.short_hex(),
            "created post"
        );
        Ok(Posted {
            post: hash,
            thread_page: saved.id(),
        })
    }

    /// Give `user` an activity page. Returns the page's hash.
    pub fn register_user(&self, user: &User) -> PageResult<ObjectId> {
        check_user(user)?;
        let mut pages = Pages::load(self, &[PageKind::Users])?;
        let hash = pages
            .users_mut()?
            .new_user_activity_page(self, user.pub_key)?;
        pages.save(self)?;
        info!(alias = %user.alias, page = %hash.short_hex(), "registered user");
        Ok(hash)
    }

    /// Record `vote` on its creator's activity page and in the change log.
    ///
    /// Returns the activity page's new hash.
    pub fn cast_vote(&self, user_page: &ObjectId, vote: &Vote) -> PageResult<ObjectId> {
        let mut pages = Pages::load(self, &[PageKind::Diff, PageKind::Users])?;
        let users = pages.users_mut()?;
        let (_, page) = users.user_activity(self, user_page)?;
        if page.pub_key != vote.creator {
            return Err(PageError::NotAllowed {
                op: "cast_vote",
                target: format!("users_page.users {user_page:?}"),
                reason: "vote creator does not own this activity page".into(),
            });
        }
        let content = Content::Vote(vote.clone());
        let hash = users.add_user_activity(self, user_page, &content)?;
        pages.diff_mut()?.add(self, &content)?;
        pages.save(self)?;
        Ok(hash)
    }

    /// What changed in the log since `old`. See [`crate::DiffPage::changes`].
    pub fn changes(&self, old: Option<&Changes>) -> PageResult<Changes> {
        let pages = Pages::load(self, &[PageKind::Diff])?;
        pages.diff()?.changes(self, old)
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("store", self.store).finish()
    }
}
