use fog_store::{Element, Object, ObjectKind, Ref, RefList};
use fog_types::{ObjectId, Post, Thread};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::BoardPage;
use crate::error::{PageError, PageResult};
use crate::session::Session;

/// A thread and its posts.
///
/// `posts` never holds two entries with the same hash; [`ThreadPage::add_post`]
/// checks the post being appended against the list before writing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPage {
    pub thread: Ref<Thread>,
    pub posts: RefList<Post>,
}

impl Object for ThreadPage {
    const KIND: ObjectKind = ObjectKind::ThreadPage;
}

impl ThreadPage {
    /// An empty page for an already stored thread.
    pub fn new(thread: Ref<Thread>) -> Self {
        Self {
            thread,
            posts: RefList::new(),
        }
    }

    pub fn thread(&self, session: &Session<'_>) -> PageResult<Thread> {
        self.thread
            .resolve(session.objects())
            .map_err(|e| PageError::read(format!("thread {:?}", self.thread.id()), e))
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// All posts in the order they were added.
    pub fn posts(&self, session: &Session<'_>) -> PageResult<Vec<Post>> {
        self.posts
            .resolve_range(session.objects(), 0..self.posts.len())
            .map_err(|e| PageError::lookup("thread_page.posts".into(), e))
    }

    /// Append `post`, whose content hash is `hash`, at most once.
    ///
    /// Fails with `AlreadyExists` if a post with this hash is already in the
    /// thread, and with `InvalidInput` if `hash` is not the post's hash.
    pub fn add_post(
        &mut self,
        session: &Session<'_>,
        hash: &ObjectId,
        post: &Post,
    ) -> PageResult<Ref<Post>> {
        let computed = post
            .content_hash()
            .map_err(|e| PageError::internal("add_post", "post".into(), e))?;
        if computed != *hash {
            return Err(PageError::InvalidInput(format!(
                "post hash {hash:?} does not match content hash {computed:?}"
            )));
        }
        if self.posts.contains(hash) {
            return Err(PageError::AlreadyExists {
                target: format!("post {hash:?} in thread {:?}", self.thread.id()),
            });
        }
        let element = self
            .posts
            .append(session.objects(), post)
            .map_err(|e| PageError::internal("add_post", format!("thread_page.posts {hash:?}"), e))?;
        debug!(
            thread = %self.thread.id().short_hex(),
            post = %hash.short_hex(),
            index = element.index(),
            "added post"
        );
        Ok(element.reference())
    }

    /// Write this page back into `board` through the element it was loaded
    /// from. Returns the element for the page's new hash.
    pub fn save(
        &self,
        session: &Session<'_>,
        board: &mut BoardPage,
        element: &Element<ThreadPage>,
    ) -> PageResult<Element<ThreadPage>> {
        board
            .threads
            .set(session.objects(), element, self)
            .map_err(|e| {
                PageError::internal(
                    "save",
                    format!("board_page.threads[{}]", element.index()),
                    e,
                )
            })
    }
}
