//! The forum-wide change log and the incremental diff over it.
//!
//! [`DiffPage`] holds three append-only lists, one per kind of content. A
//! consumer remembers the [`Changes`] it last saw and passes it back to
//! [`DiffPage::changes`]; only the entries appended since then are resolved.

use fog_store::{Object, ObjectKind, RefList};
use fog_types::{ObjectId, Post, Thread, Vote};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PageError, PageResult};
use crate::session::Session;

/// Anything that can appear in the change log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    Thread(Thread),
    Post(Post),
    Vote(Vote),
}

impl Content {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Thread(_) => "thread",
            Self::Post(_) => "post",
            Self::Vote(_) => "vote",
        }
    }
}

impl From<Thread> for Content {
    fn from(thread: Thread) -> Self {
        Self::Thread(thread)
    }
}

impl From<Post> for Content {
    fn from(post: Post) -> Self {
        Self::Post(post)
    }
}

impl From<Vote> for Content {
    fn from(vote: Vote) -> Self {
        Self::Vote(vote)
    }
}

/// What a consumer learned from one call to [`DiffPage::changes`].
///
/// The counts are the list lengths at the time of the call. The `new_*`
/// vectors hold the entries appended since the previous snapshot, in append
/// order. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    pub thread_count: usize,
    pub post_count: usize,
    pub vote_count: usize,
    pub new_threads: Vec<Thread>,
    pub new_posts: Vec<Post>,
    pub new_votes: Vec<Vote>,
}

impl Changes {
    /// `true` when nothing new was found.
    pub fn is_empty(&self) -> bool {
        self.new_threads.is_empty() && self.new_posts.is_empty() && self.new_votes.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPage {
    pub threads: RefList<Thread>,
    pub posts: RefList<Post>,
    pub votes: RefList<Vote>,
}

impl Object for DiffPage {
    const KIND: ObjectKind = ObjectKind::DiffPage;
}

impl DiffPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `content` to the list matching its variant.
    ///
    /// Returns the content's hash.
    pub fn add(&mut self, session: &Session<'_>, content: &Content) -> PageResult<ObjectId> {
        let store = session.objects();
        let appended = match content {
            Content::Thread(thread) => self.threads.append(store, thread).map(|e| (e.index(), e.id())),
            Content::Post(post) => self.posts.append(store, post).map(|e| (e.index(), e.id())),
            Content::Vote(vote) => self.votes.append(store, vote).map(|e| (e.index(), e.id())),
        };
        let (index, id) = appended
            .map_err(|e| PageError::internal("add", format!("diff_page.{}s", content.name()), e))?;
        debug!(kind = content.name(), index, hash = %id.short_hex(), "logged change");
        Ok(id)
    }

    pub fn thread_at(&self, session: &Session<'_>, index: usize) -> PageResult<Thread> {
        self.threads
            .resolve(session.objects(), index)
            .map_err(|e| PageError::lookup(format!("diff_page.threads[{index}]"), e))
    }

    pub fn post_at(&self, session: &Session<'_>, index: usize) -> PageResult<Post> {
        self.posts
            .resolve(session.objects(), index)
            .map_err(|e| PageError::lookup(format!("diff_page.posts[{index}]"), e))
    }

    pub fn vote_at(&self, session: &Session<'_>, index: usize) -> PageResult<Vote> {
        self.votes
            .resolve(session.objects(), index)
            .map_err(|e| PageError::lookup(format!("diff_page.votes[{index}]"), e))
    }

    /// Current list lengths with nothing resolved.
    pub fn counts(&self) -> Changes {
        Changes {
            thread_count: self.threads.len(),
            post_count: self.posts.len(),
            vote_count: self.votes.len(),
            ..Changes::default()
        }
    }

    /// Entries appended since `old` was taken.
    ///
    /// With no `old` snapshot only the counts are filled in. Any failure to
    /// resolve an entry aborts the whole call.
    pub fn changes(&self, session: &Session<'_>, old: Option<&Changes>) -> PageResult<Changes> {
        let mut changes = self.counts();
        let Some(old) = old else {
            return Ok(changes);
        };
        changes.new_threads = since(session, "threads", &self.threads, old.thread_count)?;
        changes.new_posts = since(session, "posts", &self.posts, old.post_count)?;
        changes.new_votes = since(session, "votes", &self.votes, old.vote_count)?;
        debug!(
            threads = changes.new_threads.len(),
            posts = changes.new_posts.len(),
            votes = changes.new_votes.len(),
            "computed changes"
        );
        Ok(changes)
    }
}

/// Resolve `list[seen..]`, or nothing if the list has not grown.
fn since<T: Object>(
    session: &Session<'_>,
    name: &str,
    list: &RefList<T>,
    seen: usize,
) -> PageResult<Vec<T>> {
    let len = list.len();
    if len < seen {
        warn!(list = name, seen, len, "change log is shorter than the previous snapshot");
    }
    list.resolve_range(session.objects(), seen..len)
        .map_err(|e| PageError::lookup(format!("diff_page.{name}[{seen}..{len}]"), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{author, forum, post};
    use fog_store::Ref;
    use fog_types::ErrorKind;
    use proptest::prelude::*;

    fn thread(name: &str) -> Thread {
        Thread::new(name, "", author())
    }

    fn vote(mode: i32) -> Vote {
        Vote::new(ObjectId::from_bytes(b"target"), mode, "", author()).unwrap()
    }

    // --- add / lookups ---

    #[test]
    fn add_routes_by_variant() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let mut page = DiffPage::new();

        let t = thread("t");
        let id = page.add(&session, &t.clone().into()).unwrap();
        page.add(&session, &post("p").into()).unwrap();
        page.add(&session, &vote(1).into()).unwrap();

        assert_eq!(id, t.content_hash().unwrap());
        assert_eq!(page.counts(), Changes {
            thread_count: 1,
            post_count: 1,
            vote_count: 1,
            ..Changes::default()
        });
        assert_eq!(page.thread_at(&session, 0).unwrap(), t);
        assert_eq!(page.vote_at(&session, 0).unwrap().mode, 1);
    }

    #[test]
    fn lookup_past_end_is_not_found() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let page = DiffPage::new();
        let err = page.post_at(&session, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("diff_page.posts[0]"));
    }

    #[test]
    fn lookup_of_wrong_kind_is_invalid_read() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let mut page = DiffPage::new();
        let stored = Ref::store(session.objects(), &post("p")).unwrap();
        page.threads.push(Ref::from_id(stored.id()));
        let err = page.thread_at(&session, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRead);
    }

    // --- changes ---

    #[test]
    fn first_call_only_counts() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let mut page = DiffPage::new();
        page.add(&session, &thread("t1").into()).unwrap();
        page.add(&session, &thread("t2").into()).unwrap();

        let changes = page.changes(&session, None).unwrap();
        assert_eq!(changes.thread_count, 2);
        assert!(changes.is_empty());
    }

    #[test]
    fn new_thread_after_snapshot() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let mut page = DiffPage::new();
        page.add(&session, &thread("t1").into()).unwrap();
        page.add(&session, &thread("t2").into()).unwrap();
        let c1 = page.changes(&session, None).unwrap();

        let t3 = thread("t3");
        page.add(&session, &t3.clone().into()).unwrap();
        let c2 = page.changes(&session, Some(&c1)).unwrap();

        assert_eq!(c2.thread_count, 3);
        assert_eq!(c2.new_threads, vec![t3]);
        assert!(c2.new_posts.is_empty());
        assert!(c2.new_votes.is_empty());
    }

    #[test]
    fn changes_are_repeatable() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let mut page = DiffPage::new();
        let base = page.counts();
        page.add(&session, &post("p").into()).unwrap();
        page.add(&session, &vote(-1).into()).unwrap();

        let a = page.changes(&session, Some(&base)).unwrap();
        let b = page.changes(&session, Some(&base)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.new_posts.len(), 1);
        assert_eq!(a.new_votes.len(), 1);
    }

    #[test]
    fn shorter_log_yields_nothing_new() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let mut page = DiffPage::new();
        page.add(&session, &thread("t").into()).unwrap();
        let ahead = Changes {
            thread_count: 5,
            ..Changes::default()
        };
        let changes = page.changes(&session, Some(&ahead)).unwrap();
        assert_eq!(changes.thread_count, 1);
        assert!(changes.is_empty());
    }

    #[test]
    fn unreadable_entry_aborts_whole_diff() {
        let forum = forum();
        let session = forum.begin().unwrap();
        let mut page = DiffPage::new();
        let base = page.counts();
        page.add(&session, &thread("ok").into()).unwrap();
        page.posts.push(Ref::from_id(ObjectId::from_bytes(b"missing")));

        let err = page.changes(&session, Some(&base)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRead);
        assert!(err.to_string().contains("diff_page.posts[0..1]"));
    }

    fn content(kind: u8, name: &str) -> Content {
        match kind {
            0 => thread(name).into(),
            1 => post(name).into(),
            _ => Vote::new(ObjectId::from_bytes(name.as_bytes()), 1, name, author())
                .unwrap()
                .into(),
        }
    }

    proptest! {
        #[test]
        fn appended_sequence_is_returned_in_order(
            items in proptest::collection::vec((0u8..3, "[a-z]{1,8}"), 0..16),
            seen in 0usize..6,
        ) {
            let forum = forum();
            let session = forum.begin().unwrap();
            let mut page = DiffPage::new();
            let all: Vec<Content> = items.iter().map(|(k, n)| content(*k, n)).collect();
            let seen = seen.min(all.len());

            for c in &all[..seen] {
                page.add(&session, c).unwrap();
            }
            let old = page.counts();
            for c in &all[seen..] {
                page.add(&session, c).unwrap();
            }

            let mut expected = Changes::default();
            for c in &all[seen..] {
                match c.clone() {
                    Content::Thread(t) => expected.new_threads.push(t),
                    Content::Post(p) => expected.new_posts.push(p),
                    Content::Vote(v) => expected.new_votes.push(v),
                }
            }
            let changes = page.changes(&session, Some(&old)).unwrap();
            prop_assert_eq!(
                changes.thread_count + changes.post_count + changes.vote_count,
                all.len()
            );
            prop_assert_eq!(changes.new_threads, expected.new_threads);
            prop_assert_eq!(changes.new_posts, expected.new_posts);
            prop_assert_eq!(changes.new_votes, expected.new_votes);
        }
    }
}
