use fog_store::{Element, Object, ObjectKind, RefList};
use fog_types::{ObjectId, PubKey, Vote};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diff::Content;
use crate::error::{PageError, PageResult};
use crate::session::Session;

/// The actions taken by one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivityPage {
    pub pub_key: PubKey,
    pub vote_actions: RefList<Vote>,
}

impl Object for UserActivityPage {
    const KIND: ObjectKind = ObjectKind::UserActivityPage;
}

impl UserActivityPage {
    pub fn new(pub_key: PubKey) -> Self {
        Self {
            pub_key,
            vote_actions: RefList::new(),
        }
    }

    pub fn vote_count(&self) -> usize {
        self.vote_actions.len()
    }

    pub fn votes(&self, session: &Session<'_>) -> PageResult<Vec<Vote>> {
        self.vote_actions
            .resolve_range(session.objects(), 0..self.vote_actions.len())
            .map_err(|e| PageError::lookup("user_activity_page.vote_actions".into(), e))
    }
}

/// One activity page per registered public key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersPage {
    pub users: RefList<UserActivityPage>,
}

impl Object for UsersPage {
    const KIND: ObjectKind = ObjectKind::UsersPage;
}

impl UsersPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Append an empty activity page for `pub_key` and return its hash.
    pub fn new_user_activity_page(
        &mut self,
        session: &Session<'_>,
        pub_key: PubKey,
    ) -> PageResult<ObjectId> {
        if self.find_by_pub_key(session, &pub_key)?.is_some() {
            return Err(PageError::AlreadyExists {
                target: format!("user activity page for {}", pub_key.to_hex()),
            });
        }
        let element = self
            .users
            .append(session.objects(), &UserActivityPage::new(pub_key))
            .map_err(|e| PageError::write("append", "users_page.users".into(), e))?;
        debug!(index = element.index(), hash = %element.id().short_hex(), "registered user");
        Ok(element.id())
    }

    /// The activity page with hash `hash`, and where it sits in the list.
    pub fn user_activity(
        &self,
        session: &Session<'_>,
        hash: &ObjectId,
    ) -> PageResult<(Element<UserActivityPage>, UserActivityPage)> {
        let target = || format!("users_page.users {hash:?}");
        let element = self
            .users
            .by_hash(hash)
            .map_err(|e| PageError::lookup(target(), e))?;
        let page = element
            .reference()
            .resolve(session.objects())
            .map_err(|e| PageError::read(target(), e))?;
        Ok((element, page))
    }

    /// Scan for the page belonging to `pub_key`.
    pub fn find_by_pub_key(
        &self,
        session: &Session<'_>,
        pub_key: &PubKey,
    ) -> PageResult<Option<(Element<UserActivityPage>, UserActivityPage)>> {
        for index in 0..self.users.len() {
            let element = self
                .users
                .element(index)
                .map_err(|e| PageError::lookup(format!("users_page.users[{index}]"), e))?;
            let page = element
                .reference()
                .resolve(session.objects())
                .map_err(|e| PageError::read(format!("users_page.users[{index}]"), e))?;
            if page.pub_key == *pub_key {
                return Ok(Some((element, page)));
            }
        }
        Ok(None)
    }

    /// Record `content` on the activity page with hash `hash`.
    ///
    /// Only votes are tracked per user. The page is written back in place and
    /// its new hash returned; the old hash no longer appears in the list.
    pub fn add_user_activity(
        &mut self,
        session: &Session<'_>,
        hash: &ObjectId,
        content: &Content,
    ) -> PageResult<ObjectId> {
        let Content::Vote(vote) = content else {
            return Err(PageError::NotAllowed {
                op: "add_user_activity",
                target: format!("users_page.users {hash:?}"),
                reason: format!("{} is not a user activity", content.name()),
            });
        };
        let (element, mut page) = self.user_activity(session, hash)?;
        page.vote_actions
            .append(session.objects(), vote)
            .map_err(|e| PageError::write("append", "user_activity_page.vote_actions".into(), e))?;
        let saved = self
            .users
            .set(session.objects(), &element, &page)
            .map_err(|e| PageError::write("save", format!("users_page.users[{}]", element.index()), e))?;
        debug!(
            index = saved.index(),
            votes = page.vote_count(),
            hash = %saved.id().short_hex(),
            "recorded user activity"
        );
        Ok(saved.id())
    }
}
