//! The root container: the three forum pages held in the root's slots.

use std::fmt;

use fog_store::{Object, Store};
use fog_types::{Board, ObjectId};
use tracing::{debug, info};

use crate::board::BoardPage;
use crate::diff::DiffPage;
use crate::error::{PageError, PageResult};
use crate::session::Session;
use crate::users::UsersPage;

/// Number of child slots in a forum root.
pub const ROOT_SLOTS: usize = 3;

/// The root slots, by stable index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    Board,
    Diff,
    Users,
}

impl PageKind {
    pub const ALL: [PageKind; ROOT_SLOTS] = [Self::Board, Self::Diff, Self::Users];

    pub fn index(self) -> usize {
        match self {
            Self::Board => 0,
            Self::Diff => 1,
            Self::Users => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Board => "board_page",
            Self::Diff => "diff_page",
            Self::Users => "users_page",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root child {} [{}]", self.name(), self.index())
    }
}

/// The pages a caller has loaded from the root.
///
/// Only the requested pages are populated; nothing is created implicitly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pages {
    pub board: Option<BoardPage>,
    pub diff: Option<DiffPage>,
    pub users: Option<UsersPage>,
}

impl Pages {
    /// Fresh pages for a new forum around `board`. Not yet saved.
    pub fn genesis(session: &Session<'_>, board: &Board) -> PageResult<Self> {
        Ok(Self {
            board: Some(BoardPage::new(session, board)?),
            diff: Some(DiffPage::new()),
            users: Some(UsersPage::new()),
        })
    }

    /// Resolve each `wanted` page from the current root.
    ///
    /// Stops at the first page that is missing or not of the expected kind.
    pub fn load(session: &Session<'_>, wanted: &[PageKind]) -> PageResult<Self> {
        let store = session.store();
        let mut pages = Self::default();
        for &kind in wanted {
            match kind {
                PageKind::Board => pages.board = Some(resolve(store, kind)?),
                PageKind::Diff => pages.diff = Some(resolve(store, kind)?),
                PageKind::Users => pages.users = Some(resolve(store, kind)?),
            }
        }
        Ok(pages)
    }

    /// Write every loaded page back to its slot, in index order.
    ///
    /// Each write advances the root; the final head is returned. Stops at the
    /// first failed write, leaving earlier slots written.
    pub fn save(&self, session: &Session<'_>) -> PageResult<ObjectId> {
        let store = session.store();
        if let Some(board) = &self.board {
            write(store, PageKind::Board, board)?;
        }
        if let Some(diff) = &self.diff {
            write(store, PageKind::Diff, diff)?;
        }
        if let Some(users) = &self.users {
            write(store, PageKind::Users, users)?;
        }
        let head = store
            .head()
            .map_err(|e| PageError::internal("save", "root".into(), e))?
            .ok_or_else(|| PageError::NotAllowed {
                op: "save",
                target: "root".into(),
                reason: "store has no root".into(),
            })?;
        info!(root = %head.short_hex(), "saved pages");
        Ok(head)
    }

    pub fn board(&self) -> PageResult<&BoardPage> {
        self.board.as_ref().ok_or_else(|| not_loaded(PageKind::Board))
    }

    pub fn board_mut(&mut self) -> PageResult<&mut BoardPage> {
        self.board.as_mut().ok_or_else(|| not_loaded(PageKind::Board))
    }

    pub fn diff(&self) -> PageResult<&DiffPage> {
        self.diff.as_ref().ok_or_else(|| not_loaded(PageKind::Diff))
    }

    pub fn diff_mut(&mut self) -> PageResult<&mut DiffPage> {
        self.diff.as_mut().ok_or_else(|| not_loaded(PageKind::Diff))
    }

    pub fn users(&self) -> PageResult<&UsersPage> {
        self.users.as_ref().ok_or_else(|| not_loaded(PageKind::Users))
    }

    pub fn users_mut(&mut self) -> PageResult<&mut UsersPage> {
        self.users.as_mut().ok_or_else(|| not_loaded(PageKind::Users))
    }
}

fn resolve<T: Object>(store: &Store, kind: PageKind) -> PageResult<T> {
    let page = store
        .resolve_by_index::<T>(kind.index())
        .map_err(|e| PageError::read(kind.to_string(), e))?;
    debug!(slot = kind.index(), page = kind.name(), "loaded page");
    Ok(page)
}

fn write<T: Object>(store: &Store, kind: PageKind, page: &T) -> PageResult<ObjectId> {
    store
        .set_by_index(kind.index(), page)
        .map_err(|e| PageError::write("save", kind.to_string(), e))
}

fn not_loaded(kind: PageKind) -> PageError {
    PageError::NotAllowed {
        op: "access",
        target: kind.to_string(),
        reason: "page was not loaded".into(),
    }
}
