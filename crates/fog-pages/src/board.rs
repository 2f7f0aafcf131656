use fog_store::{Element, Object, ObjectKind, Ref, RefList};
use fog_types::{Board, ObjectId, Thread};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PageError, PageResult};
use crate::session::Session;
use crate::thread::ThreadPage;

/// A board and the pages of its threads, in creation order.
///
/// Threads are not deduplicated: adding the same thread twice yields two
/// entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPage {
    pub board: Ref<Board>,
    pub threads: RefList<ThreadPage>,
}

impl Object for BoardPage {
    const KIND: ObjectKind = ObjectKind::BoardPage;
}

impl BoardPage {
    /// Store `board` and wrap it in a page with no threads.
    pub fn new(session: &Session<'_>, board: &Board) -> PageResult<Self> {
        let board = Ref::store(session.objects(), board)
            .map_err(|e| PageError::write("store", "board".into(), e))?;
        Ok(Self {
            board,
            threads: RefList::new(),
        })
    }

    pub fn board(&self, session: &Session<'_>) -> PageResult<Board> {
        self.board
            .resolve(session.objects())
            .map_err(|e| PageError::read(format!("board {:?}", self.board.id()), e))
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Find a thread page by hash.
    ///
    /// Keep the returned element: it is what [`ThreadPage::save`] needs to
    /// write a modified page back into this board.
    pub fn thread_page(
        &self,
        session: &Session<'_>,
        hash: &ObjectId,
    ) -> PageResult<(Element<ThreadPage>, ThreadPage)> {
        let target = || format!("board_page.threads {hash:?}");
        let element = self
            .threads
            .by_hash(hash)
            .map_err(|e| PageError::lookup(target(), e))?;
        let page = element
            .reference()
            .resolve(session.objects())
            .map_err(|e| PageError::read(target(), e))?;
        Ok((element, page))
    }

    /// Every thread page, in creation order.
    pub fn thread_pages(&self, session: &Session<'_>) -> PageResult<Vec<ThreadPage>> {
        self.threads
            .resolve_range(session.objects(), 0..self.threads.len())
            .map_err(|e| PageError::lookup("board_page.threads".into(), e))
    }

    /// Append a new, empty thread page for `thread`.
    pub fn add_thread(
        &mut self,
        session: &Session<'_>,
        thread: Ref<Thread>,
    ) -> PageResult<Element<ThreadPage>> {
        let element = self
            .threads
            .append(session.objects(), &ThreadPage::new(thread))
            .map_err(|e| {
                PageError::internal("append", format!("board_page.threads {:?}", thread.id()), e)
            })?;
        debug!(
            thread = %thread.id().short_hex(),
            page = %element.id().short_hex(),
            index = element.index(),
            "added thread"
        );
        Ok(element)
    }
}
