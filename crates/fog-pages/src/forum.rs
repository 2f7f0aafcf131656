use std::sync::Mutex;

use fog_store::{Store, StoreError};
use fog_types::{Board, ObjectId};
use tracing::info;

use crate::config::ForumConfig;
use crate::error::{PageError, PageResult};
use crate::pages::{Pages, ROOT_SLOTS};
use crate::session::Session;

/// A forum: one store, its configuration, and the lock that serializes
/// access to it.
pub struct Forum {
    store: Store,
    config: ForumConfig,
    lock: Mutex<()>,
}

impl Forum {
    pub fn new(store: Store, config: ForumConfig) -> PageResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            lock: Mutex::new(()),
        })
    }

    /// A forum over an empty in-memory store.
    pub fn in_memory(config: ForumConfig) -> PageResult<Self> {
        Self::new(Store::in_memory(), config)
    }

    pub fn config(&self) -> &ForumConfig {
        &self.config
    }

    /// Hash of the current root, once genesis has run.
    pub fn head(&self) -> PageResult<Option<ObjectId>> {
        self.store
            .head()
            .map_err(|e| PageError::internal("head", "root".into(), e))
    }

    /// Take the forum lock. Blocks while another session is open.
    pub fn begin(&self) -> PageResult<Session<'_>> {
        let guard = self.lock.lock().map_err(|_| PageError::Internal {
            op: "begin",
            target: "forum lock".into(),
            reason: "lock poisoned".into(),
        })?;
        Ok(Session::new(&self.store, guard))
    }

    /// Create the root and the pages for `board`. Only a master node may do
    /// this, and only once.
    pub fn genesis(&self, board: &Board) -> PageResult<ObjectId> {
        if !self.config.master {
            return Err(PageError::NotAllowed {
                op: "genesis",
                target: format!("board {:?}", board.name),
                reason: "only a master node may create boards".into(),
            });
        }
        let session = self.begin()?;
        self.store.init(ROOT_SLOTS).map_err(|e| match e {
            StoreError::AlreadyInitialized(_) => PageError::AlreadyExists {
                target: "root".into(),
            },
            e => PageError::internal("genesis", "root".into(), e),
        })?;
        let root = Pages::genesis(&session, board)?.save(&session)?;
        info!(board = %board.name, root = %root.short_hex(), "genesis");
        Ok(root)
    }
}

impl std::fmt::Debug for Forum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forum")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
