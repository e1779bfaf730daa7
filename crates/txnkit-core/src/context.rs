//! Transaction context.
//!
//! One [`TransactionContext`] exists per execution context (thread or task)
//! and holds at most one active [`ConnectionHolder`]. It is an explicit
//! object the caller passes into every coordinator call; there is no hidden
//! thread-local registry. Sharing a context between concurrent callers is
//! not supported and must be guarded externally.

use crate::connection::Connection;
use crate::holder::ConnectionHolder;
use crate::{Error, Result};

/// Per-execution-context registry of the active connection holder.
pub struct TransactionContext<C: Connection> {
    active: Option<ConnectionHolder<C>>,
}

impl<C: Connection> TransactionContext<C> {
    /// Create an empty context with no transaction in progress.
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Whether a transaction is currently bound to this context
    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Borrow the active holder
    pub fn active(&self) -> Option<&ConnectionHolder<C>> {
        self.active.as_ref()
    }

    /// Mutably borrow the active holder
    pub fn active_mut(&mut self) -> Option<&mut ConnectionHolder<C>> {
        self.active.as_mut()
    }

    /// Borrow the active physical connection, e.g. to run statements inside
    /// the current transaction.
    pub fn connection_mut(&mut self) -> Option<&mut C> {
        self.active.as_mut().map(|h| h.connection_mut())
    }

    /// Id of the active physical transaction, if any
    pub fn active_id(&self) -> Option<u64> {
        self.active.as_ref().map(|h| h.id())
    }

    /// Whether the active transaction has been latched rollback-only
    pub fn is_rollback_only(&self) -> bool {
        self.active
            .as_ref()
            .map(|h| h.is_rollback_only())
            .unwrap_or(false)
    }

    /// Bind a holder as the active transaction.
    ///
    /// Fails if a holder is already bound: a REQUIRES_NEW begin must remove
    /// (suspend) the current holder before installing a new one.
    pub fn install(&mut self, holder: ConnectionHolder<C>) -> Result<()> {
        if self.active.is_some() {
            return Err(Error::InvalidState(
                "a connection holder is already bound to this context".to_string(),
            ));
        }
        self.active = Some(holder);
        Ok(())
    }

    /// Remove and return the active holder, leaving the context empty.
    pub fn take(&mut self) -> Option<ConnectionHolder<C>> {
        self.active.take()
    }
}

impl<C: Connection> Default for TransactionContext<C> {
    fn default() -> Self {
        Self::new()
    }
}
