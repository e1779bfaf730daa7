//! Connection holder.
//!
//! A [`ConnectionHolder`] wraps exactly one physical connection for the
//! lifetime of its physical transaction, together with the rollback-only
//! latch that participants use to veto the eventual commit. The holder is
//! owned by the [`TransactionContext`](crate::TransactionContext) while
//! active and moves into a handle's suspended slot while a REQUIRES_NEW
//! inner transaction runs.

use crate::connection::Connection;

/// Lifecycle state of a holder within its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderState {
    /// Bound to the context; physical work runs on this connection
    Active,
    /// Detached while an independent inner transaction runs
    Suspended,
}

/// Wraps one physical connection plus the rollback-only latch.
pub struct ConnectionHolder<C: Connection> {
    id: u64,
    connection: C,
    rollback_only: bool,
    state: HolderState,
}

impl<C: Connection> ConnectionHolder<C> {
    /// Wrap a freshly acquired connection. The id identifies the physical
    /// transaction in handles and log output.
    pub fn new(id: u64, connection: C) -> Self {
        Self {
            id,
            connection,
            rollback_only: false,
            state: HolderState::Active,
        }
    }

    /// Id of the physical transaction this holder backs
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> HolderState {
        self.state
    }

    /// Whether a participant has vetoed the commit
    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only
    }

    /// Latch the holder rollback-only.
    ///
    /// One-way: there is no reset. The latch only goes away when the
    /// physical transaction completes and the holder is destroyed.
    pub fn set_rollback_only(&mut self) {
        self.rollback_only = true;
    }

    /// Detach the holder from its context for the duration of an
    /// independent inner transaction.
    pub fn suspend(&mut self) {
        self.state = HolderState::Suspended;
    }

    /// Reattach the holder after the inner transaction completed.
    pub fn resume(&mut self) {
        self.state = HolderState::Active;
    }

    /// Borrow the physical connection, e.g. to run statements on it.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Consume the holder at physical completion, yielding the connection
    /// for commit/rollback and release.
    pub fn into_connection(self) -> C {
        self.connection
    }
}
