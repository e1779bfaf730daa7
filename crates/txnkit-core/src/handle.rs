//! Transaction handles.
//!
//! A [`TransactionHandle`] is returned by every `begin` and must be given
//! back to exactly one `commit` or `rollback`. Completion consumes the
//! handle by value, so a completed transaction cannot be completed twice.
//! Exactly one handle per physical transaction carries `is_new = true`; all
//! joining handles defer physical action to it.

use std::fmt;

use crate::connection::Connection;
use crate::context::TransactionContext;
use crate::definition::Propagation;
use crate::holder::ConnectionHolder;

/// Status of one logical transaction, returned by `begin`.
pub struct TransactionHandle<C: Connection> {
    txn_id: u64,
    is_new: bool,
    propagation: Propagation,
    suspended: Option<ConnectionHolder<C>>,
}

impl<C: Connection> TransactionHandle<C> {
    /// Handle for a freshly created physical transaction. Constructed by the
    /// coordinator; `suspended` carries the previously active holder when
    /// REQUIRES_NEW displaced it.
    pub fn new_transaction(
        txn_id: u64,
        propagation: Propagation,
        suspended: Option<ConnectionHolder<C>>,
    ) -> Self {
        Self {
            txn_id,
            is_new: true,
            propagation,
            suspended,
        }
    }

    /// Handle that joins the existing physical transaction `txn_id`.
    pub fn participating(txn_id: u64, propagation: Propagation) -> Self {
        Self {
            txn_id,
            is_new: false,
            propagation,
            suspended: None,
        }
    }

    /// Id of the physical transaction this handle is bound to
    pub fn txn_id(&self) -> u64 {
        self.txn_id
    }

    /// Whether this `begin` created the physical transaction.
    ///
    /// Only the handle with `is_new() == true` ever commits or rolls back
    /// the physical connection.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Propagation behavior the `begin` call was resolved with
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    /// Whether this handle suspended an outer transaction
    pub fn has_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Live rollback-only state, read off the shared holder in the context.
    ///
    /// The latch lives on the holder, not on the handle: a participant's
    /// rollback is visible here through every handle of the same physical
    /// transaction.
    pub fn is_rollback_only(&self, ctx: &TransactionContext<C>) -> bool {
        match ctx.active() {
            Some(holder) if holder.id() == self.txn_id => holder.is_rollback_only(),
            _ => false,
        }
    }

    /// Remove the suspended outer holder for resumption at completion.
    pub fn take_suspended(&mut self) -> Option<ConnectionHolder<C>> {
        self.suspended.take()
    }
}

// Manual impl: the embedded connection need not be Debug, so only the
// transaction identity is printed.
impl<C: Connection> fmt::Debug for TransactionHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionHandle")
            .field("txn_id", &self.txn_id)
            .field("is_new", &self.is_new)
            .field("propagation", &self.propagation)
            .field("suspended", &self.suspended.as_ref().map(|h| h.id()))
            .finish()
    }
}
