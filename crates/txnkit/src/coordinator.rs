//! Transaction coordinator.
//!
//! Implements propagation policy (REQUIRED, REQUIRES_NEW) over a
//! caller-owned [`TransactionContext`]: whether a `begin` creates a new
//! physical transaction, joins the current one, or suspends it and starts an
//! independent one, and how `commit`/`rollback` resolve against the
//! rollback-only latch.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};
use txnkit_core::{
    Connection, ConnectionHolder, Error, Propagation, ResourceProvider, Result,
    TransactionContext, TransactionDefinition, TransactionHandle,
};

/// Coordinates logical transactions over physical connections supplied by a
/// [`ResourceProvider`].
///
/// The coordinator itself is stateless apart from an id counter; all
/// per-transaction state lives in the context and the handles, so one
/// coordinator may serve many execution contexts concurrently as long as
/// each context stays single-writer.
pub struct TransactionCoordinator<P: ResourceProvider> {
    provider: P,
    next_txn_id: AtomicU64,
}

impl<P: ResourceProvider> TransactionCoordinator<P> {
    /// Create a coordinator over the given resource provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            next_txn_id: AtomicU64::new(0),
        }
    }

    /// Access the underlying resource provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn acquire_holder(&self) -> Result<ConnectionHolder<P::Conn>> {
        let connection = self.provider.acquire()?;
        let id = self.next_txn_id.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(ConnectionHolder::new(id, connection))
    }

    /// Start a logical transaction according to `definition`.
    ///
    /// With an empty context this always creates a new physical transaction.
    /// With a transaction in progress, REQUIRED joins it and REQUIRES_NEW
    /// suspends it for the lifetime of the returned handle.
    pub fn begin(
        &self,
        ctx: &mut TransactionContext<P::Conn>,
        definition: &TransactionDefinition,
    ) -> Result<TransactionHandle<P::Conn>> {
        let current = match ctx.active_id() {
            None => {
                let holder = self.acquire_holder()?;
                let id = holder.id();
                ctx.install(holder)?;
                debug!(
                    txn_id = id,
                    read_only = definition.read_only,
                    "creating new transaction"
                );
                return Ok(TransactionHandle::new_transaction(
                    id,
                    definition.propagation,
                    None,
                ));
            }
            Some(id) => id,
        };

        match definition.propagation {
            Propagation::Required => {
                debug!(txn_id = current, "participating in existing transaction");
                Ok(TransactionHandle::participating(
                    current,
                    Propagation::Required,
                ))
            }
            Propagation::RequiresNew => {
                // The context invariant requires removing the active holder
                // before a new one can be installed.
                let mut suspended = ctx.take().ok_or(Error::NoTransaction)?;
                suspended.suspend();
                debug!(
                    suspended_txn = suspended.id(),
                    "suspending current transaction, creating new transaction"
                );

                let holder = match self.acquire_holder() {
                    Ok(holder) => holder,
                    Err(e) => {
                        // Acquisition failed: the outer transaction must
                        // survive, so put it back before propagating.
                        suspended.resume();
                        ctx.install(suspended)?;
                        return Err(e);
                    }
                };
                let id = holder.id();
                ctx.install(holder)?;
                Ok(TransactionHandle::new_transaction(
                    id,
                    Propagation::RequiresNew,
                    Some(suspended),
                ))
            }
        }
    }

    /// Complete a logical transaction with a commit request.
    ///
    /// A participating handle performs no physical action and returns Ok
    /// even when the shared holder is latched rollback-only; the deferred
    /// failure belongs to the owning handle. The owning handle physically
    /// commits, unless a participant latched the holder, in which case the
    /// connection is physically rolled back and `Error::UnexpectedRollback`
    /// is returned.
    pub fn commit(
        &self,
        ctx: &mut TransactionContext<P::Conn>,
        mut handle: TransactionHandle<P::Conn>,
    ) -> Result<()> {
        if !handle.is_new() {
            self.check_bound(ctx, &handle)?;
            if ctx.is_rollback_only() {
                debug!(
                    txn_id = handle.txn_id(),
                    "participating transaction is rollback-only, deferring to transaction owner"
                );
            } else {
                debug!(txn_id = handle.txn_id(), "participating in commit, no physical action");
            }
            return Ok(());
        }

        if let Err(e) = self.check_bound(ctx, &handle) {
            self.discard_suspended(&mut handle);
            return Err(e);
        }
        let holder = ctx.take().ok_or(Error::NoTransaction)?;

        // The latch is checked on the holder before any commit attempt.
        let rollback_only = holder.is_rollback_only();
        let mut connection = holder.into_connection();
        let outcome = if rollback_only {
            warn!(
                txn_id = handle.txn_id(),
                "transaction is marked as rollback-only but commit was requested, rolling back"
            );
            match connection.physical_rollback() {
                Ok(()) => Err(Error::UnexpectedRollback),
                Err(e) => Err(e),
            }
        } else {
            debug!(txn_id = handle.txn_id(), "initiating transaction commit");
            connection.physical_commit()
        };
        self.provider.release(connection);

        self.resume_suspended(ctx, &mut handle)?;
        outcome
    }

    /// Complete a logical transaction with a rollback request.
    ///
    /// The owning handle physically rolls back and releases the connection.
    /// A participating handle never touches the connection: it latches the
    /// shared holder rollback-only so the owner's eventual commit fails.
    pub fn rollback(
        &self,
        ctx: &mut TransactionContext<P::Conn>,
        mut handle: TransactionHandle<P::Conn>,
    ) -> Result<()> {
        if !handle.is_new() {
            self.check_bound(ctx, &handle)?;
            debug!(
                txn_id = handle.txn_id(),
                "participating transaction failed, marking existing transaction as rollback-only"
            );
            let holder = ctx.active_mut().ok_or(Error::NoTransaction)?;
            holder.set_rollback_only();
            return Ok(());
        }

        if let Err(e) = self.check_bound(ctx, &handle) {
            self.discard_suspended(&mut handle);
            return Err(e);
        }
        let holder = ctx.take().ok_or(Error::NoTransaction)?;

        debug!(txn_id = handle.txn_id(), "initiating transaction rollback");
        let mut connection = holder.into_connection();
        let outcome = connection.physical_rollback();
        self.provider.release(connection);

        self.resume_suspended(ctx, &mut handle)?;
        outcome
    }

    /// Verify the handle is bound to the transaction the context holds.
    fn check_bound(
        &self,
        ctx: &TransactionContext<P::Conn>,
        handle: &TransactionHandle<P::Conn>,
    ) -> Result<()> {
        match ctx.active_id() {
            None => Err(Error::NoTransaction),
            Some(id) if id != handle.txn_id() => Err(Error::InvalidState(format!(
                "handle is bound to transaction {} but the context holds transaction {}",
                handle.txn_id(),
                id
            ))),
            Some(_) => Ok(()),
        }
    }

    /// A rejected completion consumed its handle, and with it any suspended
    /// holder. That connection cannot be resumed here (the context is
    /// occupied by a different transaction or empty), so it is physically
    /// rolled back and released rather than dropped.
    fn discard_suspended(&self, handle: &mut TransactionHandle<P::Conn>) {
        if let Some(holder) = handle.take_suspended() {
            warn!(
                txn_id = holder.id(),
                "discarding suspended transaction after mis-sequenced completion"
            );
            let mut connection = holder.into_connection();
            let _ = connection.physical_rollback();
            self.provider.release(connection);
        }
    }

    /// Reinstall the outer holder a REQUIRES_NEW begin suspended.
    fn resume_suspended(
        &self,
        ctx: &mut TransactionContext<P::Conn>,
        handle: &mut TransactionHandle<P::Conn>,
    ) -> Result<()> {
        if let Some(mut suspended) = handle.take_suspended() {
            debug!(txn_id = suspended.id(), "resuming suspended transaction");
            suspended.resume();
            ctx.install(suspended)?;
        }
        Ok(())
    }
}
