//! External collaborator traits.
//!
//! The coordinator never talks to a database directly. It consumes two narrow
//! capabilities: a [`ResourceProvider`] that hands out physical connections,
//! and the [`Connection`] commit/rollback surface on each of them. Query
//! execution, pooling, and dialect concerns all live behind these traits.

use crate::Result;

/// A physical connection capable of committing or rolling back the unit of
/// work accumulated on it.
///
/// Implementations report failures as `Error::Resource`; the coordinator
/// propagates them unchanged and treats the physical transaction as ended.
pub trait Connection {
    /// Commit the physical transaction on this connection.
    fn physical_commit(&mut self) -> Result<()>;

    /// Roll back the physical transaction on this connection.
    fn physical_rollback(&mut self) -> Result<()>;
}

/// Supplies physical connections on demand.
///
/// `acquire` may block or fail; that is the provider's business. The
/// coordinator guarantees `release` is called exactly once for every
/// successful `acquire`, on every completion path.
pub trait ResourceProvider {
    /// The connection type this provider hands out.
    type Conn: Connection;

    /// Acquire a fresh physical connection with an open transaction.
    fn acquire(&self) -> Result<Self::Conn>;

    /// Return a connection after its physical transaction has completed.
    fn release(&self, conn: Self::Conn);
}
