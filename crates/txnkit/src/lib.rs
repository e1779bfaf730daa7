//! # txnkit
//!
//! A propagation-aware transaction coordinator: nested logical transactions
//! over a single physical connection, with commit, rollback, suspension, and
//! rollback-only semantics.
//!
//! ## Quick Start
//!
//! ```rust
//! use txnkit::{
//!     ProbeProvider, TransactionContext, TransactionCoordinator, TransactionDefinition,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = TransactionCoordinator::new(ProbeProvider::new());
//!     let mut ctx = TransactionContext::new();
//!
//!     // Outer transaction owns the physical connection
//!     let outer = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
//!     assert!(outer.is_new());
//!
//!     // Inner REQUIRED begin joins it instead of creating a new one
//!     let inner = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
//!     assert!(!inner.is_new());
//!
//!     coordinator.commit(&mut ctx, inner)?; // no physical action
//!     coordinator.commit(&mut ctx, outer)?; // physical commit + release
//!     Ok(())
//! }
//! ```
//!
//! ## Propagation
//!
//! - **REQUIRED**: join the current physical transaction, or start one if
//!   the context is empty. A joining participant cannot commit physically;
//!   its rollback marks the shared transaction rollback-only, and the
//!   owner's eventual commit fails with
//!   [`Error::UnexpectedRollback`](txnkit_core::Error::UnexpectedRollback).
//! - **REQUIRES_NEW**: suspend the current transaction and run an
//!   independent one on a fresh connection; the outer transaction resumes
//!   untouched whatever the inner outcome.
//!
//! The context is an explicit object passed into every call. One context per
//! thread or task; a context must never be shared between concurrent
//! callers.

pub mod coordinator;
pub mod logging;
pub mod probe;

// Re-export core types
pub use txnkit_core::{
    Connection, ConnectionHolder, Error, HolderState, Propagation, ResourceProvider, Result,
    TransactionContext, TransactionDefinition, TransactionHandle,
};

pub use coordinator::TransactionCoordinator;
pub use probe::{ProbeConnection, ProbeProvider};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
