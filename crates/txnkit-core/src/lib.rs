//! # txnkit Core
//!
//! Core types and traits for the txnkit transaction coordinator.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of txnkit.**
//!
//! Users should depend on the main [`txnkit`](https://crates.io/crates/txnkit)
//! crate instead, which provides the stable public API. This crate's API may
//! change without notice between minor versions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connection;
pub mod context;
pub mod definition;
pub mod error;
pub mod handle;
pub mod holder;

pub use connection::{Connection, ResourceProvider};
pub use context::TransactionContext;
pub use definition::{Propagation, TransactionDefinition};
pub use error::{Error, Result};
pub use handle::TransactionHandle;
pub use holder::{ConnectionHolder, HolderState};
