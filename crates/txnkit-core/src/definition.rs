//! Transaction definitions.
//!
//! A [`TransactionDefinition`] describes how a `begin` call should behave
//! when a transaction is already in progress. Only the two propagation
//! behaviors the coordinator implements are modeled here.

use serde::{Deserialize, Serialize};

/// Propagation behavior for a `begin` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Propagation {
    /// Join the current physical transaction if one exists,
    /// otherwise start a new one (default)
    Required,
    /// Always start an independent physical transaction,
    /// suspending the current one for the duration
    RequiresNew,
}

/// Definition passed to `TransactionCoordinator::begin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDefinition {
    /// Propagation behavior
    pub propagation: Propagation,
    /// Hint that the transaction performs no writes; informational only
    pub read_only: bool,
}

impl Default for TransactionDefinition {
    fn default() -> Self {
        Self {
            propagation: Propagation::Required,
            read_only: false,
        }
    }
}

impl TransactionDefinition {
    /// Definition with REQUIRED propagation
    pub fn required() -> Self {
        Self::default()
    }

    /// Definition with REQUIRES_NEW propagation
    pub fn requires_new() -> Self {
        Self {
            propagation: Propagation::RequiresNew,
            ..Default::default()
        }
    }

    /// Set the propagation behavior
    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = propagation;
        self
    }

    /// Mark the transaction as read-only (informational)
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
