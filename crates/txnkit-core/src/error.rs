//! Error types for txnkit.

use std::fmt;

/// The main error type for txnkit operations.
#[derive(Debug)]
pub enum Error {
    /// Physical resource failure: connection acquisition, physical commit,
    /// or physical rollback
    Resource(String),

    /// The physical transaction was marked rollback-only by a participant
    /// and was rolled back instead of committed
    UnexpectedRollback,

    /// A completion call arrived with no transaction bound to the context
    NoTransaction,

    /// The handle does not match the transaction bound to the context,
    /// or the context is already occupied
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Resource(msg) => write!(f, "Resource error: {}", msg),
            Error::UnexpectedRollback => write!(
                f,
                "Transaction rolled back because it was marked rollback-only"
            ),
            Error::NoTransaction => write!(f, "No transaction is bound to the context"),
            Error::InvalidState(msg) => write!(f, "Invalid transaction state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for txnkit operations.
pub type Result<T> = std::result::Result<T, Error>;
