//! Instrumented in-memory resource provider.
//!
//! [`ProbeProvider`] counts every acquire, release, physical commit, and
//! physical rollback, and supports failure injection. Tests and benches use
//! it to assert physical-action properties of the coordinator: that a
//! participating commit never touches the connection, that release is called
//! exactly once per acquire, and so on. It is also a reasonable template for
//! writing a real `ResourceProvider`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use txnkit_core::{Connection, Error, ResourceProvider, Result};

#[derive(Default)]
struct ProbeState {
    acquired: AtomicUsize,
    released: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    fail_next_acquire: AtomicBool,
    fail_on_commit: AtomicBool,
    fail_on_rollback: AtomicBool,
}

/// Shared-counter resource provider for tests and benches.
///
/// Cloning yields another handle onto the same counters, so a test can keep
/// one clone for assertions while the coordinator owns the other.
#[derive(Clone, Default)]
pub struct ProbeProvider {
    state: Arc<ProbeState>,
}

/// Connection handed out by [`ProbeProvider`]; bumps the shared counters on
/// physical commit/rollback.
pub struct ProbeConnection {
    state: Arc<ProbeState>,
}

impl ProbeProvider {
    /// Create a provider with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful acquires
    pub fn acquired(&self) -> usize {
        self.state.acquired.load(Ordering::SeqCst)
    }

    /// Number of releases
    pub fn released(&self) -> usize {
        self.state.released.load(Ordering::SeqCst)
    }

    /// Connections acquired but not yet released
    pub fn outstanding(&self) -> usize {
        self.acquired() - self.released()
    }

    /// Number of physical commits across all connections
    pub fn commits(&self) -> usize {
        self.state.commits.load(Ordering::SeqCst)
    }

    /// Number of physical rollbacks across all connections
    pub fn rollbacks(&self) -> usize {
        self.state.rollbacks.load(Ordering::SeqCst)
    }

    /// Make the next `acquire` fail with a resource error.
    pub fn fail_next_acquire(&self) {
        self.state.fail_next_acquire.store(true, Ordering::SeqCst);
    }

    /// Make physical commits fail while enabled.
    pub fn fail_on_commit(&self, fail: bool) {
        self.state.fail_on_commit.store(fail, Ordering::SeqCst);
    }

    /// Make physical rollbacks fail while enabled.
    pub fn fail_on_rollback(&self, fail: bool) {
        self.state.fail_on_rollback.store(fail, Ordering::SeqCst);
    }
}

impl ResourceProvider for ProbeProvider {
    type Conn = ProbeConnection;

    fn acquire(&self) -> Result<ProbeConnection> {
        if self.state.fail_next_acquire.swap(false, Ordering::SeqCst) {
            return Err(Error::Resource(
                "injected acquire failure".to_string(),
            ));
        }
        self.state.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(ProbeConnection {
            state: Arc::clone(&self.state),
        })
    }

    fn release(&self, conn: ProbeConnection) {
        self.state.released.fetch_add(1, Ordering::SeqCst);
        drop(conn);
    }
}

impl Connection for ProbeConnection {
    fn physical_commit(&mut self) -> Result<()> {
        if self.state.fail_on_commit.load(Ordering::SeqCst) {
            return Err(Error::Resource("injected commit failure".to_string()));
        }
        self.state.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn physical_rollback(&mut self) -> Result<()> {
        if self.state.fail_on_rollback.load(Ordering::SeqCst) {
            return Err(Error::Resource("injected rollback failure".to_string()));
        }
        self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
