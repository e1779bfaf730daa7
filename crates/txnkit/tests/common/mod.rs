// Common test utilities for coordinator integration tests

use txnkit::{ProbeConnection, ProbeProvider, TransactionContext, TransactionCoordinator};

/// Test fixture bundling a coordinator with a handle onto its probe counters
pub struct TxFixture {
    pub coordinator: TransactionCoordinator<ProbeProvider>,
    pub probe: ProbeProvider,
}

impl TxFixture {
    pub fn new() -> Self {
        let probe = ProbeProvider::new();
        let coordinator = TransactionCoordinator::new(probe.clone());
        Self { coordinator, probe }
    }

    /// Fresh execution context with no transaction in progress
    pub fn context(&self) -> TransactionContext<ProbeConnection> {
        TransactionContext::new()
    }

    /// Assert that every acquired connection has been released
    #[allow(dead_code)]
    pub fn assert_no_leak(&self) {
        assert_eq!(
            self.probe.outstanding(),
            0,
            "expected every acquired connection to be released"
        );
    }
}
