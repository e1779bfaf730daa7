//! Logging Demo
//!
//! Shows the coordinator's tracing output. Run with:
//! `cargo run --example logging_demo`
//! or override the filter: `RUST_LOG=txnkit=debug cargo run --example logging_demo`

use txnkit::logging::LogConfig;
use txnkit::{ProbeProvider, TransactionContext, TransactionCoordinator, TransactionDefinition};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Debug level shows every propagation decision.
    let _guard = LogConfig::debug().init();

    let coordinator = TransactionCoordinator::new(ProbeProvider::new());
    let mut ctx = TransactionContext::new();

    let outer = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
    let joined = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
    coordinator.commit(&mut ctx, joined)?;

    let isolated = coordinator.begin(&mut ctx, &TransactionDefinition::requires_new())?;
    coordinator.rollback(&mut ctx, isolated)?;

    coordinator.commit(&mut ctx, outer)?;
    Ok(())
}
