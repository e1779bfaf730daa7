//! Propagation Demo
//!
//! Walks through the coordinator's propagation behaviors:
//! - REQUIRED participation in an existing transaction
//! - rollback-only marking by an inner participant
//! - REQUIRES_NEW suspension and resumption of the outer transaction

use txnkit::{
    Error, ProbeProvider, TransactionContext, TransactionCoordinator, TransactionDefinition,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== txnkit Propagation Demo ===\n");

    let probe = ProbeProvider::new();
    let coordinator = TransactionCoordinator::new(probe.clone());

    // Demo 1: REQUIRED participation
    println!("1. REQUIRED joins the existing transaction:");
    {
        let mut ctx = TransactionContext::new();
        let outer = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
        let inner = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
        println!("   outer.is_new() = {}", outer.is_new());
        println!("   inner.is_new() = {}", inner.is_new());

        coordinator.commit(&mut ctx, inner)?;
        println!("   physical commits after inner commit: {}", probe.commits());
        coordinator.commit(&mut ctx, outer)?;
        println!("   physical commits after outer commit: {}", probe.commits());
    }

    // Demo 2: an inner rollback poisons the outer commit
    println!("\n2. Rollback-only marking:");
    {
        let mut ctx = TransactionContext::new();
        let outer = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
        let inner = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;

        coordinator.rollback(&mut ctx, inner)?;
        println!("   inner rolled back; ctx.is_rollback_only() = {}", ctx.is_rollback_only());

        match coordinator.commit(&mut ctx, outer) {
            Err(Error::UnexpectedRollback) => {
                println!("   outer commit failed as expected: UnexpectedRollback")
            }
            other => println!("   unexpected outcome: {:?}", other.err()),
        }
        println!("   physical rollbacks so far: {}", probe.rollbacks());
    }

    // Demo 3: REQUIRES_NEW isolates the inner outcome
    println!("\n3. REQUIRES_NEW suspension:");
    {
        let mut ctx = TransactionContext::new();
        let outer = coordinator.begin(&mut ctx, &TransactionDefinition::required())?;
        let outer_id = outer.txn_id();

        let inner = coordinator.begin(&mut ctx, &TransactionDefinition::requires_new())?;
        println!("   inner.is_new() = {} (own physical transaction)", inner.is_new());
        println!("   active transaction while inner runs: {:?}", ctx.active_id());

        coordinator.rollback(&mut ctx, inner)?;
        println!("   after inner rollback, active transaction: {:?}", ctx.active_id());
        assert_eq!(ctx.active_id(), Some(outer_id));

        coordinator.commit(&mut ctx, outer)?;
        println!("   outer committed cleanly despite the inner rollback");
    }

    println!(
        "\nTotals: {} acquired, {} released, {} commits, {} rollbacks",
        probe.acquired(),
        probe.released(),
        probe.commits(),
        probe.rollbacks()
    );
    Ok(())
}
