#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use txnkit::{ProbeProvider, TransactionContext, TransactionCoordinator, TransactionDefinition};

#[derive(Arbitrary, Debug)]
enum TxOp {
    BeginRequired,
    BeginRequiresNew,
    FailNextAcquire,
    CommitTop,
    RollbackTop,
}

fuzz_target!(|ops: Vec<TxOp>| {
    let probe = ProbeProvider::new();
    let coordinator = TransactionCoordinator::new(probe.clone());
    let mut ctx = TransactionContext::new();
    let mut handles = Vec::new();

    for op in ops.into_iter().take(64) {
        match op {
            TxOp::BeginRequired => {
                if let Ok(tx) = coordinator.begin(&mut ctx, &TransactionDefinition::required()) {
                    handles.push(tx);
                }
            }
            TxOp::BeginRequiresNew => {
                if let Ok(tx) = coordinator.begin(&mut ctx, &TransactionDefinition::requires_new())
                {
                    handles.push(tx);
                }
            }
            TxOp::FailNextAcquire => probe.fail_next_acquire(),
            TxOp::CommitTop => {
                if let Some(tx) = handles.pop() {
                    let _ = coordinator.commit(&mut ctx, tx);
                }
            }
            TxOp::RollbackTop => {
                if let Some(tx) = handles.pop() {
                    let _ = coordinator.rollback(&mut ctx, tx);
                }
            }
        }
    }

    // Drain in LIFO order; completing every handle must leave the context
    // empty with no leaked connections.
    while let Some(tx) = handles.pop() {
        let _ = coordinator.rollback(&mut ctx, tx);
    }
    assert!(!ctx.has_active());
    assert_eq!(probe.acquired(), probe.released());
});
