// Integration tests for rollback-only propagation through a service layer:
// an inner participant's failure cannot be recovered by the outer caller
// unless the inner work ran under REQUIRES_NEW.

mod common;

use common::TxFixture;
use txnkit::{
    Error, ProbeConnection, ProbeProvider, Result, TransactionContext, TransactionCoordinator,
    TransactionDefinition,
};

type Ctx = TransactionContext<ProbeConnection>;
type Coordinator = TransactionCoordinator<ProbeProvider>;

/// Inner unit of work that always succeeds, e.g. saving the primary record.
fn save_record(coordinator: &Coordinator, ctx: &mut Ctx) -> Result<()> {
    let tx = coordinator.begin(ctx, &TransactionDefinition::required())?;
    coordinator.commit(ctx, tx)
}

/// Inner unit of work that fails when asked to, e.g. an audit-log write.
/// On failure it rolls back its logical transaction before reporting.
fn save_audit(coordinator: &Coordinator, ctx: &mut Ctx, fail: bool) -> Result<()> {
    let tx = coordinator.begin(ctx, &TransactionDefinition::required())?;
    if fail {
        coordinator.rollback(ctx, tx)?;
        return Err(Error::Resource("audit write failed".to_string()));
    }
    coordinator.commit(ctx, tx)
}

/// Same failing unit of work, but isolated in its own physical transaction.
fn save_audit_requires_new(coordinator: &Coordinator, ctx: &mut Ctx, fail: bool) -> Result<()> {
    let tx = coordinator.begin(ctx, &TransactionDefinition::requires_new())?;
    if fail {
        coordinator.rollback(ctx, tx)?;
        return Err(Error::Resource("audit write failed".to_string()));
    }
    coordinator.commit(ctx, tx)
}

#[test]
fn test_all_participants_succeed() {
    let fixture = TxFixture::new();
    let mut ctx = fixture.context();

    let outer = fixture
        .coordinator
        .begin(&mut ctx, &TransactionDefinition::required())
        .expect("outer begin");

    save_record(&fixture.coordinator, &mut ctx).expect("record");
    save_audit(&fixture.coordinator, &mut ctx, false).expect("audit");

    fixture.coordinator.commit(&mut ctx, outer).expect("outer commit");

    // One physical transaction covered all three logical ones.
    assert_eq!(fixture.probe.acquired(), 1);
    assert_eq!(fixture.probe.commits(), 1);
    assert_eq!(fixture.probe.rollbacks(), 0);
    fixture.assert_no_leak();
}

#[test]
fn test_recovered_participant_failure_still_rolls_back() {
    let fixture = TxFixture::new();
    let mut ctx = fixture.context();

    let outer = fixture
        .coordinator
        .begin(&mut ctx, &TransactionDefinition::required())
        .expect("outer begin");

    save_record(&fixture.coordinator, &mut ctx).expect("record");

    // The caller catches the audit failure and decides to commit anyway.
    let audit = save_audit(&fixture.coordinator, &mut ctx, true);
    assert!(audit.is_err());

    // Too late: the participant already latched the shared transaction.
    let err = fixture
        .coordinator
        .commit(&mut ctx, outer)
        .expect_err("commit after participant rollback");
    assert!(matches!(err, Error::UnexpectedRollback));

    assert_eq!(fixture.probe.commits(), 0);
    assert_eq!(fixture.probe.rollbacks(), 1);
    fixture.assert_no_leak();
}

#[test]
fn test_requires_new_isolates_participant_failure() {
    let fixture = TxFixture::new();
    let mut ctx = fixture.context();

    let outer = fixture
        .coordinator
        .begin(&mut ctx, &TransactionDefinition::required())
        .expect("outer begin");

    save_record(&fixture.coordinator, &mut ctx).expect("record");

    // The audit failure happened in its own physical transaction; catching
    // it really does recover the outer one.
    let audit = save_audit_requires_new(&fixture.coordinator, &mut ctx, true);
    assert!(audit.is_err());
    assert!(!ctx.is_rollback_only());

    fixture.coordinator.commit(&mut ctx, outer).expect("outer commit");

    assert_eq!(fixture.probe.acquired(), 2);
    assert_eq!(fixture.probe.commits(), 1);
    assert_eq!(fixture.probe.rollbacks(), 1);
    fixture.assert_no_leak();
}

#[test]
fn test_latch_survives_later_participants() {
    let fixture = TxFixture::new();
    let mut ctx = fixture.context();
    let def = TransactionDefinition::required();

    let outer = fixture.coordinator.begin(&mut ctx, &def).expect("outer");

    // First participant fails and latches the transaction.
    let failed = save_audit(&fixture.coordinator, &mut ctx, true);
    assert!(failed.is_err());

    // Later participants still run and complete normally.
    save_record(&fixture.coordinator, &mut ctx).expect("record");
    assert!(ctx.is_rollback_only());

    let err = fixture
        .coordinator
        .commit(&mut ctx, outer)
        .expect_err("latched transaction");
    assert!(matches!(err, Error::UnexpectedRollback));
    fixture.assert_no_leak();
}

#[test]
fn test_participant_commit_on_latched_transaction_is_silent() {
    let fixture = TxFixture::new();
    let mut ctx = fixture.context();
    let def = TransactionDefinition::required();

    let outer = fixture.coordinator.begin(&mut ctx, &def).expect("outer");
    let first = fixture.coordinator.begin(&mut ctx, &def).expect("first");
    let second = fixture.coordinator.begin(&mut ctx, &def).expect("second");

    fixture
        .coordinator
        .rollback(&mut ctx, second)
        .expect("participant rollback");

    // A sibling participant's commit returns Ok: it is not the owner, so
    // the deferred failure is not its to report.
    fixture
        .coordinator
        .commit(&mut ctx, first)
        .expect("participant commit on latched transaction");
    assert_eq!(fixture.probe.commits(), 0);

    let err = fixture
        .coordinator
        .commit(&mut ctx, outer)
        .expect_err("owner commit");
    assert!(matches!(err, Error::UnexpectedRollback));
    fixture.assert_no_leak();
}

#[test]
fn test_owner_rollback_of_latched_transaction_is_not_an_error() {
    let fixture = TxFixture::new();
    let mut ctx = fixture.context();
    let def = TransactionDefinition::required();

    let outer = fixture.coordinator.begin(&mut ctx, &def).expect("outer");
    let inner = fixture.coordinator.begin(&mut ctx, &def).expect("inner");

    fixture
        .coordinator
        .rollback(&mut ctx, inner)
        .expect("participant rollback");

    // The owner asking for rollback agrees with the latch; no surprise to
    // report.
    fixture
        .coordinator
        .rollback(&mut ctx, outer)
        .expect("owner rollback");
    assert_eq!(fixture.probe.rollbacks(), 1);
    fixture.assert_no_leak();
}

#[test]
fn test_latch_cleared_with_physical_completion() {
    let fixture = TxFixture::new();
    let mut ctx = fixture.context();
    let def = TransactionDefinition::required();

    let outer = fixture.coordinator.begin(&mut ctx, &def).expect("outer");
    let inner = fixture.coordinator.begin(&mut ctx, &def).expect("inner");
    fixture
        .coordinator
        .rollback(&mut ctx, inner)
        .expect("participant rollback");
    let err = fixture
        .coordinator
        .commit(&mut ctx, outer)
        .expect_err("owner commit on latched transaction");
    assert!(matches!(err, Error::UnexpectedRollback));

    // The latch died with its physical transaction; a fresh one is clean.
    let tx = fixture.coordinator.begin(&mut ctx, &def).expect("begin");
    assert!(!tx.is_rollback_only(&ctx));
    fixture.coordinator.commit(&mut ctx, tx).expect("commit");
    assert_eq!(fixture.probe.commits(), 1);
    fixture.assert_no_leak();
}
