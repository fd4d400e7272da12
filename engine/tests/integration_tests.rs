//! End-to-end governance scenarios: propose, vote, queue, execute and the
//! timelock handoff between two governors, driven through the engine with
//! an in-memory weight oracle.

use gavel_engine::dispatch::{set_delay_call, set_pending_admin_call};
use gavel_engine::{Engine, ErrorKind, EventRecord, GovernanceEvent, MigrationPlan};
use gavel_governance::{GovernorParams, ProposalId, ProposalState, Support};
use gavel_nullables::NullWeightOracle;
use gavel_timelock::{TimelockParams, GRACE_PERIOD, MINIMUM_DELAY};
use gavel_types::{Action, Principal, Tick, Weight};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const VOTING_DELAY: u64 = 1;
const VOTING_PERIOD: u64 = 100;
const QUORUM: u128 = 2_500_000;
const THRESHOLD: u128 = 100_000;

type TestEngine = Engine<Arc<NullWeightOracle>>;

fn p(name: &str) -> Principal {
    Principal::new(name)
}

fn t(tick: u64) -> Tick {
    Tick::new(tick)
}

fn timelock() -> Principal {
    p("timelock")
}

fn alpha() -> Principal {
    p("gov-alpha")
}

fn bravo() -> Principal {
    p("gov-bravo")
}

fn governor_params() -> GovernorParams {
    GovernorParams {
        voting_delay: VOTING_DELAY,
        voting_period: VOTING_PERIOD,
        proposal_threshold: Weight::new(THRESHOLD),
        quorum_votes: Weight::new(QUORUM),
        proposal_max_operations: 10,
    }
}

/// Six delegates holding 7.8M weight in total.
fn delegates() -> Vec<(Principal, u128)> {
    vec![
        (p("dana"), 2_000_000),
        (p("eli"), 1_500_000),
        (p("fay"), 1_400_000),
        (p("gus"), 1_300_000),
        (p("hal"), 900_000),
        (p("ivy"), 700_000),
    ]
}

/// A timelock administered by `gov-alpha`, plus `gov-bravo` bound to the same
/// timelock and waiting to take over.
fn setup() -> (TestEngine, Arc<NullWeightOracle>) {
    let holders = delegates();
    let oracle = Arc::new(NullWeightOracle::with_holders(
        holders.iter().map(|(who, weight)| (who, *weight)),
        Tick::ZERO,
    ));
    let mut engine = Engine::new(Arc::clone(&oracle));
    engine
        .deploy_timelock(timelock(), alpha(), TimelockParams::default(), t(1))
        .expect("deploy timelock");
    engine
        .deploy_governor(alpha(), timelock(), Some(p("guardian")), governor_params(), t(1))
        .expect("deploy alpha");
    engine
        .deploy_governor(bravo(), timelock(), Some(p("guardian-b")), governor_params(), t(1))
        .expect("deploy bravo");
    (engine, oracle)
}

/// Voting has closed for a proposal created at `created`.
fn after_voting(created: u64) -> u64 {
    created + VOTING_DELAY + VOTING_PERIOD + 1
}

/// Propose at `now`, vote it through with a clear majority, and return the
/// id and the first tick at which it is Succeeded.
fn pass(engine: &mut TestEngine, governor: &Principal, actions: Vec<Action>, now: u64) -> (ProposalId, u64) {
    let id = engine
        .propose(governor, &p("dana"), actions, "test proposal", t(now))
        .expect("propose");
    let voting = now + VOTING_DELAY + 1;
    for voter in ["dana", "eli", "fay"] {
        engine
            .cast_vote(governor, id, &p(voter), Support::For, t(voting))
            .expect("vote for");
    }
    engine
        .cast_vote(governor, id, &p("gus"), Support::Against, t(voting))
        .expect("vote against");
    let closed = after_voting(now);
    assert_eq!(engine.state(governor, id, t(closed)).unwrap(), ProposalState::Succeeded);
    (id, closed)
}

fn kinds_of(events: &[EventRecord]) -> Vec<&'static str> {
    events
        .iter()
        .map(|r| match r.event {
            GovernanceEvent::TimelockDeployed { .. } => "timelock_deployed",
            GovernanceEvent::GovernorDeployed { .. } => "governor_deployed",
            GovernanceEvent::ProposalCreated { .. } => "proposal_created",
            GovernanceEvent::VoteCast { .. } => "vote_cast",
            GovernanceEvent::ProposalQueued { .. } => "proposal_queued",
            GovernanceEvent::ProposalExecuted { .. } => "proposal_executed",
            GovernanceEvent::ProposalCanceled { .. } => "proposal_canceled",
            GovernanceEvent::TransactionQueued { .. } => "transaction_queued",
            GovernanceEvent::TransactionExecuted { .. } => "transaction_executed",
            GovernanceEvent::TransactionCanceled { .. } => "transaction_canceled",
            GovernanceEvent::NewPendingAdmin { .. } => "new_pending_admin",
            GovernanceEvent::NewAdmin { .. } => "new_admin",
            GovernanceEvent::NewDelay { .. } => "new_delay",
            GovernanceEvent::GuardianAbdicated { .. } => "guardian_abdicated",
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scenario A: pass and migrate
// ---------------------------------------------------------------------------

#[test]
fn migration_proposal_hands_timelock_to_successor() {
    let (mut engine, _oracle) = setup();
    let plan = MigrationPlan::new(timelock(), bravo(), alpha());

    let id = engine.propose_migration(&plan, &p("dana"), t(10)).unwrap();
    assert_eq!(id, ProposalId::new(1));
    assert_eq!(engine.state(&alpha(), id, t(10)).unwrap(), ProposalState::Pending);

    for voter in ["dana", "eli", "fay"] {
        engine.cast_vote(&alpha(), id, &p(voter), Support::For, t(12)).unwrap();
    }
    engine.cast_vote(&alpha(), id, &p("gus"), Support::Against, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("hal"), Support::Abstain, t(12)).unwrap();
    assert_eq!(engine.state(&alpha(), id, t(12)).unwrap(), ProposalState::Active);

    let tally = engine.proposal(&alpha(), id).unwrap().tally;
    assert_eq!(tally.for_weight, Weight::new(4_900_000));
    assert_eq!(tally.against_weight, Weight::new(1_300_000));
    assert_eq!(tally.abstain_weight, Weight::new(900_000));

    let closed = after_voting(10);
    assert_eq!(engine.state(&alpha(), id, t(closed)).unwrap(), ProposalState::Succeeded);

    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();
    assert_eq!(eta, t(closed + MINIMUM_DELAY));
    assert_eq!(engine.state(&alpha(), id, t(closed)).unwrap(), ProposalState::Queued);
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 2);

    let err = engine.execute(&alpha(), id, t(closed + 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimelockNotReady);

    let before = engine.events().len();
    engine.execute(&alpha(), id, eta).unwrap();

    let tl = engine.timelock(&timelock()).unwrap();
    assert_eq!(tl.admin(), &bravo());
    assert_eq!(tl.pending_admin(), None);
    assert_eq!(tl.queued_count(), 0);
    assert_eq!(engine.state(&alpha(), id, eta).unwrap(), ProposalState::Executed);

    assert_eq!(
        kinds_of(&engine.events()[before..]),
        vec![
            "new_pending_admin",
            "transaction_executed",
            "new_admin",
            "transaction_executed",
            "proposal_executed",
        ]
    );

    // The successor continues numbering after the predecessor.
    assert_eq!(engine.proposal_count(&bravo()).unwrap(), 1);
    let next = engine
        .propose(&bravo(), &p("dana"), vec![Action::transfer(p("ivy"), 0)], "first", eta)
        .unwrap();
    assert_eq!(next, ProposalId::new(2));
}

#[test]
fn event_log_is_gap_free_and_tick_stamped() {
    let (mut engine, _oracle) = setup();
    let plan = MigrationPlan::new(timelock(), bravo(), alpha());
    let id = engine.propose_migration(&plan, &p("dana"), t(10)).unwrap();
    engine.cast_vote(&alpha(), id, &p("dana"), Support::For, t(12)).unwrap();

    let events = engine.events();
    for (i, record) in events.iter().enumerate() {
        assert_eq!(record.seq, i as u64);
    }
    let last = events.last().unwrap();
    assert_eq!(last.tick, t(12));
    match &last.event {
        GovernanceEvent::VoteCast { state, weight, .. } => {
            assert_eq!(*state, ProposalState::Active);
            assert_eq!(*weight, Weight::new(2_000_000));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenario B: defeat
// ---------------------------------------------------------------------------

#[test]
fn majority_against_defeats_proposal() {
    let (mut engine, _oracle) = setup();
    let plan = MigrationPlan::new(timelock(), bravo(), alpha());
    let id = engine.propose_migration(&plan, &p("dana"), t(10)).unwrap();

    engine.cast_vote(&alpha(), id, &p("fay"), Support::For, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("gus"), Support::For, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("dana"), Support::Against, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("eli"), Support::Against, t(12)).unwrap();

    let closed = after_voting(10);
    assert_eq!(engine.state(&alpha(), id, t(closed)).unwrap(), ProposalState::Defeated);

    let err = engine.queue(&alpha(), id, t(closed)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(engine.timelock(&timelock()).unwrap().admin(), &alpha());
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 0);
}

#[test]
fn majority_below_quorum_is_defeated() {
    let (mut engine, _oracle) = setup();
    let id = engine
        .propose(&alpha(), &p("hal"), vec![Action::transfer(p("ivy"), 0)], "small", t(10))
        .unwrap();
    engine.cast_vote(&alpha(), id, &p("hal"), Support::For, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("ivy"), Support::For, t(12)).unwrap();
    // 1.6M for, nothing against, but quorum is 2.5M.
    assert_eq!(
        engine.state(&alpha(), id, t(after_voting(10))).unwrap(),
        ProposalState::Defeated
    );
}

#[test]
fn tied_vote_is_defeated() {
    let (mut engine, _oracle) = setup();
    let id = engine
        .propose(&alpha(), &p("dana"), vec![Action::transfer(p("ivy"), 0)], "tie", t(10))
        .unwrap();
    engine.cast_vote(&alpha(), id, &p("dana"), Support::For, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("hal"), Support::For, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("eli"), Support::Against, t(12)).unwrap();
    engine.cast_vote(&alpha(), id, &p("fay"), Support::Against, t(12)).unwrap();
    // 2.9M for, 2.9M against.
    assert_eq!(
        engine.state(&alpha(), id, t(after_voting(10))).unwrap(),
        ProposalState::Defeated
    );
}

// ---------------------------------------------------------------------------
// Scenario C: post-migration lockout
// ---------------------------------------------------------------------------

#[test]
fn predecessor_cannot_queue_after_migration() {
    let (mut engine, _oracle) = setup();
    let plan = MigrationPlan::new(timelock(), bravo(), alpha());
    let (migration, closed) = pass(&mut engine, &alpha(), plan.actions(), 10);

    // A second proposal on alpha that passes while the migration waits.
    let (stale, stale_closed) = pass(
        &mut engine,
        &alpha(),
        vec![Action::transfer(p("ivy"), 0)],
        closed,
    );

    let eta = engine.queue(&alpha(), migration, t(stale_closed)).unwrap();
    engine.execute(&alpha(), migration, eta).unwrap();
    assert_eq!(engine.timelock(&timelock()).unwrap().admin(), &bravo());

    let err = engine.queue(&alpha(), stale, eta).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(engine.state(&alpha(), stale, eta).unwrap(), ProposalState::Succeeded);
}

#[test]
fn successor_controls_timelock_after_migration() {
    let (mut engine, _oracle) = setup();
    let plan = MigrationPlan::new(timelock(), bravo(), alpha());
    let (migration, closed) = pass(&mut engine, &alpha(), plan.actions(), 10);
    let eta = engine.queue(&alpha(), migration, t(closed)).unwrap();
    engine.execute(&alpha(), migration, eta).unwrap();

    engine.deposit(&timelock(), 5_000, eta).unwrap();
    let (id, closed) = pass(
        &mut engine,
        &bravo(),
        vec![Action::transfer(p("ivy"), 1_200)],
        eta.value(),
    );
    let eta = engine.queue(&bravo(), id, t(closed)).unwrap();
    engine.execute(&bravo(), id, eta).unwrap();

    assert_eq!(engine.balance(&p("ivy")), 1_200);
    assert_eq!(engine.balance(&timelock()), 3_800);
}

#[test]
fn accept_without_pending_transfer_fails() {
    let (mut engine, _oracle) = setup();
    let err = engine
        .accept_admin(&bravo(), &p("guardian-b"), Some(&alpha()), t(5))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(engine.timelock(&timelock()).unwrap().admin(), &alpha());
}

#[test]
fn guardian_completes_dangling_handoff() {
    let (mut engine, _oracle) = setup();
    // Only the first half of the handoff passes through governance.
    let (id, closed) = pass(
        &mut engine,
        &alpha(),
        vec![set_pending_admin_call(&timelock(), &bravo())],
        10,
    );
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();
    engine.execute(&alpha(), id, eta).unwrap();

    let tl = engine.timelock(&timelock()).unwrap();
    assert_eq!(tl.admin(), &alpha());
    assert_eq!(tl.pending_admin(), Some(&bravo()));

    let err = engine
        .accept_admin(&bravo(), &p("mallory"), None, eta)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    engine
        .accept_admin(&bravo(), &p("guardian-b"), Some(&alpha()), eta)
        .unwrap();
    assert_eq!(engine.timelock(&timelock()).unwrap().admin(), &bravo());
    assert_eq!(engine.proposal_count(&bravo()).unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Scenario D: atomicity
// ---------------------------------------------------------------------------

#[test]
fn failing_action_rolls_back_whole_execute() {
    let (mut engine, _oracle) = setup();
    engine.deposit(&timelock(), 100, t(5)).unwrap();
    let actions = vec![
        Action::transfer(p("ivy"), 100),
        // Below the minimum delay: the timelock refuses it.
        set_delay_call(&timelock(), 60),
    ];
    let (id, closed) = pass(&mut engine, &alpha(), actions, 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();

    let events_before = engine.events().len();
    let err = engine.execute(&alpha(), id, eta).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DelayOutOfRange);

    assert_eq!(engine.balance(&p("ivy")), 0);
    assert_eq!(engine.balance(&timelock()), 100);
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 2);
    assert_eq!(engine.state(&alpha(), id, eta).unwrap(), ProposalState::Queued);
    assert_eq!(engine.events().len(), events_before);

    let retry = engine.execute(&alpha(), id, eta.after(1)).unwrap_err();
    assert_eq!(retry.kind(), ErrorKind::DelayOutOfRange);
    assert_eq!(engine.balance(&timelock()), 100);
}

#[test]
fn failed_migration_keeps_original_admin() {
    let (mut engine, _oracle) = setup();
    let charlie = p("gov-charlie");
    engine
        .deploy_timelock(p("timelock-2"), charlie.clone(), TimelockParams::default(), t(1))
        .unwrap();
    engine
        .deploy_governor(charlie.clone(), p("timelock-2"), None, governor_params(), t(1))
        .unwrap();

    // Charlie answers only to timelock-2, so the accept call from `timelock`
    // is refused after setPendingAdmin already ran.
    let plan = MigrationPlan::new(timelock(), charlie, alpha());
    let (id, closed) = pass(&mut engine, &alpha(), plan.actions(), 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();

    let events_before = engine.events().len();
    let err = engine.execute(&alpha(), id, eta).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let tl = engine.timelock(&timelock()).unwrap();
    assert_eq!(tl.admin(), &alpha());
    assert_eq!(tl.pending_admin(), None);
    assert_eq!(tl.queued_count(), 2);
    assert_eq!(engine.state(&alpha(), id, eta).unwrap(), ProposalState::Queued);
    assert_eq!(engine.events().len(), events_before);

    let retry = engine.execute(&alpha(), id, eta.after(1)).unwrap_err();
    assert_eq!(retry.kind(), ErrorKind::Authorization);
    assert_eq!(engine.timelock(&timelock()).unwrap().pending_admin(), None);
}

#[test]
fn underfunded_transfer_fails_execute() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 1)], 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();
    let err = engine.execute(&alpha(), id, eta).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvokeFailed);
    assert_eq!(engine.state(&alpha(), id, eta).unwrap(), ProposalState::Queued);
}

// ---------------------------------------------------------------------------
// Queue and execution window
// ---------------------------------------------------------------------------

#[test]
fn execute_window_is_half_open() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 0)], 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();

    let err = engine.execute(&alpha(), id, t(eta.value() - 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimelockNotReady);

    let last_moment = t(eta.value() + GRACE_PERIOD - 1);
    assert_eq!(engine.state(&alpha(), id, last_moment).unwrap(), ProposalState::Queued);
    let deadline = eta.after(GRACE_PERIOD);
    assert_eq!(engine.state(&alpha(), id, deadline).unwrap(), ProposalState::Expired);

    engine.execute(&alpha(), id, last_moment).unwrap();
    assert_eq!(engine.state(&alpha(), id, deadline).unwrap(), ProposalState::Executed);
}

#[test]
fn execute_after_grace_is_expired() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 0)], 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();

    let err = engine.execute(&alpha(), id, eta.after(GRACE_PERIOD)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimelockExpired);
}

#[test]
fn expired_transactions_stay_queued_until_canceled() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 0)], 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();

    let expired = eta.after(GRACE_PERIOD);
    assert_eq!(engine.state(&alpha(), id, expired).unwrap(), ProposalState::Expired);
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 1);

    // The proposer still clears the threshold, so only the guardian may cancel.
    let err = engine.cancel(&alpha(), &p("eli"), id, expired).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 1);

    engine.cancel(&alpha(), &p("guardian"), id, expired).unwrap();
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 0);
    assert_eq!(engine.state(&alpha(), id, expired).unwrap(), ProposalState::Canceled);
}

#[test]
fn execute_requires_queued_proposal() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 0)], 10);
    let err = engine.execute(&alpha(), id, t(closed)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn queue_twice_fails() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 0)], 10);
    engine.queue(&alpha(), id, t(closed)).unwrap();
    let err = engine.queue(&alpha(), id, t(closed)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn identical_actions_in_one_proposal_conflict() {
    let (mut engine, _oracle) = setup();
    let action = Action::transfer(p("ivy"), 0);
    let (id, closed) = pass(&mut engine, &alpha(), vec![action.clone(), action], 10);
    let err = engine.queue(&alpha(), id, t(closed)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateQueue);
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 0);
    assert_eq!(engine.state(&alpha(), id, t(closed)).unwrap(), ProposalState::Succeeded);
}

#[test]
fn identical_actions_across_proposals_conflict_at_same_eta() {
    let (mut engine, _oracle) = setup();
    let action = Action::transfer(p("ivy"), 0);
    let first = engine
        .propose(&alpha(), &p("dana"), vec![action.clone()], "one", t(10))
        .unwrap();
    let second = engine
        .propose(&alpha(), &p("eli"), vec![action], "two", t(10))
        .unwrap();
    for id in [first, second] {
        for voter in ["dana", "eli", "fay"] {
            engine.cast_vote(&alpha(), id, &p(voter), Support::For, t(12)).unwrap();
        }
    }
    let closed = t(after_voting(10));
    engine.queue(&alpha(), first, closed).unwrap();
    let err = engine.queue(&alpha(), second, closed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateQueue);
    // One tick later the eta differs and the hashes no longer collide.
    engine.queue(&alpha(), second, closed.after(1)).unwrap();
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

#[test]
fn vote_weight_is_snapshotted_at_start() {
    let (mut engine, oracle) = setup();
    let id = engine
        .propose(&alpha(), &p("dana"), vec![Action::transfer(p("ivy"), 0)], "snap", t(10))
        .unwrap();
    oracle.set_weight(&p("ivy"), t(11), Weight::new(9_000_000));
    oracle.set_weight(&p("hal"), t(12), Weight::new(9_000_000));

    let ivy = engine.cast_vote(&alpha(), id, &p("ivy"), Support::For, t(12)).unwrap();
    let hal = engine.cast_vote(&alpha(), id, &p("hal"), Support::For, t(13)).unwrap();
    assert_eq!(ivy.weight, Weight::new(9_000_000));
    assert_eq!(hal.weight, Weight::new(900_000));
}

#[test]
fn second_vote_is_rejected_and_tally_unchanged() {
    let (mut engine, _oracle) = setup();
    let id = engine
        .propose(&alpha(), &p("dana"), vec![Action::transfer(p("ivy"), 0)], "once", t(10))
        .unwrap();
    engine.cast_vote(&alpha(), id, &p("eli"), Support::For, t(12)).unwrap();
    let tally = engine.proposal(&alpha(), id).unwrap().tally;

    let err = engine
        .cast_vote(&alpha(), id, &p("eli"), Support::Against, t(13))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyVoted);
    assert_eq!(engine.proposal(&alpha(), id).unwrap().tally, tally);

    let receipt = engine.receipt(&alpha(), id, &p("eli")).unwrap().unwrap();
    assert!(receipt.has_voted);
    assert_eq!(receipt.support, Support::For);
}

#[test]
fn voting_outside_window_fails() {
    let (mut engine, _oracle) = setup();
    let id = engine
        .propose(&alpha(), &p("dana"), vec![Action::transfer(p("ivy"), 0)], "early", t(10))
        .unwrap();
    let err = engine.cast_vote(&alpha(), id, &p("eli"), Support::For, t(11)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = engine
        .cast_vote(&alpha(), id, &p("eli"), Support::For, t(after_voting(10)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn propose_validates_proposer_and_actions() {
    let (mut engine, _oracle) = setup();
    let err = engine
        .propose(&alpha(), &p("nobody"), vec![Action::transfer(p("ivy"), 0)], "x", t(10))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BelowThreshold);

    let err = engine.propose(&alpha(), &p("dana"), Vec::new(), "x", t(10)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArrayLengthMismatch);

    let many = vec![Action::transfer(p("ivy"), 0); 11];
    let err = engine.propose(&alpha(), &p("dana"), many, "x", t(10)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooManyActions);

    let err = engine
        .propose(&p("gov-missing"), &p("dana"), vec![Action::transfer(p("ivy"), 0)], "x", t(10))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownInstance);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[test]
fn guardian_cancels_queued_proposal() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 0)], 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 1);

    let err = engine.cancel(&alpha(), &p("eli"), id, t(closed + 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    engine.cancel(&alpha(), &p("guardian"), id, t(closed + 1)).unwrap();
    assert_eq!(engine.timelock(&timelock()).unwrap().queued_count(), 0);
    assert_eq!(engine.state(&alpha(), id, eta).unwrap(), ProposalState::Canceled);

    let err = engine.execute(&alpha(), id, eta).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = engine.cancel(&alpha(), &p("guardian"), id, eta).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn anyone_cancels_when_proposer_drops_below_threshold() {
    let (mut engine, oracle) = setup();
    let id = engine
        .propose(&alpha(), &p("ivy"), vec![Action::transfer(p("ivy"), 0)], "fragile", t(10))
        .unwrap();
    oracle.set_weight(&p("ivy"), t(20), Weight::new(THRESHOLD - 1));
    engine.cancel(&alpha(), &p("hal"), id, t(20)).unwrap();
    assert_eq!(engine.state(&alpha(), id, t(20)).unwrap(), ProposalState::Canceled);
}

#[test]
fn executed_proposal_cannot_be_canceled() {
    let (mut engine, _oracle) = setup();
    let (id, closed) = pass(&mut engine, &alpha(), vec![Action::transfer(p("ivy"), 0)], 10);
    let eta = engine.queue(&alpha(), id, t(closed)).unwrap();
    engine.execute(&alpha(), id, eta).unwrap();
    let err = engine.cancel(&alpha(), &p("guardian"), id, eta).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

#[test]
fn subscribers_only_see_committed_events() {
    let (mut engine, _oracle) = setup();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    engine.subscribe(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let id = engine
        .propose(&alpha(), &p("dana"), vec![Action::transfer(p("ivy"), 0)], "watched", t(10))
        .unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    let _ = engine.queue(&alpha(), id, t(10));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    engine.cast_vote(&alpha(), id, &p("dana"), Support::For, t(12)).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}
