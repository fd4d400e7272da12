//! Dry-run of a governor migration on a throwaway engine.

use anyhow::{bail, Context};
use gavel_engine::{Engine, EngineConfig, EventRecord, MigrationPlan};
use gavel_governance::Support;
use gavel_nullables::{NullClock, NullWeightOracle};
use gavel_types::{Principal, Tick};
use tracing::info;

const TIMELOCK: &str = "timelock";
const PREDECESSOR: &str = "governor-alpha";
const SUCCESSOR: &str = "governor-bravo";
const GUARDIAN: &str = "guardian";

/// Deploy a timelock and two governors, pass the migration proposal with
/// every delegate voting for it, then queue and execute it. Returns the
/// full event log.
pub fn run_migration(
    config: &EngineConfig,
    delegates: &[(String, u128)],
) -> anyhow::Result<Vec<EventRecord>> {
    let holders: Vec<(Principal, u128)> = delegates
        .iter()
        .map(|(name, weight)| (Principal::new(name.as_str()), *weight))
        .collect();
    let Some((proposer, _)) = holders.iter().max_by_key(|(_, weight)| *weight) else {
        bail!("at least one delegate is required");
    };
    let proposer = proposer.clone();

    let oracle = NullWeightOracle::with_holders(
        holders.iter().map(|(who, weight)| (who, *weight)),
        Tick::ZERO,
    );
    let clock = NullClock::new(1);
    let started = clock.now();
    let mut engine = Engine::new(oracle);

    let timelock = Principal::new(TIMELOCK);
    let predecessor = Principal::new(PREDECESSOR);
    let successor = Principal::new(SUCCESSOR);
    let governor_params = config.governor_params();

    engine.deploy_timelock(
        timelock.clone(),
        predecessor.clone(),
        config.timelock_params(),
        clock.now(),
    )?;
    engine.deploy_governor(
        predecessor.clone(),
        timelock.clone(),
        Some(Principal::new(GUARDIAN)),
        governor_params,
        clock.now(),
    )?;
    engine.deploy_governor(successor.clone(), timelock.clone(), None, governor_params, clock.now())?;

    let plan = MigrationPlan::new(timelock.clone(), successor, predecessor.clone());
    let id = engine
        .propose_migration(&plan, &proposer, clock.now())
        .context("migration proposal rejected")?;

    let now = clock.advance(governor_params.voting_delay + 1);
    for (voter, _) in &holders {
        engine.cast_vote(&predecessor, id, voter, Support::For, now)?;
    }

    let now = clock.advance(governor_params.voting_period);
    let state = engine.state(&predecessor, id, now)?;
    info!(%id, %state, "voting closed");
    let eta = engine
        .queue(&predecessor, id, now)
        .with_context(|| format!("proposal {id} could not be queued ({state})"))?;
    info!(%id, %eta, opens = %gavel_utils::format_until(eta, now), "migration queued");

    let now = clock.advance_to(eta);
    engine.execute(&predecessor, id, now)?;
    info!(
        %id,
        admin = %engine.timelock(&timelock)?.admin(),
        elapsed = %gavel_utils::format_span(now.value().saturating_sub(started.value())),
        "migration executed"
    );

    Ok(engine.events().to_vec())
}
