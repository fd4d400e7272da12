//! The engine: single writer over every governor and timelock.
//!
//! Every mutating call goes through [`Engine::transact`], which runs the
//! operation against a clone of the world. On success the clone replaces the
//! live world and the operation's events are appended to the log and handed
//! to subscribers; on failure the clone and its events are dropped.

use crate::dispatch;
use crate::event::{EventBus, EventRecord, GovernanceEvent};
use crate::world::World;
use crate::EngineError;
use gavel_governance::{
    actions_from_parts, GovernanceError, Governor, GovernorParams, Proposal, ProposalId,
    ProposalState, Receipt, Support, TimelockBinding, VotingWeightOracle,
};
use gavel_timelock::{Timelock, TimelockError, TimelockParams};
use gavel_types::{Action, Principal, Tick};
use tracing::{debug, info, warn};

pub struct Engine<O> {
    oracle: O,
    world: World,
    log: Vec<EventRecord>,
    bus: EventBus,
}

impl<O: VotingWeightOracle> Engine<O> {
    pub fn new(oracle: O) -> Self {
        Self::with_world(oracle, World::new())
    }

    /// Resume from a previously saved world. The event log starts empty; the
    /// world's last tick carries over, so operations dated before it fail.
    pub fn with_world(oracle: O, world: World) -> Self {
        Self {
            oracle,
            world,
            log: Vec::new(),
            bus: EventBus::new(),
        }
    }

    // ── Atomic pipeline ───────────────────────────────────────────────

    /// Each call clones the whole world, so its cost grows with the number of
    /// deployed instances, proposals and queued hashes, not with the size of
    /// the operation.
    fn transact<T>(
        &mut self,
        now: Tick,
        operation: &'static str,
        f: impl FnOnce(&mut World, &O) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let last = self.world.last_tick();
        if now < last {
            return Err(EngineError::ClockWentBackwards { now, last });
        }

        let mut working = self.world.clone();
        match f(&mut working, &self.oracle) {
            Ok(value) => {
                let events = working.take_pending();
                working.set_last_tick(now);
                self.world = working;
                for event in events {
                    let record = EventRecord {
                        seq: self.log.len() as u64,
                        tick: now,
                        event,
                    };
                    self.bus.emit(&record);
                    self.log.push(record);
                }
                Ok(value)
            }
            Err(err) => {
                warn!(operation, %now, error = %err, "operation rolled back");
                Err(err)
            }
        }
    }

    // ── Deployment ────────────────────────────────────────────────────

    pub fn deploy_timelock(
        &mut self,
        address: Principal,
        admin: Principal,
        params: TimelockParams,
        now: Tick,
    ) -> Result<(), EngineError> {
        self.transact(now, "deploy timelock", |world, _| {
            let timelock = Timelock::new(address.clone(), admin.clone(), params)?;
            world.insert_timelock(timelock)?;
            info!(timelock = %address, %admin, delay = params.delay, "timelock deployed");
            world.emit(GovernanceEvent::TimelockDeployed {
                timelock: address,
                admin,
                delay: params.delay,
            });
            Ok(())
        })
    }

    /// Deploy a governor bound to an already deployed timelock.
    pub fn deploy_governor(
        &mut self,
        address: Principal,
        timelock: Principal,
        guardian: Option<Principal>,
        params: GovernorParams,
        now: Tick,
    ) -> Result<(), EngineError> {
        self.transact(now, "deploy governor", |world, _| {
            let binding = TimelockBinding {
                address: timelock.clone(),
                grace_period: world.timelock(&timelock)?.grace_period(),
            };
            let governor = Governor::new(address.clone(), binding, guardian.clone(), params)?;
            world.insert_governor(governor)?;
            info!(governor = %address, %timelock, "governor deployed");
            world.emit(GovernanceEvent::GovernorDeployed {
                governor: address,
                timelock,
                guardian,
            });
            Ok(())
        })
    }

    /// Credit value to `holder`, typically a timelock that pays out through actions.
    pub fn deposit(&mut self, holder: &Principal, amount: u128, now: Tick) -> Result<(), EngineError> {
        self.transact(now, "deposit", |world, _| {
            world.credit(holder, amount);
            debug!(%holder, amount, "deposit");
            Ok(())
        })
    }

    // ── Proposal lifecycle ────────────────────────────────────────────

    pub fn propose(
        &mut self,
        governor: &Principal,
        proposer: &Principal,
        actions: Vec<Action>,
        description: &str,
        now: Tick,
    ) -> Result<ProposalId, EngineError> {
        self.transact(now, "propose", |world, oracle| {
            let gov = world.governor_mut(governor)?;
            let id = gov.propose(oracle, proposer, actions, description, now)?;
            let proposal = gov.proposal(id)?;
            let event = GovernanceEvent::ProposalCreated {
                governor: governor.clone(),
                id,
                proposer: proposer.clone(),
                start: proposal.start,
                end: proposal.end,
                state: gov.state(id, now)?,
            };
            world.emit(event);
            Ok(id)
        })
    }

    /// Propose from parallel field lists; see [`actions_from_parts`].
    #[allow(clippy::too_many_arguments)]
    pub fn propose_parts(
        &mut self,
        governor: &Principal,
        proposer: &Principal,
        targets: Vec<Principal>,
        values: Vec<u128>,
        selectors: Vec<String>,
        payloads: Vec<Vec<u8>>,
        description: &str,
        now: Tick,
    ) -> Result<ProposalId, EngineError> {
        let actions = actions_from_parts(targets, values, selectors, payloads)?;
        self.propose(governor, proposer, actions, description, now)
    }

    pub fn cast_vote(
        &mut self,
        governor: &Principal,
        id: ProposalId,
        voter: &Principal,
        support: Support,
        now: Tick,
    ) -> Result<Receipt, EngineError> {
        self.transact(now, "cast vote", |world, oracle| {
            let gov = world.governor_mut(governor)?;
            let receipt = gov.cast_vote(oracle, id, voter, support, now)?;
            let state = gov.state(id, now)?;
            world.emit(GovernanceEvent::VoteCast {
                governor: governor.clone(),
                id,
                voter: voter.clone(),
                support,
                weight: receipt.weight,
                state,
            });
            Ok(receipt)
        })
    }

    /// Schedule every action of a succeeded proposal. Returns the eta.
    pub fn queue(&mut self, governor: &Principal, id: ProposalId, now: Tick) -> Result<Tick, EngineError> {
        self.transact(now, "queue", |world, _| {
            let gov = world.governor(governor)?;
            gov.require_state(id, ProposalState::Succeeded, now, "queue")?;
            let timelock = gov.timelock().address.clone();
            let actions = gov.actions(id)?.to_vec();

            let tl = world.timelock_mut(&timelock)?;
            let eta = now.after(tl.delay());
            let mut hashes = Vec::with_capacity(actions.len());
            for action in &actions {
                hashes.push(tl.queue_transaction(governor, action, eta, now)?);
            }
            for (hash, action) in hashes.into_iter().zip(&actions) {
                world.emit(GovernanceEvent::TransactionQueued {
                    timelock: timelock.clone(),
                    id,
                    hash,
                    target: action.target.clone(),
                    eta,
                });
            }

            let gov = world.governor_mut(governor)?;
            gov.record_queued(id, eta)?;
            let state = gov.state(id, now)?;
            info!(%governor, %id, %eta, "proposal queued");
            world.emit(GovernanceEvent::ProposalQueued {
                governor: governor.clone(),
                id,
                eta,
                state,
            });
            Ok(eta)
        })
    }

    /// Perform every action of a queued proposal, all or nothing.
    pub fn execute(&mut self, governor: &Principal, id: ProposalId, now: Tick) -> Result<(), EngineError> {
        self.transact(now, "execute", |world, _| {
            let gov = world.governor(governor)?;
            let state = gov.state(id, now)?;
            let proposal = gov.proposal(id)?;
            let eta = match (state, proposal.eta) {
                (ProposalState::Queued, Some(eta)) => eta,
                (ProposalState::Expired, Some(eta)) => {
                    return Err(TimelockError::Expired {
                        eta,
                        deadline: eta.after(gov.timelock().grace_period),
                        now,
                    }
                    .into())
                }
                _ => {
                    return Err(GovernanceError::InvalidState {
                        id,
                        state,
                        operation: "execute",
                    }
                    .into())
                }
            };
            if now < eta {
                return Err(TimelockError::NotReady { eta, now }.into());
            }
            let timelock = gov.timelock().address.clone();
            let actions = proposal.actions.clone();

            for action in &actions {
                let hash = world
                    .timelock_mut(&timelock)?
                    .execute_transaction(governor, action, eta, now)?;
                dispatch::invoke(world, &timelock, action, Some(id))?;
                world.emit(GovernanceEvent::TransactionExecuted {
                    timelock: timelock.clone(),
                    id,
                    hash,
                    target: action.target.clone(),
                });
            }

            let gov = world.governor_mut(governor)?;
            gov.record_executed(id)?;
            let state = gov.state(id, now)?;
            info!(%governor, %id, actions = actions.len(), "proposal executed");
            world.emit(GovernanceEvent::ProposalExecuted {
                governor: governor.clone(),
                id,
                state,
            });
            Ok(())
        })
    }

    /// Cancel a proposal and drop whatever it still has in the timelock.
    pub fn cancel(
        &mut self,
        governor: &Principal,
        caller: &Principal,
        id: ProposalId,
        now: Tick,
    ) -> Result<(), EngineError> {
        self.transact(now, "cancel", |world, oracle| {
            let gov = world.governor(governor)?;
            gov.authorize_cancel(oracle, caller, id, now)?;
            let timelock = gov.timelock().address.clone();
            let proposal = gov.proposal(id)?;
            let eta = proposal.eta;
            let actions = proposal.actions.clone();

            if let Some(eta) = eta {
                let tl = world.timelock_mut(&timelock)?;
                let mut removed = Vec::new();
                for action in &actions {
                    if let Some(hash) = tl.cancel_transaction(governor, action, eta)? {
                        removed.push(hash);
                    }
                }
                for hash in removed {
                    world.emit(GovernanceEvent::TransactionCanceled {
                        timelock: timelock.clone(),
                        id,
                        hash,
                    });
                }
            }

            let gov = world.governor_mut(governor)?;
            gov.record_canceled(id)?;
            let state = gov.state(id, now)?;
            info!(%governor, %id, %caller, "proposal canceled");
            world.emit(GovernanceEvent::ProposalCanceled {
                governor: governor.clone(),
                id,
                state,
            });
            Ok(())
        })
    }

    // ── Guardian ──────────────────────────────────────────────────────

    pub fn abdicate(&mut self, governor: &Principal, caller: &Principal, now: Tick) -> Result<(), EngineError> {
        self.transact(now, "abdicate", |world, _| {
            world.governor_mut(governor)?.abdicate(caller)?;
            world.emit(GovernanceEvent::GuardianAbdicated {
                governor: governor.clone(),
            });
            Ok(())
        })
    }

    /// Call a governor's accept entry point directly, as its guardian would.
    pub fn accept_admin(
        &mut self,
        governor: &Principal,
        caller: &Principal,
        predecessor: Option<&Principal>,
        now: Tick,
    ) -> Result<(), EngineError> {
        self.transact(now, "accept admin", |world, _| {
            dispatch::accept_admin(world, governor, caller, predecessor, None)
        })
    }

    // ── Queries ───────────────────────────────────────────────────────

    /// Lifecycle state of a proposal at any tick, past or future.
    pub fn state(&self, governor: &Principal, id: ProposalId, now: Tick) -> Result<ProposalState, EngineError> {
        Ok(self.world.governor(governor)?.state(id, now)?)
    }

    pub fn proposal(&self, governor: &Principal, id: ProposalId) -> Result<&Proposal, EngineError> {
        Ok(self.world.governor(governor)?.proposal(id)?)
    }

    pub fn actions(&self, governor: &Principal, id: ProposalId) -> Result<&[Action], EngineError> {
        Ok(self.world.governor(governor)?.actions(id)?)
    }

    pub fn receipt(
        &self,
        governor: &Principal,
        id: ProposalId,
        voter: &Principal,
    ) -> Result<Option<&Receipt>, EngineError> {
        Ok(self.world.governor(governor)?.receipt(id, voter))
    }

    pub fn proposal_count(&self, governor: &Principal) -> Result<u64, EngineError> {
        Ok(self.world.governor(governor)?.proposal_count())
    }

    pub fn timelock(&self, address: &Principal) -> Result<&Timelock, EngineError> {
        self.world.timelock(address)
    }

    pub fn governor(&self, address: &Principal) -> Result<&Governor, EngineError> {
        self.world.governor(address)
    }

    pub fn balance(&self, holder: &Principal) -> u128 {
        self.world.balance(holder)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Latest tick applied by a successful operation.
    pub fn last_tick(&self) -> Tick {
        self.world.last_tick()
    }

    /// Every committed event, in order.
    pub fn events(&self) -> &[EventRecord] {
        &self.log
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&EventRecord) + Send + Sync>) {
        self.bus.subscribe(listener);
    }
}
