//! A governor: one governance instance bound to one timelock.
//!
//! The governor owns its proposal registry and decides who may propose,
//! vote and cancel. It never touches the timelock directly; the engine
//! drives queueing and execution and reports the outcome back through the
//! `record_*` methods.

use crate::oracle::VotingWeightOracle;
use crate::params::GovernorParams;
use crate::proposal::{Proposal, ProposalId, Receipt, Support};
use crate::registry::ProposalRegistry;
use crate::state::{derive_state, ProposalState};
use crate::GovernanceError;
use gavel_types::{Action, Principal, Tick};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Entry points a governor exposes to queued actions.
pub mod selectors {
    /// Accept administrative control of the bound timelock.
    ///
    /// Payload: bincode-encoded `Option<Principal>` naming the predecessor
    /// governor whose proposal numbering should be continued.
    pub const ACCEPT_ADMIN: &str = "__acceptAdmin(address)";
}

/// The timelock a governor queues into, with the grace window that bounds
/// the Queued state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockBinding {
    pub address: Principal,
    pub grace_period: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Governor {
    address: Principal,
    timelock: TimelockBinding,
    guardian: Option<Principal>,
    params: GovernorParams,
    registry: ProposalRegistry,
}

impl Governor {
    pub fn new(
        address: Principal,
        timelock: TimelockBinding,
        guardian: Option<Principal>,
        params: GovernorParams,
    ) -> Result<Self, GovernanceError> {
        params.validate()?;
        Ok(Self {
            address,
            timelock,
            guardian,
            params,
            registry: ProposalRegistry::new(),
        })
    }

    pub fn address(&self) -> &Principal {
        &self.address
    }

    pub fn timelock(&self) -> &TimelockBinding {
        &self.timelock
    }

    pub fn guardian(&self) -> Option<&Principal> {
        self.guardian.as_ref()
    }

    pub fn params(&self) -> &GovernorParams {
        &self.params
    }

    pub fn proposal_count(&self) -> u64 {
        self.registry.proposal_count()
    }

    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.registry.get(id)
    }

    pub fn actions(&self, id: ProposalId) -> Result<&[Action], GovernanceError> {
        Ok(&self.registry.get(id)?.actions)
    }

    pub fn receipt(&self, id: ProposalId, voter: &Principal) -> Option<&Receipt> {
        self.registry.receipt(id, voter)
    }

    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.registry.iter()
    }

    /// Lifecycle state of proposal `id` at `now`.
    pub fn state(&self, id: ProposalId, now: Tick) -> Result<ProposalState, GovernanceError> {
        let proposal = self.registry.get(id)?;
        Ok(derive_state(
            proposal,
            now,
            self.params.quorum_votes,
            self.timelock.grace_period,
        ))
    }

    /// Fail with `InvalidState` unless proposal `id` is in `expected` at `now`.
    pub fn require_state(
        &self,
        id: ProposalId,
        expected: ProposalState,
        now: Tick,
        operation: &'static str,
    ) -> Result<(), GovernanceError> {
        let state = self.state(id, now)?;
        if state != expected {
            return Err(GovernanceError::InvalidState {
                id,
                state,
                operation,
            });
        }
        Ok(())
    }

    /// Submit a proposal on behalf of `proposer`.
    pub fn propose<O: VotingWeightOracle + ?Sized>(
        &mut self,
        oracle: &O,
        proposer: &Principal,
        actions: Vec<Action>,
        description: impl Into<String>,
        now: Tick,
    ) -> Result<ProposalId, GovernanceError> {
        let have = oracle.weight(proposer, now);
        if have < self.params.proposal_threshold {
            return Err(GovernanceError::BelowThreshold {
                have,
                need: self.params.proposal_threshold,
            });
        }
        if actions.is_empty() {
            return Err(GovernanceError::ArrayLengthMismatch {
                targets: 0,
                values: 0,
                selectors: 0,
                payloads: 0,
            });
        }
        if actions.len() > self.params.proposal_max_operations {
            return Err(GovernanceError::TooManyActions {
                count: actions.len(),
                max: self.params.proposal_max_operations,
            });
        }

        let action_count = actions.len();
        let id = self.registry.create(
            proposer.clone(),
            actions,
            description.into(),
            now,
            self.params.voting_delay,
            self.params.voting_period,
        );
        info!(governor = %self.address, %id, %proposer, action_count, "proposal created");
        Ok(id)
    }

    /// Register `voter`'s vote, weighted by their balance at the proposal's start tick.
    pub fn cast_vote<O: VotingWeightOracle + ?Sized>(
        &mut self,
        oracle: &O,
        id: ProposalId,
        voter: &Principal,
        support: Support,
        now: Tick,
    ) -> Result<Receipt, GovernanceError> {
        self.require_state(id, ProposalState::Active, now, "vote")?;
        if self.registry.receipt(id, voter).is_some() {
            return Err(GovernanceError::AlreadyVoted {
                id,
                voter: voter.clone(),
            });
        }
        let start = self.registry.get(id)?.start;
        let weight = oracle.weight(voter, start);
        let receipt = self.registry.record_vote(id, voter, support, weight)?;
        debug!(governor = %self.address, %id, %voter, ?support, %weight, "vote cast");
        Ok(receipt)
    }

    /// Check that `caller` may cancel proposal `id` at `now`.
    ///
    /// The guardian may always cancel. Anyone may cancel once the proposer's
    /// weight has fallen below the proposal threshold.
    pub fn authorize_cancel<O: VotingWeightOracle + ?Sized>(
        &self,
        oracle: &O,
        caller: &Principal,
        id: ProposalId,
        now: Tick,
    ) -> Result<(), GovernanceError> {
        let state = self.state(id, now)?;
        if matches!(state, ProposalState::Executed | ProposalState::Canceled) {
            return Err(GovernanceError::InvalidState {
                id,
                state,
                operation: "cancel",
            });
        }
        if self.guardian.as_ref() == Some(caller) {
            return Ok(());
        }
        let proposer = &self.registry.get(id)?.proposer;
        if oracle.weight(proposer, now) < self.params.proposal_threshold {
            return Ok(());
        }
        Err(GovernanceError::Unauthorized {
            caller: caller.clone(),
            operation: "cancel proposal",
        })
    }

    /// Check that `caller` may invoke the accept-admin entry point: the bound
    /// timelock (through a queued action) or the guardian.
    pub fn authorize_accept(&self, caller: &Principal) -> Result<(), GovernanceError> {
        if caller == &self.timelock.address || self.guardian.as_ref() == Some(caller) {
            return Ok(());
        }
        Err(GovernanceError::Unauthorized {
            caller: caller.clone(),
            operation: "accept timelock admin",
        })
    }

    /// Continue proposal numbering after a predecessor's last id.
    pub fn continue_numbering(&mut self, predecessor_count: u64) {
        self.registry.continue_after(predecessor_count);
    }

    /// Give up the guardian role permanently.
    pub fn abdicate(&mut self, caller: &Principal) -> Result<(), GovernanceError> {
        if self.guardian.as_ref() != Some(caller) {
            return Err(GovernanceError::Unauthorized {
                caller: caller.clone(),
                operation: "abdicate",
            });
        }
        self.guardian = None;
        info!(governor = %self.address, "guardian abdicated");
        Ok(())
    }

    pub fn record_queued(&mut self, id: ProposalId, eta: Tick) -> Result<(), GovernanceError> {
        self.registry.set_eta(id, eta)
    }

    pub fn record_executed(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        self.registry.set_executed(id)
    }

    pub fn record_canceled(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        self.registry.set_canceled(id)
    }

    /// Serialize the full governor state for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Restore a governor from bytes produced by [`Governor::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }
}
