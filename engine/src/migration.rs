//! Handing a timelock over from one governor to its successor.
//!
//! The handoff is an ordinary proposal on the predecessor with two actions:
//! the timelock names the successor as pending admin, then the successor
//! accepts. Both run inside one atomic execute, so a successful execute
//! never leaves the handoff half done.

use crate::dispatch::{governor_accept_call, set_pending_admin_call};
use crate::{Engine, EngineError};
use gavel_governance::{ProposalId, VotingWeightOracle};
use gavel_types::{Action, Principal, Tick};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationPlan {
    /// The protected resource changing hands.
    pub timelock: Principal,
    /// Governor taking over.
    pub successor: Principal,
    /// Governor currently in control; the proposal is submitted through it.
    pub predecessor: Principal,
}

impl MigrationPlan {
    pub fn new(timelock: Principal, successor: Principal, predecessor: Principal) -> Self {
        Self {
            timelock,
            successor,
            predecessor,
        }
    }

    /// The two actions of the handoff, in execution order.
    pub fn actions(&self) -> Vec<Action> {
        vec![
            set_pending_admin_call(&self.timelock, &self.successor),
            governor_accept_call(&self.successor, Some(&self.predecessor)),
        ]
    }

    pub fn description(&self) -> String {
        format!(
            "Transfer admin of {} from {} to {}",
            self.timelock, self.predecessor, self.successor
        )
    }
}

impl<O: VotingWeightOracle> Engine<O> {
    /// Submit `plan` as a proposal on its predecessor governor.
    pub fn propose_migration(
        &mut self,
        plan: &MigrationPlan,
        proposer: &Principal,
        now: Tick,
    ) -> Result<ProposalId, EngineError> {
        self.propose(
            &plan.predecessor,
            proposer,
            plan.actions(),
            &plan.description(),
            now,
        )
    }
}
