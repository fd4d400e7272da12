//! Governor parameters, fixed per deployed instance.

use crate::GovernanceError;
use gavel_types::Weight;
use serde::{Deserialize, Serialize};

/// Deployment parameters of a governor. All durations are in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorParams {
    /// Ticks between proposal creation and the voting snapshot.
    pub voting_delay: u64,
    /// Ticks during which votes are accepted.
    pub voting_period: u64,
    /// Weight a proposer needs at proposal time.
    pub proposal_threshold: Weight,
    /// Minimum "for" weight for a proposal to pass.
    pub quorum_votes: Weight,
    /// Maximum number of actions in one proposal.
    pub proposal_max_operations: usize,
}

impl GovernorParams {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.voting_period == 0 {
            return Err(GovernanceError::InvalidParams(
                "voting_period must be positive".to_string(),
            ));
        }
        if self.proposal_max_operations == 0 {
            return Err(GovernanceError::InvalidParams(
                "proposal_max_operations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GovernorParams {
    fn default() -> Self {
        Self {
            voting_delay: 1,
            voting_period: 17_280,
            proposal_threshold: Weight::new(100_000),
            quorum_votes: Weight::new(400_000),
            proposal_max_operations: 10,
        }
    }
}
