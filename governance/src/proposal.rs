//! Governance proposals, vote receipts and their building blocks.

use crate::GovernanceError;
use gavel_types::{Action, Principal, Tick, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a proposal: monotonically increasing, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(u64);

impl ProposalId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Support {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl TryFrom<u8> for Support {
    type Error = GovernanceError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            other => Err(GovernanceError::InvalidSupport(other)),
        }
    }
}

/// Aggregate weight per vote direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub for_weight: Weight,
    pub against_weight: Weight,
    pub abstain_weight: Weight,
}

impl Tally {
    pub(crate) fn add(&mut self, support: Support, weight: Weight) {
        let bucket = match support {
            Support::For => &mut self.for_weight,
            Support::Against => &mut self.against_weight,
            Support::Abstain => &mut self.abstain_weight,
        };
        *bucket = bucket.saturating_add(weight);
    }

    /// Whether the vote passed: a strict "for" majority that also meets quorum.
    pub fn passed(&self, quorum: Weight) -> bool {
        self.for_weight > self.against_weight && self.for_weight >= quorum
    }
}

/// A governance proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Principal,
    /// Non-empty, executed in order as one unit.
    pub actions: Vec<Action>,
    pub description: String,
    pub created_at: Tick,
    /// Voting opens after this tick; weights are snapshotted here.
    pub start: Tick,
    /// Voting closes after this tick.
    pub end: Tick,
    pub tally: Tally,
    /// Earliest execution tick, set when queued.
    pub eta: Option<Tick>,
    pub canceled: bool,
    pub executed: bool,
}

/// Record of a single principal's vote on a single proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub has_voted: bool,
    pub support: Support,
    pub weight: Weight,
}

/// Build action records from parallel field lists.
///
/// All four lists must have the same, non-zero length.
pub fn actions_from_parts(
    targets: Vec<Principal>,
    values: Vec<u128>,
    selectors: Vec<String>,
    payloads: Vec<Vec<u8>>,
) -> Result<Vec<Action>, GovernanceError> {
    let n = targets.len();
    if n == 0 || values.len() != n || selectors.len() != n || payloads.len() != n {
        return Err(GovernanceError::ArrayLengthMismatch {
            targets: n,
            values: values.len(),
            selectors: selectors.len(),
            payloads: payloads.len(),
        });
    }
    Ok(targets
        .into_iter()
        .zip(values)
        .zip(selectors)
        .zip(payloads)
        .map(|(((target, value), selector), payload)| {
            Action::new(target, value, selector, payload)
        })
        .collect())
}
