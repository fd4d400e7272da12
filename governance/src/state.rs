//! Proposal lifecycle state, derived on read.

use crate::proposal::Proposal;
use gavel_types::{Tick, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Created, voting has not opened yet.
    Pending,
    /// Voting is open.
    Active,
    /// Canceled by the guardian (or because the proposer lost their weight). Terminal.
    Canceled,
    /// Voting closed without a strict majority or without quorum. Terminal.
    Defeated,
    /// Voting passed; not yet queued.
    Succeeded,
    /// Actions are in the timelock, waiting for or inside their execution window.
    Queued,
    /// The grace window passed without execution. Terminal.
    Expired,
    /// All actions were performed. Terminal.
    Executed,
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Expired => "expired",
            Self::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// Derive the state of `proposal` at `now`.
///
/// A pure function of the proposal's flags, ticks, tally and eta together
/// with `quorum` and the timelock's `grace_period`. The checks run in a fixed
/// order and the first match wins.
pub fn derive_state(
    proposal: &Proposal,
    now: Tick,
    quorum: Weight,
    grace_period: u64,
) -> ProposalState {
    if proposal.canceled {
        return ProposalState::Canceled;
    }
    if now <= proposal.start {
        return ProposalState::Pending;
    }
    if now <= proposal.end {
        return ProposalState::Active;
    }
    if !proposal.tally.passed(quorum) {
        return ProposalState::Defeated;
    }
    let Some(eta) = proposal.eta else {
        return ProposalState::Succeeded;
    };
    if proposal.executed {
        return ProposalState::Executed;
    }
    if eta.has_expired(grace_period, now) {
        return ProposalState::Expired;
    }
    ProposalState::Queued
}
