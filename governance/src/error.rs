use crate::proposal::ProposalId;
use crate::state::ProposalState;
use gavel_types::{Principal, Weight};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("{caller} is not authorized to {operation}")]
    Unauthorized {
        caller: Principal,
        operation: &'static str,
    },

    #[error("proposal {id} is {state}, cannot {operation}")]
    InvalidState {
        id: ProposalId,
        state: ProposalState,
        operation: &'static str,
    },

    #[error("{voter} has already voted on proposal {id}")]
    AlreadyVoted { id: ProposalId, voter: Principal },

    #[error("proposer weight below threshold: {have} < {need}")]
    BelowThreshold { have: Weight, need: Weight },

    #[error(
        "action field lengths must be equal and non-zero: \
         {targets} targets, {values} values, {selectors} selectors, {payloads} payloads"
    )]
    ArrayLengthMismatch {
        targets: usize,
        values: usize,
        selectors: usize,
        payloads: usize,
    },

    #[error("too many actions: {count} > {max}")]
    TooManyActions { count: usize, max: usize },

    #[error("invalid vote support value {0}")]
    InvalidSupport(u8),

    #[error("invalid governor parameters: {0}")]
    InvalidParams(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
