use gavel_governance::GovernanceError;
use gavel_timelock::TimelockError;
use gavel_types::{Principal, Tick};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("timelock error: {0}")]
    Timelock(#[from] TimelockError),

    #[error("invoking {selector:?} on {target} failed: {reason}")]
    InvokeFailed {
        target: Principal,
        selector: String,
        reason: String,
    },

    #[error("no instance deployed at {0}")]
    UnknownInstance(Principal),

    #[error("invalid principal {0:?}: must be non-empty and free of whitespace")]
    InvalidPrincipal(Principal),

    #[error("an instance is already deployed at {0}")]
    AlreadyDeployed(Principal),

    #[error("clock went backwards: {now} is before last applied tick {last}")]
    ClockWentBackwards { now: Tick, last: Tick },

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Coarse classification of an [`EngineError`], stable across the nested
/// error types so callers can match on the failed precondition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Authorization,
    InvalidState,
    AlreadyVoted,
    BelowThreshold,
    ArrayLengthMismatch,
    DuplicateQueue,
    TransactionNotQueued,
    TimelockNotReady,
    TimelockExpired,
    ProposalNotFound,
    TooManyActions,
    EtaBelowDelay,
    DelayOutOfRange,
    InvokeFailed,
    UnknownInstance,
    AlreadyDeployed,
    ClockWentBackwards,
    InvalidArgument,
    Config,
    Storage,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Governance(e) => match e {
                GovernanceError::ProposalNotFound(_) => ErrorKind::ProposalNotFound,
                GovernanceError::Unauthorized { .. } => ErrorKind::Authorization,
                GovernanceError::InvalidState { .. } => ErrorKind::InvalidState,
                GovernanceError::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
                GovernanceError::BelowThreshold { .. } => ErrorKind::BelowThreshold,
                GovernanceError::ArrayLengthMismatch { .. } => ErrorKind::ArrayLengthMismatch,
                GovernanceError::TooManyActions { .. } => ErrorKind::TooManyActions,
                GovernanceError::InvalidSupport(_) | GovernanceError::InvalidParams(_) => {
                    ErrorKind::InvalidArgument
                }
                GovernanceError::Snapshot(_) => ErrorKind::Storage,
            },
            Self::Timelock(e) => match e {
                TimelockError::Unauthorized { .. } => ErrorKind::Authorization,
                TimelockError::DuplicateQueue(_) => ErrorKind::DuplicateQueue,
                TimelockError::NotQueued(_) => ErrorKind::TransactionNotQueued,
                TimelockError::NotReady { .. } => ErrorKind::TimelockNotReady,
                TimelockError::Expired { .. } => ErrorKind::TimelockExpired,
                TimelockError::EtaBelowDelay { .. } => ErrorKind::EtaBelowDelay,
                TimelockError::DelayOutOfRange { .. } => ErrorKind::DelayOutOfRange,
                TimelockError::NoPendingTransfer => ErrorKind::InvalidState,
                TimelockError::InvalidParams(_) => ErrorKind::InvalidArgument,
                TimelockError::Snapshot(_) => ErrorKind::Storage,
            },
            Self::InvokeFailed { .. } => ErrorKind::InvokeFailed,
            Self::UnknownInstance(_) => ErrorKind::UnknownInstance,
            Self::AlreadyDeployed(_) => ErrorKind::AlreadyDeployed,
            Self::InvalidPrincipal(_) => ErrorKind::InvalidArgument,
            Self::ClockWentBackwards { .. } => ErrorKind::ClockWentBackwards,
            Self::Config(_) => ErrorKind::Config,
            Self::Snapshot(_) => ErrorKind::Storage,
        }
    }
}
