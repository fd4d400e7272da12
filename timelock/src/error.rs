use gavel_types::{ActionHash, Principal, Tick};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelockError {
    #[error("{caller} is not authorized, only {required} may call this entry point")]
    Unauthorized { caller: Principal, required: Principal },

    #[error("transaction {0} is already queued")]
    DuplicateQueue(ActionHash),

    #[error("transaction {0} is not queued")]
    NotQueued(ActionHash),

    #[error("transaction has not surpassed its time lock: eta {eta}, now {now}")]
    NotReady { eta: Tick, now: Tick },

    #[error("transaction is stale: eta {eta} + grace expired at {deadline}, now {now}")]
    Expired { eta: Tick, deadline: Tick, now: Tick },

    #[error("eta {eta} does not satisfy the delay, earliest allowed is {earliest}")]
    EtaBelowDelay { eta: Tick, earliest: Tick },

    #[error("delay {delay} outside [{min}, {max}]")]
    DelayOutOfRange { delay: u64, min: u64, max: u64 },

    #[error("no admin transfer is pending")]
    NoPendingTransfer,

    #[error("invalid timelock parameters: {0}")]
    InvalidParams(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
