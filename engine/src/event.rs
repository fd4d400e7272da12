//! Events recorded for every committed transition, and the bus that fans
//! them out to subscribers.

use gavel_governance::{ProposalId, ProposalState, Support};
use gavel_types::{ActionHash, Principal, Tick, Weight};
use serde::Serialize;

/// A state transition observed by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    TimelockDeployed {
        timelock: Principal,
        admin: Principal,
        delay: u64,
    },
    GovernorDeployed {
        governor: Principal,
        timelock: Principal,
        guardian: Option<Principal>,
    },
    /// A proposal was submitted.
    ProposalCreated {
        governor: Principal,
        id: ProposalId,
        proposer: Principal,
        start: Tick,
        end: Tick,
        state: ProposalState,
    },
    VoteCast {
        governor: Principal,
        id: ProposalId,
        voter: Principal,
        support: Support,
        weight: Weight,
        state: ProposalState,
    },
    ProposalQueued {
        governor: Principal,
        id: ProposalId,
        eta: Tick,
        state: ProposalState,
    },
    ProposalExecuted {
        governor: Principal,
        id: ProposalId,
        state: ProposalState,
    },
    ProposalCanceled {
        governor: Principal,
        id: ProposalId,
        state: ProposalState,
    },
    /// One action of a proposal entered the timelock queue.
    TransactionQueued {
        timelock: Principal,
        id: ProposalId,
        hash: ActionHash,
        target: Principal,
        eta: Tick,
    },
    TransactionExecuted {
        timelock: Principal,
        id: ProposalId,
        hash: ActionHash,
        target: Principal,
    },
    TransactionCanceled {
        timelock: Principal,
        id: ProposalId,
        hash: ActionHash,
    },
    /// First phase of an admin handoff.
    NewPendingAdmin {
        timelock: Principal,
        pending_admin: Principal,
        proposal: Option<ProposalId>,
    },
    /// Second phase of an admin handoff.
    NewAdmin {
        timelock: Principal,
        admin: Principal,
        proposal: Option<ProposalId>,
    },
    NewDelay {
        timelock: Principal,
        delay: u64,
        proposal: Option<ProposalId>,
    },
    GuardianAbdicated {
        governor: Principal,
    },
}

/// A committed event with its position in the global log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Zero-based, gap-free sequence number.
    pub seq: u64,
    /// Tick of the operation that produced the event.
    pub tick: Tick,
    #[serde(flatten)]
    pub event: GovernanceEvent,
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline after an operation commits; keep handlers
/// fast to avoid stalling the engine.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&EventRecord) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&EventRecord) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, record: &EventRecord) {
        for listener in &self.listeners {
            listener(record);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
