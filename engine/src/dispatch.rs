//! The invoke effect: what happens when a timelock performs a queued action.
//!
//! An action first moves its `value` from the timelock to the target. A
//! non-empty selector then names an entry point on a deployed instance;
//! anything the engine does not know how to call fails with
//! [`EngineError::InvokeFailed`].

use crate::event::GovernanceEvent;
use crate::world::World;
use crate::EngineError;
use gavel_governance::{selectors as governor_selectors, ProposalId};
use gavel_timelock::selectors as timelock_selectors;
use gavel_types::{Action, Principal};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Perform `action` with `caller` (a timelock) as the message sender.
pub(crate) fn invoke(
    world: &mut World,
    caller: &Principal,
    action: &Action,
    proposal: Option<ProposalId>,
) -> Result<(), EngineError> {
    world.transfer(caller, &action.target, action.value)?;
    if action.is_transfer() {
        debug!(from = %caller, to = %action.target, value = action.value, "value transferred");
        return Ok(());
    }

    if world.has_timelock(&action.target) {
        invoke_timelock(world, caller, action, proposal)
    } else if world.has_governor(&action.target) {
        invoke_governor(world, caller, action, proposal)
    } else {
        Err(invoke_failed(action, "target exposes no entry points"))
    }
}

fn invoke_timelock(
    world: &mut World,
    caller: &Principal,
    action: &Action,
    proposal: Option<ProposalId>,
) -> Result<(), EngineError> {
    let address = action.target.clone();
    match action.selector.as_str() {
        timelock_selectors::SET_PENDING_ADMIN => {
            let candidate: Principal = decode(action)?;
            let timelock = world.timelock_mut(&address)?;
            let replaced = timelock.initiate_transfer(caller, candidate.clone())?;
            debug!(timelock = %address, pending_admin = %candidate, ?replaced, "setPendingAdmin dispatched");
            world.emit(GovernanceEvent::NewPendingAdmin {
                timelock: address,
                pending_admin: candidate,
                proposal,
            });
        }
        timelock_selectors::ACCEPT_ADMIN => {
            finalize(world, &address, caller, proposal)?;
        }
        timelock_selectors::SET_DELAY => {
            let delay: u64 = decode(action)?;
            world.timelock_mut(&address)?.set_delay(caller, delay)?;
            world.emit(GovernanceEvent::NewDelay {
                timelock: address,
                delay,
                proposal,
            });
        }
        _ => return Err(invoke_failed(action, "unknown timelock selector")),
    }
    Ok(())
}

fn invoke_governor(
    world: &mut World,
    caller: &Principal,
    action: &Action,
    proposal: Option<ProposalId>,
) -> Result<(), EngineError> {
    match action.selector.as_str() {
        governor_selectors::ACCEPT_ADMIN => {
            let predecessor: Option<Principal> = decode(action)?;
            accept_admin(world, &action.target, caller, predecessor.as_ref(), proposal)
        }
        _ => Err(invoke_failed(action, "unknown governor selector")),
    }
}

/// The successor governor's accept entry point.
///
/// `caller` must be the governor's own timelock or its guardian. The governor
/// then finalizes the pending handoff on its timelock acting as itself, and
/// continues numbering after `predecessor`'s last proposal.
pub(crate) fn accept_admin(
    world: &mut World,
    governor: &Principal,
    caller: &Principal,
    predecessor: Option<&Principal>,
    proposal: Option<ProposalId>,
) -> Result<(), EngineError> {
    let gov = world.governor(governor)?;
    gov.authorize_accept(caller)?;
    let timelock = gov.timelock().address.clone();

    finalize(world, &timelock, governor, proposal)?;

    if let Some(predecessor) = predecessor {
        let count = world.governor(predecessor)?.proposal_count();
        world.governor_mut(governor)?.continue_numbering(count);
        debug!(%governor, %predecessor, count, "proposal numbering continued");
    }
    Ok(())
}

fn finalize(
    world: &mut World,
    timelock: &Principal,
    caller: &Principal,
    proposal: Option<ProposalId>,
) -> Result<(), EngineError> {
    let previous = world.timelock_mut(timelock)?.finalize_transfer(caller)?;
    debug!(%timelock, %previous, admin = %caller, "acceptAdmin dispatched");
    world.emit(GovernanceEvent::NewAdmin {
        timelock: timelock.clone(),
        admin: caller.clone(),
        proposal,
    });
    Ok(())
}

fn decode<T: DeserializeOwned>(action: &Action) -> Result<T, EngineError> {
    bincode::deserialize(&action.payload)
        .map_err(|e| invoke_failed(action, &format!("malformed payload: {e}")))
}

fn invoke_failed(action: &Action, reason: &str) -> EngineError {
    EngineError::InvokeFailed {
        target: action.target.clone(),
        selector: action.selector.clone(),
        reason: reason.to_string(),
    }
}

fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    bincode::serialize(value).expect("call arguments are always serializable")
}

/// `setPendingAdmin(candidate)` on `timelock`.
pub fn set_pending_admin_call(timelock: &Principal, candidate: &Principal) -> Action {
    Action::new(
        timelock.clone(),
        0,
        timelock_selectors::SET_PENDING_ADMIN,
        encode(candidate),
    )
}

/// `setDelay(delay)` on `timelock`.
pub fn set_delay_call(timelock: &Principal, delay: u64) -> Action {
    Action::new(
        timelock.clone(),
        0,
        timelock_selectors::SET_DELAY,
        encode(&delay),
    )
}

/// `acceptAdmin()` on `timelock`, for a pending admin that calls it directly.
pub fn accept_admin_call(timelock: &Principal) -> Action {
    Action::new(timelock.clone(), 0, timelock_selectors::ACCEPT_ADMIN, Vec::new())
}

/// `__acceptAdmin(predecessor)` on the successor `governor`.
pub fn governor_accept_call(governor: &Principal, predecessor: Option<&Principal>) -> Action {
    Action::new(
        governor.clone(),
        0,
        governor_selectors::ACCEPT_ADMIN,
        encode(&predecessor.cloned()),
    )
}
