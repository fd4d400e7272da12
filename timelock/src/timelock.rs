//! The timelock: the resource whose administrative control is protected.
//!
//! Only the current admin may queue, cancel or execute transactions.
//! Reconfiguration of the timelock itself (`setPendingAdmin`, `setDelay`)
//! is only reachable through an action the admin queued, i.e. the timelock
//! calling its own entry points after the delay has elapsed.

use crate::admin::AdminState;
use crate::params::{check_delay, TimelockParams};
use crate::queue::QueuedSet;
use crate::TimelockError;
use gavel_crypto::hash_action;
use gavel_types::{Action, ActionHash, Principal, Tick};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Entry points a timelock exposes to queued actions.
pub mod selectors {
    /// Payload: bincode-encoded `Principal` of the candidate admin.
    pub const SET_PENDING_ADMIN: &str = "setPendingAdmin(address)";
    /// No payload. The caller must be the pending admin.
    pub const ACCEPT_ADMIN: &str = "acceptAdmin()";
    /// Payload: bincode-encoded `u64` delay in ticks.
    pub const SET_DELAY: &str = "setDelay(uint256)";
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Timelock {
    address: Principal,
    admin: AdminState,
    delay: u64,
    grace_period: u64,
    queued: QueuedSet,
}

impl Timelock {
    pub fn new(
        address: Principal,
        admin: Principal,
        params: TimelockParams,
    ) -> Result<Self, TimelockError> {
        params.validate()?;
        Ok(Self {
            address,
            admin: AdminState::new(admin),
            delay: params.delay,
            grace_period: params.grace_period,
            queued: QueuedSet::new(),
        })
    }

    pub fn address(&self) -> &Principal {
        &self.address
    }

    pub fn admin(&self) -> &Principal {
        self.admin.admin()
    }

    pub fn pending_admin(&self) -> Option<&Principal> {
        self.admin.pending_admin()
    }

    pub fn delay(&self) -> u64 {
        self.delay
    }

    pub fn grace_period(&self) -> u64 {
        self.grace_period
    }

    pub fn is_queued(&self, hash: &ActionHash) -> bool {
        self.queued.contains(hash)
    }

    pub fn queued_count(&self) -> usize {
        self.queued.len()
    }

    fn ensure_admin(&self, caller: &Principal) -> Result<(), TimelockError> {
        if caller != self.admin.admin() {
            return Err(TimelockError::Unauthorized {
                caller: caller.clone(),
                required: self.admin.admin().clone(),
            });
        }
        Ok(())
    }

    fn ensure_self(&self, caller: &Principal) -> Result<(), TimelockError> {
        if caller != &self.address {
            return Err(TimelockError::Unauthorized {
                caller: caller.clone(),
                required: self.address.clone(),
            });
        }
        Ok(())
    }

    /// Schedule `action` for execution at `eta`.
    pub fn queue_transaction(
        &mut self,
        caller: &Principal,
        action: &Action,
        eta: Tick,
        now: Tick,
    ) -> Result<ActionHash, TimelockError> {
        self.ensure_admin(caller)?;
        let earliest = now.after(self.delay);
        if eta < earliest {
            return Err(TimelockError::EtaBelowDelay { eta, earliest });
        }
        let hash = hash_action(action, eta);
        self.queued.insert(hash)?;
        debug!(timelock = %self.address, %hash, %eta, target = %action.target, "transaction queued");
        Ok(hash)
    }

    /// Drop a scheduled transaction. Returns the hash if it was still queued.
    pub fn cancel_transaction(
        &mut self,
        caller: &Principal,
        action: &Action,
        eta: Tick,
    ) -> Result<Option<ActionHash>, TimelockError> {
        self.ensure_admin(caller)?;
        let hash = hash_action(action, eta);
        if !self.queued.contains(&hash) {
            return Ok(None);
        }
        self.queued.remove(&hash)?;
        debug!(timelock = %self.address, %hash, "transaction canceled");
        Ok(Some(hash))
    }

    /// Consume a scheduled transaction whose time lock has elapsed.
    ///
    /// The caller performs the action's effect after this returns; if that
    /// effect fails the caller is responsible for restoring the hash.
    pub fn execute_transaction(
        &mut self,
        caller: &Principal,
        action: &Action,
        eta: Tick,
        now: Tick,
    ) -> Result<ActionHash, TimelockError> {
        self.ensure_admin(caller)?;
        let hash = hash_action(action, eta);
        if !self.queued.contains(&hash) {
            return Err(TimelockError::NotQueued(hash));
        }
        if now < eta {
            return Err(TimelockError::NotReady { eta, now });
        }
        let deadline = eta.after(self.grace_period);
        if now >= deadline {
            return Err(TimelockError::Expired { eta, deadline, now });
        }
        self.queued.remove(&hash)?;
        debug!(timelock = %self.address, %hash, "transaction consumed");
        Ok(hash)
    }

    /// Change the delay. Callable only by the timelock itself. Returns the previous delay.
    pub fn set_delay(&mut self, caller: &Principal, delay: u64) -> Result<u64, TimelockError> {
        self.ensure_self(caller)?;
        check_delay(delay)?;
        let previous = std::mem::replace(&mut self.delay, delay);
        info!(timelock = %self.address, previous, delay, "timelock delay changed");
        Ok(previous)
    }

    /// First phase of the admin handoff. Callable only by the timelock itself.
    pub fn initiate_transfer(
        &mut self,
        caller: &Principal,
        candidate: Principal,
    ) -> Result<Option<Principal>, TimelockError> {
        self.admin
            .initiate_transfer(caller, &self.address, candidate)
    }

    /// Second phase of the admin handoff. Callable only by the pending admin.
    pub fn finalize_transfer(&mut self, caller: &Principal) -> Result<Principal, TimelockError> {
        self.admin.finalize_transfer(caller)
    }

    /// Serialize the full timelock state for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, TimelockError> {
        bincode::serialize(self).map_err(|e| TimelockError::Snapshot(e.to_string()))
    }

    /// Restore a timelock from bytes produced by [`Timelock::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, TimelockError> {
        bincode::deserialize(data).map_err(|e| TimelockError::Snapshot(e.to_string()))
    }
}
