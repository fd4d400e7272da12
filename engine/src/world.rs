//! Every deployed instance plus the value balances actions move around.
//!
//! The engine clones the world before each mutating operation and swaps the
//! clone back in on failure, so nothing here needs its own rollback logic.

use crate::event::GovernanceEvent;
use crate::EngineError;
use gavel_governance::Governor;
use gavel_timelock::Timelock;
use gavel_types::{Principal, Tick};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct World {
    timelocks: BTreeMap<Principal, Timelock>,
    governors: BTreeMap<Principal, Governor>,
    balances: HashMap<Principal, u128>,
    /// Tick of the last committed operation. Saved with the rest so a
    /// restored engine still refuses to step back in time.
    last_tick: Tick,
    /// Events of the operation in flight, drained on commit.
    #[serde(skip)]
    pending: Vec<GovernanceEvent>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_deployed(&self, address: &Principal) -> bool {
        self.timelocks.contains_key(address) || self.governors.contains_key(address)
    }

    pub(crate) fn insert_timelock(&mut self, timelock: Timelock) -> Result<(), EngineError> {
        ensure_valid(timelock.address())?;
        ensure_valid(timelock.admin())?;
        self.ensure_free(timelock.address())?;
        self.timelocks.insert(timelock.address().clone(), timelock);
        Ok(())
    }

    pub(crate) fn insert_governor(&mut self, governor: Governor) -> Result<(), EngineError> {
        ensure_valid(governor.address())?;
        if let Some(guardian) = governor.guardian() {
            ensure_valid(guardian)?;
        }
        self.ensure_free(governor.address())?;
        self.governors.insert(governor.address().clone(), governor);
        Ok(())
    }

    fn ensure_free(&self, address: &Principal) -> Result<(), EngineError> {
        if self.is_deployed(address) {
            return Err(EngineError::AlreadyDeployed(address.clone()));
        }
        Ok(())
    }

    pub fn last_tick(&self) -> Tick {
        self.last_tick
    }

    pub(crate) fn set_last_tick(&mut self, tick: Tick) {
        self.last_tick = tick;
    }

    pub fn timelock(&self, address: &Principal) -> Result<&Timelock, EngineError> {
        self.timelocks
            .get(address)
            .ok_or_else(|| EngineError::UnknownInstance(address.clone()))
    }

    pub(crate) fn timelock_mut(&mut self, address: &Principal) -> Result<&mut Timelock, EngineError> {
        self.timelocks
            .get_mut(address)
            .ok_or_else(|| EngineError::UnknownInstance(address.clone()))
    }

    pub fn governor(&self, address: &Principal) -> Result<&Governor, EngineError> {
        self.governors
            .get(address)
            .ok_or_else(|| EngineError::UnknownInstance(address.clone()))
    }

    pub(crate) fn governor_mut(&mut self, address: &Principal) -> Result<&mut Governor, EngineError> {
        self.governors
            .get_mut(address)
            .ok_or_else(|| EngineError::UnknownInstance(address.clone()))
    }

    pub fn has_timelock(&self, address: &Principal) -> bool {
        self.timelocks.contains_key(address)
    }

    pub fn has_governor(&self, address: &Principal) -> bool {
        self.governors.contains_key(address)
    }

    pub fn balance(&self, holder: &Principal) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub(crate) fn credit(&mut self, holder: &Principal, amount: u128) {
        let balance = self.balances.entry(holder.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Move `amount` from `from` to `to`. Fails without side effects when
    /// `from` cannot cover it.
    pub(crate) fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: u128,
    ) -> Result<(), EngineError> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.balance(from);
        if available < amount {
            return Err(EngineError::InvokeFailed {
                target: to.clone(),
                selector: String::new(),
                reason: format!("{from} holds {available}, cannot send {amount}"),
            });
        }
        self.balances.insert(from.clone(), available - amount);
        self.credit(to, amount);
        Ok(())
    }

    pub(crate) fn emit(&mut self, event: GovernanceEvent) {
        self.pending.push(event);
    }

    pub(crate) fn take_pending(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Serialize every instance, balance and the last tick for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, EngineError> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Restore a world from bytes produced by [`World::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, EngineError> {
        bincode::deserialize(data).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

fn ensure_valid(principal: &Principal) -> Result<(), EngineError> {
    if !principal.is_valid() {
        return Err(EngineError::InvalidPrincipal(principal.clone()));
    }
    Ok(())
}
