//! Two-phase transfer of administrative control.
//!
//! Phase one names a candidate (`pending_admin`) without touching `admin`.
//! Phase two is performed by the candidate itself, which then becomes
//! `admin`. A single action therefore cannot seize control: the candidate
//! has to act independently to accept.
//!
//! There is no timeout. A pending transfer that is never accepted stays
//! pending until it is finalized or replaced by a fresh initiate.

use crate::TimelockError;
use gavel_types::Principal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Current and pending administrator of a protected resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminState {
    admin: Principal,
    pending_admin: Option<Principal>,
}

impl AdminState {
    pub fn new(admin: Principal) -> Self {
        Self {
            admin,
            pending_admin: None,
        }
    }

    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    pub fn pending_admin(&self) -> Option<&Principal> {
        self.pending_admin.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending_admin.is_some()
    }

    /// Name `candidate` as the pending admin.
    ///
    /// `authority` is the only principal allowed to initiate; for a timelock
    /// that is the timelock itself, reachable only through an action its
    /// current admin queued. Returns the candidate this call replaced, if any.
    pub fn initiate_transfer(
        &mut self,
        caller: &Principal,
        authority: &Principal,
        candidate: Principal,
    ) -> Result<Option<Principal>, TimelockError> {
        if caller != authority {
            return Err(TimelockError::Unauthorized {
                caller: caller.clone(),
                required: authority.clone(),
            });
        }
        info!(admin = %self.admin, pending = %candidate, "admin transfer initiated");
        Ok(self.pending_admin.replace(candidate))
    }

    /// Accept a pending transfer. Only the pending admin may call this.
    ///
    /// Returns the admin that was replaced.
    pub fn finalize_transfer(&mut self, caller: &Principal) -> Result<Principal, TimelockError> {
        let pending = self
            .pending_admin
            .as_ref()
            .ok_or(TimelockError::NoPendingTransfer)?;
        if caller != pending {
            return Err(TimelockError::Unauthorized {
                caller: caller.clone(),
                required: pending.clone(),
            });
        }
        let new_admin = self
            .pending_admin
            .take()
            .ok_or(TimelockError::NoPendingTransfer)?;
        let previous = std::mem::replace(&mut self.admin, new_admin);
        info!(previous = %previous, admin = %self.admin, "admin transfer finalized");
        Ok(previous)
    }
}
