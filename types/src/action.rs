//! Actions: the unit of privileged work a proposal asks the timelock to perform.

use crate::Principal;
use serde::{Deserialize, Serialize};

/// A single call the timelock performs when a proposal executes.
///
/// `selector` names the entry point on `target` (a signature such as
/// `setPendingAdmin(address)`); an empty selector is a plain value transfer.
/// `payload` carries the entry point's arguments and is opaque to everything
/// except the target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub target: Principal,
    pub value: u128,
    pub selector: String,
    pub payload: Vec<u8>,
}

impl Action {
    pub fn new(
        target: Principal,
        value: u128,
        selector: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            target,
            value,
            selector: selector.into(),
            payload,
        }
    }

    /// A plain value transfer with no entry point.
    pub fn transfer(target: Principal, value: u128) -> Self {
        Self::new(target, value, "", Vec::new())
    }

    pub fn is_transfer(&self) -> bool {
        self.selector.is_empty()
    }
}
