//! Voting weight quantities.
//!
//! Weights are fixed-point integers (u128) sourced from the external ledger's
//! historical snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A principal's voting power, or an aggregate of several.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Weight(u128);

impl Weight {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Weight {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}
