//! Logical clock ticks.
//!
//! Every delay and window check in the engine is expressed in ticks. The
//! environment advances the clock monotonically; the engine never reads a
//! wall clock itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the engine's monotonic logical clock.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tick(u64);

impl Tick {
    /// The origin of the clock.
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// This tick shifted forward by `ticks`, saturating at the end of the clock.
    pub fn after(&self, ticks: u64) -> Self {
        Self(self.0.saturating_add(ticks))
    }

    /// Whether `now` has reached this tick + `window`.
    pub fn has_expired(&self, window: u64, now: Tick) -> bool {
        now >= self.after(window)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for Tick {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
