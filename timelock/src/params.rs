//! Timelock parameters and their hard bounds.
//!
//! All durations are in ticks. With one tick per second the bounds match the
//! classic timelock controller: a delay of two to thirty days and a fourteen
//! day grace window.

use crate::TimelockError;
use serde::{Deserialize, Serialize};

const DAY: u64 = 24 * 60 * 60;

/// Shortest delay a timelock accepts.
pub const MINIMUM_DELAY: u64 = 2 * DAY;

/// Longest delay a timelock accepts.
pub const MAXIMUM_DELAY: u64 = 30 * DAY;

/// Default window after `eta` during which a queued transaction stays executable.
pub const GRACE_PERIOD: u64 = 14 * DAY;

/// Deployment parameters of a timelock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockParams {
    /// Mandatory wait between queueing and the earliest execution.
    pub delay: u64,
    /// Window after `eta` during which execution is still allowed.
    pub grace_period: u64,
}

impl TimelockParams {
    pub fn validate(&self) -> Result<(), TimelockError> {
        check_delay(self.delay)?;
        if self.grace_period == 0 {
            return Err(TimelockError::InvalidParams(
                "grace_period must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TimelockParams {
    fn default() -> Self {
        Self {
            delay: MINIMUM_DELAY,
            grace_period: GRACE_PERIOD,
        }
    }
}

pub(crate) fn check_delay(delay: u64) -> Result<(), TimelockError> {
    if !(MINIMUM_DELAY..=MAXIMUM_DELAY).contains(&delay) {
        return Err(TimelockError::DelayOutOfRange {
            delay,
            min: MINIMUM_DELAY,
            max: MAXIMUM_DELAY,
        });
    }
    Ok(())
}
