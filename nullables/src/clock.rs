//! Nullable clock: deterministic ticks for testing.

use gavel_types::Tick;
use std::cell::Cell;

/// A deterministic logical clock for testing.
///
/// Time only advances when you tell it to, and never moves backwards.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial: u64) -> Self {
        Self {
            current: Cell::new(initial),
        }
    }

    /// Get the current tick.
    pub fn now(&self) -> Tick {
        Tick::new(self.current.get())
    }

    /// Advance the clock by a number of ticks and return the new tick.
    pub fn advance(&self, ticks: u64) -> Tick {
        self.current.set(self.current.get().saturating_add(ticks));
        self.now()
    }

    /// Jump forward to `tick`. Earlier ticks are ignored.
    pub fn advance_to(&self, tick: Tick) -> Tick {
        if tick.value() > self.current.get() {
            self.current.set(tick.value());
        }
        self.now()
    }
}
