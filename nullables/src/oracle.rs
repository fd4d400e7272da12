//! Nullable voting-weight oracle, an in-memory checkpoint ledger.

use gavel_governance::VotingWeightOracle;
use gavel_types::{Principal, Tick, Weight};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Records weight checkpoints per principal and answers historical queries.
///
/// `weight(p, t)` returns the latest checkpoint of `p` at or before `t`, or
/// zero if there is none. Checkpoints written after a tick never change the
/// answer for that tick, matching a real snapshot ledger.
/// Thread-safe so it can be shared behind an `Arc` while tests keep writing.
#[derive(Default)]
pub struct NullWeightOracle {
    checkpoints: Mutex<HashMap<Principal, BTreeMap<Tick, Weight>>>,
}

impl NullWeightOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `principal`'s weight from `tick` onwards.
    pub fn set_weight(&self, principal: &Principal, tick: Tick, weight: Weight) {
        self.checkpoints
            .lock()
            .unwrap()
            .entry(principal.clone())
            .or_default()
            .insert(tick, weight);
    }

    /// Convenience: a whole set of holders with weights effective at `tick`.
    pub fn with_holders<'a>(
        holders: impl IntoIterator<Item = (&'a Principal, u128)>,
        tick: Tick,
    ) -> Self {
        let oracle = Self::new();
        for (principal, weight) in holders {
            oracle.set_weight(principal, tick, Weight::new(weight));
        }
        oracle
    }
}

impl VotingWeightOracle for NullWeightOracle {
    fn weight(&self, principal: &Principal, tick: Tick) -> Weight {
        self.checkpoints
            .lock()
            .unwrap()
            .get(principal)
            .and_then(|history| history.range(..=tick).next_back())
            .map(|(_, weight)| *weight)
            .unwrap_or(Weight::ZERO)
    }
}
