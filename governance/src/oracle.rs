//! Historical voting weight source.

use gavel_types::{Principal, Tick, Weight};
use std::sync::Arc;

/// Supplies a principal's voting weight as of a past tick.
///
/// Implementations must return a stable value for any tick that has already
/// passed: the engine snapshots weights at a proposal's start tick and relies
/// on later balance changes never leaking into that snapshot.
pub trait VotingWeightOracle {
    fn weight(&self, principal: &Principal, tick: Tick) -> Weight;
}

impl<T: VotingWeightOracle + ?Sized> VotingWeightOracle for &T {
    fn weight(&self, principal: &Principal, tick: Tick) -> Weight {
        (**self).weight(principal, tick)
    }
}

impl<T: VotingWeightOracle + ?Sized> VotingWeightOracle for Arc<T> {
    fn weight(&self, principal: &Principal, tick: Tick) -> Weight {
        (**self).weight(principal, tick)
    }
}
