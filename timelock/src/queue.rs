//! Content-addressed set of queued transactions.
//!
//! A transaction is identified only by the hash of `(action, eta)`; presence
//! is boolean. Two proposals that independently produce the same action with
//! the same eta conflict: the second insert fails until the first is removed.
//!
//! Nothing removes a hash when its grace window lapses. A proposal that
//! expires without being canceled leaves its hashes here until an admin
//! `cancel_transaction` clears them, so a later proposal with an identical
//! `(action, eta)` is refused as a duplicate until then.

use crate::TimelockError;
use gavel_types::ActionHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedSet {
    hashes: BTreeSet<ActionHash>,
}

impl QueuedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hash: &ActionHash) -> bool {
        self.hashes.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn insert(&mut self, hash: ActionHash) -> Result<(), TimelockError> {
        if !self.hashes.insert(hash) {
            return Err(TimelockError::DuplicateQueue(hash));
        }
        Ok(())
    }

    pub fn remove(&mut self, hash: &ActionHash) -> Result<(), TimelockError> {
        if !self.hashes.remove(hash) {
            return Err(TimelockError::NotQueued(*hash));
        }
        Ok(())
    }
}
