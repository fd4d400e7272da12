//! Blake2b hashing for queued transactions.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use gavel_types::{Action, ActionHash, Tick};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Content address of `action` scheduled at `eta`.
///
/// Variable-length fields are length-prefixed so that no two distinct
/// `(target, value, selector, payload, eta)` tuples share an encoding.
pub fn hash_action(action: &Action, eta: Tick) -> ActionHash {
    let target = action.target.as_str().as_bytes();
    let selector = action.selector.as_bytes();
    let target_len = (target.len() as u64).to_le_bytes();
    let selector_len = (selector.len() as u64).to_le_bytes();
    let payload_len = (action.payload.len() as u64).to_le_bytes();
    let value = action.value.to_le_bytes();
    let eta = eta.value().to_le_bytes();

    ActionHash::new(blake2b_256_multi(&[
        &target_len,
        target,
        &value,
        &selector_len,
        selector,
        &payload_len,
        &action.payload,
        &eta,
    ]))
}
