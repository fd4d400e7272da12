//! Hashing primitives for the gavel governance engine.
//!
//! - **Blake2b-256** for content-addressing queued timelock transactions

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, hash_action};
