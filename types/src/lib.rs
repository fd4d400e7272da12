//! Fundamental types for the gavel governance engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! principals, logical clock ticks, voting weights, action records and their
//! content-addressed hashes.

pub mod action;
pub mod hash;
pub mod principal;
pub mod tick;
pub mod weight;

pub use action::Action;
pub use hash::ActionHash;
pub use principal::Principal;
pub use tick::Tick;
pub use weight::Weight;
