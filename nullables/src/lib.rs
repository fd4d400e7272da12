//! Nullable infrastructure for deterministic testing.
//!
//! The engine's external collaborators (the logical clock and the historical
//! voting-weight ledger) get test-friendly implementations here that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod oracle;

pub use clock::NullClock;
pub use oracle::NullWeightOracle;
