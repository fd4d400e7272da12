//! The protected resource: a timelock that holds privileged actions behind a
//! mandatory delay and grace window, administered by exactly one governance
//! instance at a time.
//!
//! - [`queue::QueuedSet`] is the content-addressed set of scheduled actions.
//! - [`admin::AdminState`] is the two-phase handoff of administrative control.
//! - [`timelock::Timelock`] composes both and enforces the delay/grace checks.
//!
//! Control only ever moves in two steps: the timelock (acting on an
//! admin-queued action) names a pending admin, and that candidate must accept.

pub mod admin;
pub mod error;
pub mod params;
pub mod queue;
pub mod timelock;

pub use admin::AdminState;
pub use error::TimelockError;
pub use params::{TimelockParams, GRACE_PERIOD, MAXIMUM_DELAY, MINIMUM_DELAY};
pub use queue::QueuedSet;
pub use timelock::{selectors, Timelock};
