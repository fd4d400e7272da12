//! Weighted governance for a timelock-protected resource.
//!
//! Lifecycle: Pending → Active → (Defeated | Succeeded) → Queued → (Executed | Expired),
//! with Canceled reachable from any non-executed state.
//!
//! Key principle: lifecycle state is never stored. It is recomputed from the
//! proposal's canonical facts and the current tick on every read, so it can
//! never go stale as the clock advances.
//! Voting weight comes from an external oracle, snapshotted at the start tick.

pub mod error;
pub mod governor;
pub mod oracle;
pub mod params;
pub mod proposal;
pub mod registry;
pub mod state;

pub use error::GovernanceError;
pub use governor::{selectors, Governor, TimelockBinding};
pub use oracle::VotingWeightOracle;
pub use params::GovernorParams;
pub use proposal::{actions_from_parts, Proposal, ProposalId, Receipt, Support, Tally};
pub use registry::ProposalRegistry;
pub use state::{derive_state, ProposalState};
