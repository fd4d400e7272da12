//! Gavel governance engine. Ties governors and timelocks together.
//!
//! The engine is the single writer over every deployed instance. It:
//! - Accepts proposals and votes on behalf of a governor
//! - Queues succeeded proposals into the governor's timelock
//! - Executes queued proposals atomically, dispatching each action
//! - Cancels proposals and their queued transactions
//! - Records every committed transition as an ordered event
//!
//! Each mutating call runs against a working copy of the [`World`]; the copy
//! replaces the live state only when the whole call succeeds.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod event;
pub mod migration;
pub mod world;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, ErrorKind};
pub use event::{EventBus, EventRecord, GovernanceEvent};
pub use migration::MigrationPlan;
pub use world::World;
