//! Shared utilities for the gavel governance engine.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_span, format_until};
