//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use gavel_governance::GovernorParams;
use gavel_timelock::{TimelockParams, GRACE_PERIOD, MINIMUM_DELAY};
use gavel_types::Weight;
use gavel_utils::LogFormat;

use crate::EngineError;

/// Configuration for a gavel deployment.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Parameters applied to every governor deployed from this config.
    #[serde(default)]
    pub governor: GovernorSection,

    /// Parameters applied to every timelock deployed from this config.
    #[serde(default)]
    pub timelock: TimelockSection,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// `[governor]` table. Weights are plain integers since TOML has no 128-bit
/// numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorSection {
    #[serde(default = "default_voting_delay")]
    pub voting_delay: u64,

    #[serde(default = "default_voting_period")]
    pub voting_period: u64,

    #[serde(default = "default_proposal_threshold")]
    pub proposal_threshold: u64,

    #[serde(default = "default_quorum_votes")]
    pub quorum_votes: u64,

    #[serde(default = "default_max_operations")]
    pub proposal_max_operations: usize,
}

/// `[timelock]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockSection {
    #[serde(default = "default_delay")]
    pub delay: u64,

    #[serde(default = "default_grace_period")]
    pub grace_period: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_voting_delay() -> u64 {
    1
}

fn default_voting_period() -> u64 {
    17_280
}

fn default_proposal_threshold() -> u64 {
    100_000
}

fn default_quorum_votes() -> u64 {
    400_000
}

fn default_max_operations() -> usize {
    10
}

fn default_delay() -> u64 {
    MINIMUM_DELAY
}

fn default_grace_period() -> u64 {
    GRACE_PERIOD
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("EngineConfig is always serializable to TOML")
    }

    /// Check every parameter against the bounds the governor and timelock enforce.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.governor_params()
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        self.timelock_params()
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(())
    }

    pub fn governor_params(&self) -> GovernorParams {
        GovernorParams {
            voting_delay: self.governor.voting_delay,
            voting_period: self.governor.voting_period,
            proposal_threshold: Weight::new(self.governor.proposal_threshold.into()),
            quorum_votes: Weight::new(self.governor.quorum_votes.into()),
            proposal_max_operations: self.governor.proposal_max_operations,
        }
    }

    pub fn timelock_params(&self) -> TimelockParams {
        TimelockParams {
            delay: self.timelock.delay,
            grace_period: self.timelock.grace_period,
        }
    }
}

impl Default for GovernorSection {
    fn default() -> Self {
        Self {
            voting_delay: default_voting_delay(),
            voting_period: default_voting_period(),
            proposal_threshold: default_proposal_threshold(),
            quorum_votes: default_quorum_votes(),
            proposal_max_operations: default_max_operations(),
        }
    }
}

impl Default for TimelockSection {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            grace_period: default_grace_period(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            governor: GovernorSection::default(),
            timelock: TimelockSection::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
