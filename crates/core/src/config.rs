//! Simulator configuration.
//!
//! Defines the configuration structure parameterizing a simulation run.
//! Construct with [`SimConfig::default`], build from CLI flags, or
//! deserialize from JSON.
//!
//! # Examples
//!
//! ```
//! use rvpipe_core::config::SimConfig;
//!
//! let config = SimConfig::from_json(
//!     r#"{ "pipelined": true, "data_forwarding": true }"#,
//! ).unwrap();
//! assert!(config.pipelined);
//! assert!(config.data_forwarding);
//! assert!(!config.branch_prediction);
//! assert_eq!(config.max_steps, 1_000_000);
//! ```

use serde::Deserialize;

use crate::common::constants::MAX_STEPS;

/// What the `--follow` feature tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowTarget {
    /// The n-th instruction of the text segment (1-based).
    Instruction(u32),
    /// A text-segment PC.
    Pc(u32),
}

/// Configuration of one simulation run.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Five-slot pipelined execution (serial oracle mode when false).
    #[serde(default)]
    pub pipelined: bool,

    /// Resolve RAW dependencies by operand bypass instead of stalling.
    #[serde(default)]
    pub data_forwarding: bool,

    /// Speculate on branch directions at fetch via the PHT and BTB.
    #[serde(default)]
    pub branch_prediction: bool,

    /// Safety bound on the number of cycles one `run()` may execute.
    #[serde(default = "SimConfig::default_max_steps")]
    pub max_steps: u64,

    /// Optional instruction to trace through the pipeline.
    #[serde(default)]
    pub follow: Option<FollowTarget>,
}

impl SimConfig {
    /// The default `run()` safety bound.
    fn default_max_steps() -> u64 {
        MAX_STEPS
    }

    /// Deserializes a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Propagates the underlying deserialization error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pipelined: false,
            data_forwarding: false,
            branch_prediction: false,
            max_steps: MAX_STEPS,
            follow: None,
        }
    }
}
