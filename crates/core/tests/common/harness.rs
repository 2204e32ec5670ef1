//! Simulation test harness.
//!
//! Builds a simulator from an assembly source string and a mode selection,
//! runs it to completion, and exposes register and counter views.

use rvpipe_core::config::SimConfig;
use rvpipe_core::sim::Simulator;
use rvpipe_core::stats::SimStats;

/// A loaded simulator plus convenience accessors.
pub struct TestContext {
    pub sim: Simulator,
}

impl TestContext {
    /// Builds and loads a simulator with an explicit configuration.
    pub fn with_config(source: &str, config: SimConfig) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let mut sim = Simulator::new(config);
        sim.load_program(source).expect("program should assemble");
        Self { sim }
    }

    /// Serial (non-pipelined) oracle mode.
    pub fn serial(source: &str) -> Self {
        Self::with_config(source, SimConfig::default())
    }

    /// Pipelined mode with forwarding and prediction toggles.
    pub fn pipelined(source: &str, forwarding: bool, prediction: bool) -> Self {
        Self::with_config(
            source,
            SimConfig {
                pipelined: true,
                data_forwarding: forwarding,
                branch_prediction: prediction,
                ..SimConfig::default()
            },
        )
    }

    /// Runs to completion and returns self for chained assertions.
    pub fn run(mut self) -> Self {
        self.sim.run().expect("run should not fault");
        assert!(self.sim.finished(), "run should drain the pipeline");
        self
    }

    /// One register value.
    pub fn reg(&self, idx: usize) -> u32 {
        self.sim.registers()[idx]
    }

    /// The run counters.
    pub fn stats(&self) -> &SimStats {
        self.sim.stats()
    }
}
