//! The top-level simulator.
//!
//! Owns the CPU and the run configuration. Programs load either as
//! assembly source (assembled in-process) or as a machine-code artifact
//! file. `step()` advances one cycle; `run()` loops until completion,
//! cooperative cancellation, or the configured step bound.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::asm::program::{self, MachineCode};
use crate::common::constants::{INSTRUCTION_SIZE, NUM_REGISTERS};
use crate::common::error::{AsmErrors, SimError};
use crate::config::{FollowTarget, SimConfig};
use crate::core::cpu::{Cpu, FollowedInstruction};
use crate::core::pipeline::node::InstructionRegisters;
use crate::sim::loader;
use crate::stats::SimStats;

/// The simulator facade.
#[derive(Debug)]
pub struct Simulator {
    cpu: Cpu,
    config: SimConfig,
    cancel: Arc<AtomicBool>,
}

impl Simulator {
    /// Creates a simulator with the given configuration.
    pub fn new(config: SimConfig) -> Self {
        let mut cpu = Cpu::new();
        cpu.pipelined = config.pipelined;
        cpu.forwarding = config.data_forwarding;
        cpu.branch_prediction = config.branch_prediction;
        Self {
            cpu,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Assembles a source text and loads the result.
    ///
    /// # Errors
    ///
    /// Every assembler diagnostic the source produced, or the load error
    /// for an artifact that violates the memory map.
    pub fn load_program(&mut self, source: &str) -> Result<(), LoadError> {
        let machine = program::assemble(source).map_err(LoadError::Assembly)?;
        self.load_machine(&machine)
    }

    /// Loads a pre-assembled machine-code artifact file.
    ///
    /// # Errors
    ///
    /// Artifact format errors and memory-map violations.
    pub fn load_artifact(&mut self, contents: &str) -> Result<(), LoadError> {
        let machine = loader::parse_artifact(contents).map_err(LoadError::Runtime)?;
        self.load_machine(&machine)
    }

    fn load_machine(&mut self, machine: &MachineCode) -> Result<(), LoadError> {
        self.cpu.load(machine).map_err(LoadError::Runtime)?;
        self.resolve_follow();
        tracing::info!(
            instructions = machine.text.len(),
            data_bytes = machine.data.len(),
            "program loaded"
        );
        Ok(())
    }

    /// Resolves the configured follow target to a PC, warning and dropping
    /// the flag when the target lies outside the text segment.
    fn resolve_follow(&mut self) {
        self.cpu.follow = None;
        let Some(target) = self.config.follow else {
            return;
        };
        let text_len = self.cpu.text.len() as u32;
        let pc = match target {
            FollowTarget::Instruction(n) => {
                if n == 0 || n > text_len {
                    tracing::warn!(n, "follow target out of range, skipping follow");
                    return;
                }
                (n - 1) * INSTRUCTION_SIZE
            }
            FollowTarget::Pc(pc) => {
                if pc % INSTRUCTION_SIZE != 0 || !self.cpu.text.contains_key(&pc) {
                    tracing::warn!(
                        pc = format_args!("{pc:#x}"),
                        "follow PC outside text segment, skipping follow"
                    );
                    return;
                }
                pc
            }
        };
        self.cpu.follow = Some(FollowedInstruction {
            pc,
            latch: InstructionRegisters::default(),
        });
    }

    /// Advances one cycle.
    ///
    /// Returns `Ok(true)` while the run continues and `Ok(false)` once it
    /// completed on this step.
    ///
    /// # Errors
    ///
    /// [`SimError::Halted`] when stepping a finished simulator; any fatal
    /// runtime error.
    pub fn step(&mut self) -> Result<bool, SimError> {
        self.cpu.tick()?;
        if self.cpu.finished() {
            tracing::info!(
                cycles = self.cpu.stats.cycles,
                instructions = self.cpu.stats.instructions_executed,
                "program execution completed"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Runs until completion, cancellation, or the step bound.
    ///
    /// Cancellation is cooperative: the flag from [`Self::cancel_token`]
    /// is checked once per cycle.
    ///
    /// # Errors
    ///
    /// Propagates fatal runtime errors; the caller can still snapshot the
    /// accumulated statistics.
    pub fn run(&mut self) -> Result<(), SimError> {
        let mut steps: u64 = 0;
        loop {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::warn!("run cancelled");
                return Ok(());
            }
            if !self.step()? {
                return Ok(());
            }
            steps += 1;
            if steps > self.config.max_steps {
                tracing::warn!(
                    max_steps = self.config.max_steps,
                    "run terminated - exceeded maximum step count"
                );
                return Ok(());
            }
        }
    }

    /// The cooperative cancellation flag for a long `run()`.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// True once the run has finished.
    pub fn finished(&self) -> bool {
        self.cpu.finished()
    }

    /// Read-only view of the run counters; valid regardless of pipeline
    /// state.
    pub fn stats(&self) -> &SimStats {
        &self.cpu.stats
    }

    /// Snapshot of the 32 registers.
    pub fn registers(&self) -> [u32; NUM_REGISTERS] {
        self.cpu.regs.dump()
    }

    /// Number of text-segment instructions loaded.
    pub fn text_len(&self) -> usize {
        self.cpu.text.len()
    }

    /// Current PC.
    pub fn pc(&self) -> u32 {
        self.cpu.pc
    }

    /// The followed instruction's latches, when `--follow` is active.
    pub fn followed(&self) -> Option<&FollowedInstruction> {
        self.cpu.followed()
    }

    /// Direct access to the CPU (tests and embedders).
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }
}

/// Why a program failed to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The source failed to assemble; all diagnostics are attached.
    #[error(transparent)]
    Assembly(AsmErrors),
    /// The artifact is malformed or violates the memory map.
    #[error(transparent)]
    Runtime(SimError),
}
