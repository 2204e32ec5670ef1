//! The simulated CPU.
//!
//! Owns the architectural state (PC, register file, data memory, text map)
//! and the microarchitectural state (pipeline slots, dependency tracker,
//! branch predictor, counters). The per-cycle advance lives in
//! [`crate::core::pipeline::engine`]; this module holds the state and the
//! loading/reset plumbing.

use std::collections::BTreeMap;

use crate::asm::program::MachineCode;
use crate::common::constants::DATA_BASE;
use crate::common::error::SimError;
use crate::common::reg::RegisterFile;
use crate::core::mem::Memory;
use crate::core::pipeline::hazards::DependencyTracker;
use crate::core::pipeline::node::{InstructionNode, InstructionRegisters, Stage};
use crate::core::units::bru::BranchPredictor;
use crate::stats::SimStats;

/// What the simulator follows for the `--follow` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowedInstruction {
    /// PC of the followed instruction.
    pub pc: u32,
    /// Latch values observed as the followed instruction moved through the
    /// pipeline (RA/RB at Decode, RY at Execute, RZ at Memory).
    pub latch: InstructionRegisters,
}

/// The CPU: architectural and pipeline state plus run counters.
#[derive(Debug)]
pub struct Cpu {
    /// Program counter of the next fetch.
    pub pc: u32,
    /// The 32 integer registers.
    pub regs: RegisterFile,
    /// Sparse data memory.
    pub mem: Memory,
    /// Text segment: address → instruction word.
    pub text: BTreeMap<u32, u32>,
    /// The five pipeline slots, indexed by [`Stage::index`].
    pub slots: [Option<InstructionNode>; Stage::COUNT],
    /// In-flight register writes.
    pub deps: DependencyTracker,
    /// The branch prediction unit.
    pub predictor: BranchPredictor,
    /// Run counters.
    pub stats: SimStats,
    /// Pipelined mode (five concurrent nodes) vs serial oracle mode.
    pub pipelined: bool,
    /// Data forwarding enabled.
    pub forwarding: bool,
    /// Branch prediction at fetch enabled.
    pub branch_prediction: bool,
    /// More instructions may still be fetched.
    pub running: bool,
    /// An `ecall` retired; the run is over.
    pub(crate) halted: bool,
    /// Followed instruction state, when `--follow` is active.
    pub follow: Option<FollowedInstruction>,
}

impl Cpu {
    /// Creates an idle CPU with reset register state and empty memory.
    pub fn new() -> Self {
        Self {
            pc: crate::common::constants::TEXT_BASE,
            regs: RegisterFile::new(),
            mem: Memory::new(),
            text: BTreeMap::new(),
            slots: [const { None }; Stage::COUNT],
            deps: DependencyTracker::new(),
            predictor: BranchPredictor::new(),
            stats: SimStats::default(),
            pipelined: false,
            forwarding: false,
            branch_prediction: false,
            running: false,
            halted: false,
            follow: None,
        }
    }

    /// Loads a machine-code artifact: text words into the text map, data
    /// bytes into memory. Resets all run state and primes the Fetch slot.
    ///
    /// # Errors
    ///
    /// Propagates memory errors for data bytes outside the valid range and
    /// fetch errors for an unclassifiable first instruction.
    pub fn load(&mut self, machine: &MachineCode) -> Result<(), SimError> {
        self.reset();

        for entry in &machine.text {
            if entry.address < DATA_BASE {
                let _ = self.text.insert(entry.address, entry.word);
            }
        }
        for (address, byte) in &machine.data {
            self.mem.write_u8(*address, *byte)?;
        }

        self.running = true;
        self.prime_fetch()?;
        Ok(())
    }

    /// Places the initial fetch node at `TEXT_BASE`.
    pub(crate) fn prime_fetch(&mut self) -> Result<(), SimError> {
        self.slots[Stage::Fetch.index()] = crate::core::pipeline::stages::fetch::fetch(self)?;
        Ok(())
    }

    /// Clears all run state back to reset.
    pub fn reset(&mut self) {
        self.pc = crate::common::constants::TEXT_BASE;
        self.regs.reset();
        self.mem.clear();
        self.text.clear();
        self.slots = [const { None }; Stage::COUNT];
        self.deps.clear();
        self.predictor.reset();
        self.stats = SimStats::default();
        self.running = false;
        self.halted = false;
        if let Some(follow) = &mut self.follow {
            follow.latch = InstructionRegisters::default();
        }
    }

    /// True when no instruction is in flight.
    pub fn pipeline_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// True when the run has finished (drained or halted by `ecall`).
    pub fn finished(&self) -> bool {
        !self.running && self.pipeline_empty()
    }

    /// Read-only view of the followed instruction's latches.
    pub fn followed(&self) -> Option<&FollowedInstruction> {
        self.follow.as_ref()
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
