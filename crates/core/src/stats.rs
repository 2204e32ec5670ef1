//! Simulation statistics collection and reporting.
//!
//! Tracks the run counters of one simulation: cycles, retired instructions
//! by class, stall bubbles, hazards, flushes, and branch mispredictions.
//! All counters are monotonically non-decreasing; CPI is recomputed at the
//! end of every cycle.

use std::io::Write;
use std::path::Path;

/// The run counters of one simulation.
#[derive(Debug, Clone, Default)]
pub struct SimStats {
    /// Total cycles elapsed.
    pub cycles: u64,
    /// Instructions retired at Writeback.
    pub instructions_executed: u64,
    /// Retired loads and stores.
    pub data_transfer_instructions: u64,
    /// Retired ALU (non-memory, non-control) instructions.
    pub alu_instructions: u64,
    /// Retired branches and jumps.
    pub control_instructions: u64,
    /// Bubbles inserted for data hazards and flushes.
    pub stall_bubbles: u64,
    /// Data hazards detected (RAW stalls and load-use stalls).
    pub data_hazards: u64,
    /// Control hazards detected (mispredicted branches, taken jumps).
    pub control_hazards: u64,
    /// Pipeline flushes performed.
    pub pipeline_flushes: u64,
    /// Branch mispredictions observed at Execute.
    pub branch_mispredictions: u64,
    /// Cycles per retired instruction; 0 before the first retire.
    pub cycles_per_instruction: f64,
}

impl SimStats {
    /// Closes one cycle: bumps the cycle counter and recomputes CPI.
    pub fn end_cycle(&mut self) {
        self.cycles += 1;
        if self.instructions_executed > 0 {
            self.cycles_per_instruction =
                self.cycles as f64 / self.instructions_executed as f64;
        }
    }

    /// Renders the statistics in the `stats.txt` line format.
    pub fn render(&self) -> String {
        format!(
            "CyclesPerInstruction: {:.2}\n\
             TotalCycles: {}\n\
             InstructionsExecuted: {}\n\
             DataTransferInstructions: {}\n\
             ALUInstructions: {}\n\
             ControlInstructions: {}\n\
             StallBubbles: {}\n\
             DataHazards: {}\n\
             ControlHazards: {}\n\
             PipelineFlushes: {}\n\
             BranchMispredictions: {}\n",
            self.cycles_per_instruction,
            self.cycles,
            self.instructions_executed,
            self.data_transfer_instructions,
            self.alu_instructions,
            self.control_instructions,
            self.stall_bubbles,
            self.data_hazards,
            self.control_hazards,
            self.pipeline_flushes,
            self.branch_mispredictions,
        )
    }

    /// Writes the statistics file.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from creating or writing the file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(self.render().as_bytes())
    }
}
