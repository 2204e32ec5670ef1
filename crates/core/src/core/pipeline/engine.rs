//! The pipeline engine.
//!
//! Drives one cycle per `tick`. In pipelined mode every non-empty slot is
//! processed in strict reverse stage order (Writeback → Memory → Execute →
//! Decode → Fetch) into a fresh slot map, so later stages always observe
//! the previous cycle's contents of earlier stages. Hazard stalls hold the
//! Decode and Fetch slots in place; mispredicted branches and jumps flush
//! the front of the pipeline and redirect the PC; the serial mode advances
//! a single instruction one stage per cycle and serves as the testing
//! oracle.

use crate::common::error::SimError;
use crate::core::cpu::Cpu;
use crate::core::pipeline::node::{InstructionNode, Stage};
use crate::core::pipeline::stages;
use crate::core::pipeline::hazards::{self, Forward};

const FE: usize = 0;
const DE: usize = 1;
const EX: usize = 2;
const MEM: usize = 3;
const WB: usize = 4;

impl Cpu {
    /// Advances the machine by one cycle.
    ///
    /// # Errors
    ///
    /// [`SimError::Halted`] when invoked after the run finished; any fatal
    /// runtime error stops the run with counters intact.
    pub fn tick(&mut self) -> Result<(), SimError> {
        if self.finished() {
            return Err(SimError::Halted);
        }

        let active = !self.pipeline_empty();
        let result = if self.pipelined {
            self.advance_pipelined()
        } else {
            self.advance_serial()
        };

        match result {
            Ok(()) => {
                if active {
                    self.stats.end_cycle();
                }
                if self.pipeline_empty() && self.text.get(&self.pc).is_none() {
                    self.running = false;
                }
                Ok(())
            }
            Err(e) => {
                // A fatal error ends the run; in-flight work is dropped so
                // the machine reads as finished, counters intact.
                self.running = false;
                self.slots = [const { None }; Stage::COUNT];
                Err(e)
            }
        }
    }

    /// One cycle of the five-slot pipelined mode.
    fn advance_pipelined(&mut self) -> Result<(), SimError> {
        let mut next: [Option<InstructionNode>; Stage::COUNT] = [const { None }; Stage::COUNT];

        // Load-use is judged on the pre-cycle slot contents: the Decode
        // node's consumer registers against a load in the Execute slot.
        let load_use = self.forwarding
            && hazards::load_use_hazard(self.slots[DE].as_ref(), self.slots[EX].as_ref());

        let mut fwd_mem: Option<Forward> = None;
        let mut fwd_ex: Option<Forward> = None;
        let mut decode_held = false;

        // ── Writeback ─────────────────────────────────────
        if let Some(node) = self.slots[WB].take() {
            stages::writeback::writeback(self, &node);
        }
        if self.halted {
            // An ecall retired: younger in-flight instructions are dropped.
            self.slots = [const { None }; Stage::COUNT];
            return Ok(());
        }

        // ── Memory ────────────────────────────────────────
        if let Some(mut node) = self.slots[MEM].take() {
            stages::memory::memory(self, &mut node)?;
            self.deps.set_stage(node.pc, Stage::Memory);
            if node.writes_rd() {
                fwd_mem = Some(Forward {
                    reg: node.rd,
                    value: node.latch.rz,
                });
            }
            node.stage = Stage::Writeback;
            next[WB] = Some(node);
        }

        // ── Execute ───────────────────────────────────────
        if let Some(mut node) = self.slots[EX].take() {
            let outcome = stages::execute::evaluate(&node)?;
            node.latch.ry = outcome.ry;
            self.deps.set_stage(node.pc, Stage::Execute);
            if let Some(follow) = &mut self.follow {
                if follow.pc == node.pc {
                    follow.latch.ry = outcome.ry;
                }
            }
            // Loads cannot bypass out of Execute; their value exists only
            // after Memory. The load-use stall covers that window.
            if node.writes_rd() && !node.is_load() {
                fwd_ex = Some(Forward {
                    reg: node.rd,
                    value: node.latch.ry,
                });
            }

            if node.is_branch() {
                self.predictor.update(node.pc, outcome.taken, outcome.target);
            } else if node.is_jump() {
                self.predictor.update_target(node.pc, outcome.target);
            }

            if (node.is_branch() || node.is_jump()) && node.predicted_taken != outcome.taken {
                self.stats.branch_mispredictions += 1;
                self.stats.control_hazards += 1;
                self.flush(if node.is_branch() {
                    "branch misprediction"
                } else {
                    "jump taken"
                });
                self.pc = outcome.next_pc;
            }

            node.stage = Stage::Memory;
            next[MEM] = Some(node);
        }

        // ── Decode ────────────────────────────────────────
        if let Some(mut node) = self.slots[DE].take() {
            if load_use {
                self.stats.data_hazards += 1;
                self.stats.stall_bubbles += 1;
                node.stalled = true;
                decode_held = true;
                next[DE] = Some(node);
            } else {
                // Register reads repeat every held cycle, so the operands
                // are fresh once the writer has retired.
                stages::decode::decode(self, &mut node);
                if self.forwarding {
                    hazards::apply_forwarding(&mut node, fwd_mem, fwd_ex);
                }
                if !self.forwarding && self.deps.has_raw_hazard(&node) {
                    self.stats.data_hazards += 1;
                    self.stats.stall_bubbles += 1;
                    node.stalled = true;
                    decode_held = true;
                    next[DE] = Some(node);
                } else {
                    node.stalled = false;
                    self.deps.insert(&node);
                    node.stage = Stage::Execute;
                    next[EX] = Some(node);
                }
            }
        }

        // ── Fetch ─────────────────────────────────────────
        if let Some(mut node) = self.slots[FE].take() {
            if load_use || decode_held {
                next[FE] = Some(node);
            } else {
                node.stage = Stage::Decode;
                next[DE] = Some(node);
            }
        }

        // Refill the Fetch slot for the next cycle. After a flush this
        // runs with the redirected PC in the same cycle.
        if next[FE].is_none() && !load_use && !decode_held && self.running {
            next[FE] = stages::fetch::fetch(self)?;
        }

        self.slots = next;
        Ok(())
    }

    /// One cycle of the serial (non-pipelined) mode: at most one
    /// instruction in flight, advanced one stage per cycle.
    fn advance_serial(&mut self) -> Result<(), SimError> {
        if let Some(node) = self.slots[WB].take() {
            stages::writeback::writeback(self, &node);
            if self.halted {
                self.slots = [const { None }; Stage::COUNT];
                return Ok(());
            }
            if self.running {
                self.slots[FE] = stages::fetch::fetch(self)?;
            }
        } else if let Some(mut node) = self.slots[MEM].take() {
            stages::memory::memory(self, &mut node)?;
            self.deps.set_stage(node.pc, Stage::Memory);
            node.stage = Stage::Writeback;
            self.slots[WB] = Some(node);
        } else if let Some(mut node) = self.slots[EX].take() {
            let outcome = stages::execute::evaluate(&node)?;
            node.latch.ry = outcome.ry;
            self.deps.set_stage(node.pc, Stage::Execute);
            if let Some(follow) = &mut self.follow {
                if follow.pc == node.pc {
                    follow.latch.ry = outcome.ry;
                }
            }
            if outcome.taken {
                self.pc = outcome.target;
            }
            node.stage = Stage::Memory;
            self.slots[MEM] = Some(node);
        } else if let Some(mut node) = self.slots[DE].take() {
            stages::decode::decode(self, &mut node);
            self.deps.insert(&node);
            node.stage = Stage::Execute;
            self.slots[EX] = Some(node);
        } else if let Some(mut node) = self.slots[FE].take() {
            node.stage = Stage::Decode;
            self.slots[DE] = Some(node);
        }
        Ok(())
    }

    /// Clears the Fetch and Decode slots after a mispredicted branch or a
    /// jump. The PC redirect and the misprediction counters belong to the
    /// Execute handler; the two discarded slots are accounted as stall
    /// bubbles.
    fn flush(&mut self, reason: &str) {
        self.slots[FE] = None;
        self.slots[DE] = None;
        self.stats.pipeline_flushes += 1;
        self.stats.stall_bubbles += 2;
        tracing::debug!(reason, "pipeline flushed");
    }
}
