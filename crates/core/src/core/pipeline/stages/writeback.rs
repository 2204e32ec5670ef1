//! Writeback stage.
//!
//! Applies the register write from RZ, removes the dependency record,
//! retires the instruction into the run counters, and recognises `ecall`
//! as graceful termination.

use crate::core::cpu::Cpu;
use crate::core::pipeline::node::InstructionNode;

/// Retires one instruction.
pub fn writeback(cpu: &mut Cpu, node: &InstructionNode) {
    if node.writes_rd() {
        cpu.regs.write(node.rd, node.latch.rz);
    }
    cpu.deps.remove(node.pc);

    cpu.stats.instructions_executed += 1;
    if node.is_load() || node.is_store() {
        cpu.stats.data_transfer_instructions += 1;
    } else if node.is_branch() || node.is_jump() {
        cpu.stats.control_instructions += 1;
    } else {
        cpu.stats.alu_instructions += 1;
    }

    if node.is_ecall() {
        tracing::debug!(pc = format_args!("{:#x}", node.pc), "ecall retired");
        cpu.running = false;
        cpu.halted = true;
    }
}
