//! Decode stage.
//!
//! Reads the source operands into the node's latches: RA from rs1, RB from
//! rs2 (R format) or the sign-extended immediate, RM carrying the rs2
//! value for stores and branches.

use crate::core::cpu::Cpu;
use crate::core::pipeline::node::InstructionNode;
use crate::isa::instruction::InstructionFormat;

/// Populates RA/RB/RM from the register file and the decoded immediate.
pub fn decode(cpu: &mut Cpu, node: &mut InstructionNode) {
    node.latch.ra = if node.reads_rs1() {
        cpu.regs.read(node.rs1)
    } else {
        0
    };

    match node.format() {
        InstructionFormat::R => {
            node.latch.rb = cpu.regs.read(node.rs2);
        }
        InstructionFormat::S | InstructionFormat::B => {
            node.latch.rb = node.imm as u32;
            node.latch.rm = cpu.regs.read(node.rs2);
        }
        InstructionFormat::I | InstructionFormat::U | InstructionFormat::J => {
            node.latch.rb = node.imm as u32;
        }
        InstructionFormat::Standalone => {}
    }

    if let Some(follow) = &mut cpu.follow {
        if follow.pc == node.pc {
            follow.latch.ra = node.latch.ra;
            follow.latch.rb = node.latch.rb;
            follow.latch.rm = node.latch.rm;
        }
    }
}
