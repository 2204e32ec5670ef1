//! Execute stage.
//!
//! Pure evaluation of one instruction over its latched operands: ALU
//! results, effective addresses, branch conditions, and PC targets. The
//! engine layers predictor training and misprediction flushes on top.

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::SimError;
use crate::core::pipeline::node::InstructionNode;
use crate::core::units::alu;
use crate::isa::instruction::InstructionFormat;
use crate::isa::rv32i::opcodes as i_op;

/// The outcome of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Execute result: ALU output, effective address, link value, or the
    /// branch-taken flag.
    pub ry: u32,
    /// True for a taken branch and for every unconditional jump.
    pub taken: bool,
    /// The control-flow target (meaningful for branches and jumps).
    pub target: u32,
    /// The architecturally correct next PC for this instruction.
    pub next_pc: u32,
}

/// Evaluates one instruction over (RA, RB, RM, PC).
///
/// Branches compare RA with RM — the register value of rs2 — because RB
/// carries the sign-extended immediate for the B format.
///
/// # Errors
///
/// `div`/`rem` with a zero divisor is fatal.
pub fn evaluate(node: &InstructionNode) -> Result<ExecOutcome, SimError> {
    let ra = node.latch.ra;
    let rb = node.latch.rb;
    let sequential = node.pc.wrapping_add(INSTRUCTION_SIZE);

    let outcome = match node.format() {
        InstructionFormat::R => ExecOutcome {
            ry: alu::register_op(node.funct3, node.funct7, ra, rb, node.pc)?,
            taken: false,
            target: 0,
            next_pc: sequential,
        },
        InstructionFormat::I => match node.spec.opcode {
            // Loads compute the effective address; the access is Memory's.
            i_op::OP_LOAD => ExecOutcome {
                ry: ra.wrapping_add(rb),
                taken: false,
                target: 0,
                next_pc: sequential,
            },
            i_op::OP_JALR => {
                let target = ra.wrapping_add(rb) & !1;
                ExecOutcome {
                    ry: sequential,
                    taken: true,
                    target,
                    next_pc: target,
                }
            }
            _ => ExecOutcome {
                ry: alu::immediate_op(node.funct3, ra, rb),
                taken: false,
                target: 0,
                next_pc: sequential,
            },
        },
        InstructionFormat::S => ExecOutcome {
            ry: ra.wrapping_add(rb),
            taken: false,
            target: 0,
            next_pc: sequential,
        },
        InstructionFormat::B => {
            let taken = alu::branch_taken(node.funct3, ra, node.latch.rm);
            let target = node.pc.wrapping_add(node.imm as u32);
            ExecOutcome {
                ry: u32::from(taken),
                taken,
                target,
                next_pc: if taken { target } else { sequential },
            }
        }
        InstructionFormat::U => ExecOutcome {
            ry: if node.spec.opcode == i_op::OP_AUIPC {
                node.pc.wrapping_add(node.imm as u32)
            } else {
                node.imm as u32
            },
            taken: false,
            target: 0,
            next_pc: sequential,
        },
        InstructionFormat::J => {
            let target = node.pc.wrapping_add(node.imm as u32);
            ExecOutcome {
                ry: sequential,
                taken: true,
                target,
                next_pc: target,
            }
        }
        InstructionFormat::Standalone => ExecOutcome {
            ry: 0,
            taken: false,
            target: 0,
            next_pc: sequential,
        },
    };

    Ok(outcome)
}
