//! Pipeline stages and instruction nodes.
//!
//! An [`InstructionNode`] is a value record owned by exactly one pipeline
//! slot at a time. It carries the decoded fields plus its own inter-stage
//! latches (RA, RB, RM, RY, RZ), so no state is shared between in-flight
//! instructions.

use crate::isa::instruction::{Decoded, InstructionFormat};
use crate::isa::table::InstructionSpec;

/// The five pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Instruction fetch.
    Fetch,
    /// Decode and register read.
    Decode,
    /// ALU / branch resolution.
    Execute,
    /// Data memory access.
    Memory,
    /// Register write-back and retirement.
    Writeback,
}

impl Stage {
    /// Number of stages.
    pub const COUNT: usize = 5;

    /// Slot index of this stage.
    pub fn index(self) -> usize {
        match self {
            Self::Fetch => 0,
            Self::Decode => 1,
            Self::Execute => 2,
            Self::Memory => 3,
            Self::Writeback => 4,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fetch => "FETCH",
            Self::Decode => "DECODE",
            Self::Execute => "EXECUTE",
            Self::Memory => "MEMORY",
            Self::Writeback => "WRITEBACK",
        };
        f.write_str(name)
    }
}

/// The inter-stage latch values of one instruction.
///
/// RA = rs1 value; RB = rs2 value or sign-extended immediate; RM = store
/// data; RY = Execute result; RZ = Memory result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstructionRegisters {
    /// Value of rs1 read at Decode.
    pub ra: u32,
    /// Value of rs2 (R format) or the sign-extended immediate.
    pub rb: u32,
    /// Store data (rs2 value for S and B formats).
    pub rm: u32,
    /// Execute result: ALU output, effective address, or link value.
    pub ry: u32,
    /// Memory result: loaded value, or RY passed through.
    pub rz: u32,
}

/// One live in-flight instruction.
#[derive(Debug, Clone)]
pub struct InstructionNode {
    /// Raw 32-bit encoding.
    pub raw: u32,
    /// PC this instruction was fetched at.
    pub pc: u32,
    /// The matched instruction table row.
    pub spec: &'static InstructionSpec,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Function code field 3.
    pub funct3: u32,
    /// Function code field 7.
    pub funct7: u32,
    /// Sign-extended immediate.
    pub imm: i32,
    /// Current stage.
    pub stage: Stage,
    /// Held in Decode by a data hazard this cycle.
    pub stalled: bool,
    /// Direction the fetch stage speculated for this branch or jump.
    pub predicted_taken: bool,
    /// This instruction's inter-stage latches.
    pub latch: InstructionRegisters,
}

impl InstructionNode {
    /// Builds a node from a decoded word at its fetch PC.
    pub fn new(decoded: Decoded, pc: u32) -> Self {
        Self {
            raw: decoded.raw,
            pc,
            spec: decoded.spec,
            rd: decoded.rd,
            rs1: decoded.rs1,
            rs2: decoded.rs2,
            funct3: decoded.funct3,
            funct7: decoded.funct7,
            imm: decoded.imm,
            stage: Stage::Fetch,
            stalled: false,
            predicted_taken: false,
            latch: InstructionRegisters::default(),
        }
    }

    /// The node's format.
    pub fn format(&self) -> InstructionFormat {
        self.spec.format
    }

    /// True when this instruction reads rs1.
    pub fn reads_rs1(&self) -> bool {
        self.format().reads_rs1()
    }

    /// True when this instruction reads rs2 (R, S, B formats).
    pub fn reads_rs2(&self) -> bool {
        self.format().reads_rs2()
    }

    /// True when this instruction writes a register other than x0.
    pub fn writes_rd(&self) -> bool {
        self.format().writes_rd() && self.rd != 0
    }

    /// True for loads.
    pub fn is_load(&self) -> bool {
        self.spec.is_load()
    }

    /// True for stores.
    pub fn is_store(&self) -> bool {
        self.spec.is_store()
    }

    /// True for conditional branches.
    pub fn is_branch(&self) -> bool {
        self.spec.is_branch()
    }

    /// True for `jal`/`jalr`.
    pub fn is_jump(&self) -> bool {
        self.spec.is_jump()
    }

    /// True for `ecall`.
    pub fn is_ecall(&self) -> bool {
        self.spec.is_ecall()
    }
}
