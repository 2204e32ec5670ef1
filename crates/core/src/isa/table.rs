//! The static instruction table.
//!
//! One record per supported mnemonic, mapping it to its format and its
//! (opcode, funct3, funct7) triple. The table is the single source of truth
//! shared by the encoder, the decoder's classifier, and the disassembler.

use crate::isa::instruction::{InstructionBits, InstructionFormat};
use crate::isa::rv32i::{funct3 as i_f3, funct7 as i_f7, opcodes as i_op};
use crate::isa::rv32m::{funct3 as m_f3, opcodes as m_op};

/// One row of the instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionSpec {
    /// Lowercase mnemonic.
    pub mnemonic: &'static str,
    /// The instruction's format.
    pub format: InstructionFormat,
    /// Major opcode (bits 6-0).
    pub opcode: u32,
    /// funct3 (bits 14-12), where the format carries one.
    pub funct3: Option<u32>,
    /// funct7 (bits 31-25), where the encoding constrains it. For I-format
    /// shifts this constrains the upper immediate bits.
    pub funct7: Option<u32>,
}

impl InstructionSpec {
    const fn new(
        mnemonic: &'static str,
        format: InstructionFormat,
        opcode: u32,
        funct3: Option<u32>,
        funct7: Option<u32>,
    ) -> Self {
        Self {
            mnemonic,
            format,
            opcode,
            funct3,
            funct7,
        }
    }

    /// True when this row is a load (`lb`/`lh`/`lw`/`lbu`/`lhu`).
    pub fn is_load(&self) -> bool {
        self.opcode == i_op::OP_LOAD
    }

    /// True when this row is a store.
    pub fn is_store(&self) -> bool {
        self.opcode == i_op::OP_STORE
    }

    /// True when this row is a conditional branch.
    pub fn is_branch(&self) -> bool {
        self.opcode == i_op::OP_BRANCH
    }

    /// True when this row is `jal` or `jalr`.
    pub fn is_jump(&self) -> bool {
        self.opcode == i_op::OP_JAL || self.opcode == i_op::OP_JALR
    }

    /// True when this row is `ecall`.
    pub fn is_ecall(&self) -> bool {
        self.opcode == i_op::OP_SYSTEM
    }

    /// Tests whether a raw word is an encoding of this row.
    fn matches(&self, word: u32) -> bool {
        if word.opcode() != self.opcode {
            return false;
        }
        if let Some(f3) = self.funct3 {
            if word.funct3() != f3 {
                return false;
            }
        }
        match self.format {
            InstructionFormat::R => self.funct7 == Some(word.funct7()),
            // I-format shifts constrain the funct7 bits of the immediate.
            InstructionFormat::I => self.funct7.is_none_or(|f7| word.funct7() == f7),
            InstructionFormat::Standalone => word == i_op::ECALL_WORD,
            _ => true,
        }
    }
}

use InstructionFormat::{B, I, J, R, S, Standalone, U};

/// Every instruction the system understands, one row per mnemonic.
pub static INSTRUCTIONS: &[InstructionSpec] = &[
    // R-type base integer
    InstructionSpec::new("add", R, i_op::OP_REG, Some(i_f3::ADD_SUB), Some(i_f7::DEFAULT)),
    InstructionSpec::new("sub", R, i_op::OP_REG, Some(i_f3::ADD_SUB), Some(i_f7::SUB)),
    InstructionSpec::new("sll", R, i_op::OP_REG, Some(i_f3::SLL), Some(i_f7::DEFAULT)),
    InstructionSpec::new("slt", R, i_op::OP_REG, Some(i_f3::SLT), Some(i_f7::DEFAULT)),
    InstructionSpec::new("sltu", R, i_op::OP_REG, Some(i_f3::SLTU), Some(i_f7::DEFAULT)),
    InstructionSpec::new("xor", R, i_op::OP_REG, Some(i_f3::XOR), Some(i_f7::DEFAULT)),
    InstructionSpec::new("srl", R, i_op::OP_REG, Some(i_f3::SRL_SRA), Some(i_f7::DEFAULT)),
    InstructionSpec::new("sra", R, i_op::OP_REG, Some(i_f3::SRL_SRA), Some(i_f7::SRA)),
    InstructionSpec::new("or", R, i_op::OP_REG, Some(i_f3::OR), Some(i_f7::DEFAULT)),
    InstructionSpec::new("and", R, i_op::OP_REG, Some(i_f3::AND), Some(i_f7::DEFAULT)),
    // R-type M extension
    InstructionSpec::new("mul", R, i_op::OP_REG, Some(m_f3::MUL), Some(m_op::M_EXTENSION)),
    InstructionSpec::new("div", R, i_op::OP_REG, Some(m_f3::DIV), Some(m_op::M_EXTENSION)),
    InstructionSpec::new("rem", R, i_op::OP_REG, Some(m_f3::REM), Some(m_op::M_EXTENSION)),
    // I-type arithmetic
    InstructionSpec::new("addi", I, i_op::OP_IMM, Some(i_f3::ADD_SUB), None),
    InstructionSpec::new("slli", I, i_op::OP_IMM, Some(i_f3::SLL), Some(i_f7::DEFAULT)),
    InstructionSpec::new("slti", I, i_op::OP_IMM, Some(i_f3::SLT), None),
    InstructionSpec::new("sltiu", I, i_op::OP_IMM, Some(i_f3::SLTU), None),
    InstructionSpec::new("xori", I, i_op::OP_IMM, Some(i_f3::XOR), None),
    InstructionSpec::new("srli", I, i_op::OP_IMM, Some(i_f3::SRL_SRA), Some(i_f7::DEFAULT)),
    InstructionSpec::new("srai", I, i_op::OP_IMM, Some(i_f3::SRL_SRA), Some(i_f7::SRA)),
    InstructionSpec::new("ori", I, i_op::OP_IMM, Some(i_f3::OR), None),
    InstructionSpec::new("andi", I, i_op::OP_IMM, Some(i_f3::AND), None),
    // I-type loads
    InstructionSpec::new("lb", I, i_op::OP_LOAD, Some(i_f3::LB), None),
    InstructionSpec::new("lh", I, i_op::OP_LOAD, Some(i_f3::LH), None),
    InstructionSpec::new("lw", I, i_op::OP_LOAD, Some(i_f3::LW), None),
    InstructionSpec::new("lbu", I, i_op::OP_LOAD, Some(i_f3::LBU), None),
    InstructionSpec::new("lhu", I, i_op::OP_LOAD, Some(i_f3::LHU), None),
    // I-type jump
    InstructionSpec::new("jalr", I, i_op::OP_JALR, Some(0b000), None),
    // S-type
    InstructionSpec::new("sb", S, i_op::OP_STORE, Some(i_f3::SB), None),
    InstructionSpec::new("sh", S, i_op::OP_STORE, Some(i_f3::SH), None),
    InstructionSpec::new("sw", S, i_op::OP_STORE, Some(i_f3::SW), None),
    // B-type
    InstructionSpec::new("beq", B, i_op::OP_BRANCH, Some(i_f3::BEQ), None),
    InstructionSpec::new("bne", B, i_op::OP_BRANCH, Some(i_f3::BNE), None),
    InstructionSpec::new("blt", B, i_op::OP_BRANCH, Some(i_f3::BLT), None),
    InstructionSpec::new("bge", B, i_op::OP_BRANCH, Some(i_f3::BGE), None),
    InstructionSpec::new("bltu", B, i_op::OP_BRANCH, Some(i_f3::BLTU), None),
    InstructionSpec::new("bgeu", B, i_op::OP_BRANCH, Some(i_f3::BGEU), None),
    // U-type
    InstructionSpec::new("lui", U, i_op::OP_LUI, None, None),
    InstructionSpec::new("auipc", U, i_op::OP_AUIPC, None, None),
    // J-type
    InstructionSpec::new("jal", J, i_op::OP_JAL, None, None),
    // Standalone
    InstructionSpec::new("ecall", Standalone, i_op::OP_SYSTEM, None, None),
];

/// Looks up a table row by mnemonic (already lowercase).
pub fn lookup_mnemonic(mnemonic: &str) -> Option<&'static InstructionSpec> {
    INSTRUCTIONS.iter().find(|s| s.mnemonic == mnemonic)
}

/// Classifies a raw word against the table.
///
/// Returns the unique matching row, or `None` for unclassifiable encodings.
pub fn lookup_encoding(word: u32) -> Option<&'static InstructionSpec> {
    INSTRUCTIONS.iter().find(|s| s.matches(word))
}
