//! RISC-V Base Integer (I) Function Codes (funct7).
//!
//! The `funct7` field (bits 31-25) distinguishes between standard and
//! alternate encodings that share an opcode and funct3 (ADD vs SUB,
//! SRL vs SRA).

/// Default function code for most R-type operations.
pub const DEFAULT: u32 = 0b0000000;

/// Alternate function code selecting SUB (with funct3 `ADD_SUB`).
pub const SUB: u32 = 0b0100000;

/// Alternate function code selecting SRA / SRAI (with funct3 `SRL_SRA`).
pub const SRA: u32 = 0b0100000;
