//! RISC-V Integer Multiply/Divide (M) extension definitions.

/// Major opcode and extension funct7 value.
pub mod opcodes;

/// Function codes (bits 14-12).
pub mod funct3;
