//! RISC-V M-extension opcode constants.
//!
//! M-extension instructions share the R-type major opcode (`OP_REG`) and are
//! selected by a dedicated funct7 value.

/// The funct7 value marking an M-extension operation.
pub const M_EXTENSION: u32 = 0b0000001;
