//! Instruction Disassembler.
//!
//! Converts a 32-bit instruction encoding into a human-readable mnemonic
//! string for artifact listings, debug tracing, and test diagnostics.
//!
//! Operands use the `xN` register spelling so that a disassembled line
//! re-assembles to the same word.
//!
//! # Usage
//!
//! ```
//! use rvpipe_core::isa::disasm::disassemble;
//! let text = disassemble(0x00A00513); // addi x10, x0, 10
//! assert_eq!(text, "addi x10,x0,10");
//! ```

use crate::isa::decode;
use crate::isa::instruction::InstructionFormat;

/// Disassembles a 32-bit word into a string like `"add x3,x1,x2"`.
///
/// Unrecognised encodings render as `"unknown (0x….)"`.
pub fn disassemble(word: u32) -> String {
    let Ok(d) = decode::decode(word) else {
        return format!("unknown ({word:#010x})");
    };
    let mn = d.spec.mnemonic;

    match d.spec.format {
        InstructionFormat::R => format!("{mn} x{},x{},x{}", d.rd, d.rs1, d.rs2),
        InstructionFormat::I => {
            if d.spec.is_load() {
                format!("{mn} x{},{}(x{})", d.rd, d.imm, d.rs1)
            } else {
                format!("{mn} x{},x{},{}", d.rd, d.rs1, shift_normalised(mn, d.imm))
            }
        }
        InstructionFormat::S => format!("{mn} x{},{}(x{})", d.rs2, d.imm, d.rs1),
        InstructionFormat::B => format!("{mn} x{},x{},{}", d.rs1, d.rs2, d.imm),
        InstructionFormat::U => format!("{mn} x{},{:#x}", d.rd, (d.imm as u32) >> 12),
        InstructionFormat::J => format!("{mn} x{},{}", d.rd, d.imm),
        InstructionFormat::Standalone => mn.to_string(),
    }
}

/// Shift immediates carry funct7 in their upper bits; render the shamt only.
fn shift_normalised(mnemonic: &str, imm: i32) -> i32 {
    match mnemonic {
        "slli" | "srli" | "srai" => imm & 0x1F,
        _ => imm,
    }
}
