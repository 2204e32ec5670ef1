//! RISC-V Instruction Decoder.
//!
//! Handles the decoding of 32-bit instruction encodings into a structured
//! [`Decoded`] record. It classifies the word against the instruction table,
//! extracts register and function fields, and sign-extends immediate values
//! for all instruction formats (R, I, S, B, U, J).

use crate::common::error::SimError;
use crate::isa::instruction::{Decoded, InstructionBits, InstructionFormat};
use crate::isa::table;

/// Total width of an instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

/// Bit shift for extracting the I-Type immediate field (bits 20-31).
const I_IMM_SHIFT: u32 = 20;

/// Bit mask for the U-Type immediate field (bits 12-31).
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// Total number of bits in the S-Type immediate.
const S_IMM_BITS: u32 = 12;

/// Total number of bits in the B-Type immediate.
const B_IMM_BITS: u32 = 13;

/// Total number of bits in the J-Type immediate.
const J_IMM_BITS: u32 = 21;

/// Decodes a 32-bit word into its component fields.
///
/// # Errors
///
/// Returns [`SimError::UnknownInstruction`] when the word matches no row of
/// the instruction table. The simulator surfaces this as a fatal fetch error.
pub fn decode(word: u32) -> Result<Decoded, SimError> {
    let spec = table::lookup_encoding(word).ok_or(SimError::UnknownInstruction { word })?;

    let imm = match spec.format {
        InstructionFormat::I => decode_i_type_imm(word),
        InstructionFormat::S => decode_s_type_imm(word),
        InstructionFormat::B => decode_b_type_imm(word),
        InstructionFormat::U => decode_u_type_imm(word),
        InstructionFormat::J => decode_j_type_imm(word),
        InstructionFormat::R | InstructionFormat::Standalone => 0,
    };

    Ok(Decoded {
        raw: word,
        spec,
        rd: word.rd(),
        rs1: word.rs1(),
        rs2: word.rs2(),
        funct3: word.funct3(),
        funct7: word.funct7(),
        imm,
    })
}

/// Decodes the immediate value for I-Type instructions.
///
/// I-Type format: `imm[11:0] | rs1 | funct3 | rd | opcode`.
fn decode_i_type_imm(word: u32) -> i32 {
    (word as i32) >> I_IMM_SHIFT
}

/// Decodes the immediate value for S-Type instructions.
///
/// S-Type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`.
fn decode_s_type_imm(word: u32) -> i32 {
    let low = (word >> 7) & 0x1F;
    let high = (word >> 25) & 0x7F;
    sign_extend((high << 5) | low, S_IMM_BITS)
}

/// Decodes the immediate value for B-Type instructions.
///
/// B-Type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] |
/// imm[11] | opcode`. The immediate is an even PC-relative offset.
fn decode_b_type_imm(word: u32) -> i32 {
    let bit_11 = (word >> 7) & 0x1;
    let bits_4_1 = (word >> 8) & 0xF;
    let bits_10_5 = (word >> 25) & 0x3F;
    let bit_12 = (word >> 31) & 0x1;

    let combined = (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1);
    sign_extend(combined, B_IMM_BITS)
}

/// Decodes the immediate value for U-Type instructions.
///
/// U-Type format: `imm[31:12] | rd | opcode`. The value keeps its placement
/// at bits 31:12; the low 12 bits are zero.
fn decode_u_type_imm(word: u32) -> i32 {
    (word & U_IMM_MASK) as i32
}

/// Decodes the immediate value for J-Type instructions.
///
/// J-Type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`.
/// The immediate is an even PC-relative offset.
fn decode_j_type_imm(word: u32) -> i32 {
    let bits_19_12 = (word >> 12) & 0xFF;
    let bit_11 = (word >> 20) & 0x1;
    let bits_10_1 = (word >> 21) & 0x3FF;
    let bit_20 = (word >> 31) & 0x1;

    let combined = (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1);
    sign_extend(combined, J_IMM_BITS)
}

/// Sign extends a value of `bits` width to a 32-bit signed integer.
fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = INSTRUCTION_WIDTH - bits;
    ((val as i32) << shift) >> shift
}
