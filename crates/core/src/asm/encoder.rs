//! Instruction encoder.
//!
//! Maps one parsed instruction (mnemonic + classified operands + assigned
//! address) and the symbol table to a 32-bit word following the RV32I/M
//! bit layouts. Operand shapes are validated per format; labels resolve to
//! PC-relative offsets for B and J formats and are rejected elsewhere;
//! immediates are range- and alignment-checked per format.

use crate::asm::parser::{Operand, ParsedInstruction, SymbolTable};
use crate::common::error::AsmError;
use crate::isa::abi;
use crate::isa::instruction::InstructionFormat;
use crate::isa::rv32i::opcodes as i_op;
use crate::isa::table::{self, InstructionSpec};

/// I/S-format immediate bounds.
const IMM12_MIN: i64 = -2048;
const IMM12_MAX: i64 = 2047;

/// B-format offset bounds (13-bit signed, bit 0 zero).
const B_OFF_MIN: i64 = -4096;
const B_OFF_MAX: i64 = 4094;

/// U-format immediate bounds (20-bit unsigned).
const U_IMM_MAX: i64 = 0xF_FFFF;

/// J-format offset bounds (21-bit signed, bit 0 zero).
const J_OFF_MIN: i64 = -1_048_576;
const J_OFF_MAX: i64 = 1_048_574;

/// Shift-amount bounds for `slli`/`srli`/`srai`.
const SHAMT_MAX: i64 = 31;

/// Encodes one parsed instruction to its 32-bit word.
///
/// # Errors
///
/// Returns the first diagnostic this instruction produces: unknown
/// mnemonic, wrong operand shape, invalid register, out-of-range or
/// misaligned immediate, or an unresolvable label.
pub fn encode(inst: &ParsedInstruction, symbols: &SymbolTable) -> Result<u32, AsmError> {
    let spec =
        table::lookup_mnemonic(&inst.mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
            line: inst.line,
            mnemonic: inst.mnemonic.clone(),
        })?;

    match spec.format {
        InstructionFormat::R => encode_r_type(inst, spec),
        InstructionFormat::I => encode_i_type(inst, spec),
        InstructionFormat::S => encode_s_type(inst, spec),
        InstructionFormat::B => encode_b_type(inst, spec, symbols),
        InstructionFormat::U => encode_u_type(inst, spec),
        InstructionFormat::J => encode_j_type(inst, spec, symbols),
        InstructionFormat::Standalone => {
            expect_arity(inst, 0)?;
            Ok(i_op::ECALL_WORD)
        }
    }
}

/// R format: `rd, rs1, rs2`.
fn encode_r_type(inst: &ParsedInstruction, spec: &InstructionSpec) -> Result<u32, AsmError> {
    expect_arity(inst, 3)?;
    let rd = register(inst, &inst.operands[0])?;
    let rs1 = register(inst, &inst.operands[1])?;
    let rs2 = register(inst, &inst.operands[2])?;

    Ok(spec.opcode
        | (rd << 7)
        | (spec.funct3.unwrap_or(0) << 12)
        | (rs1 << 15)
        | (rs2 << 20)
        | (spec.funct7.unwrap_or(0) << 25))
}

/// I format: `rd, rs1, imm` for arithmetic and `jalr`; `rd, imm(rs1)` for
/// loads. Shift immediates carry funct7 in bits 31:25.
fn encode_i_type(inst: &ParsedInstruction, spec: &InstructionSpec) -> Result<u32, AsmError> {
    let (rd, rs1, imm) = if spec.is_load() {
        expect_arity(inst, 2)?;
        let rd = register(inst, &inst.operands[0])?;
        let (offset, base) = memory_operand(inst, &inst.operands[1])?;
        (rd, base, offset)
    } else {
        expect_arity(inst, 3)?;
        let rd = register(inst, &inst.operands[0])?;
        let rs1 = register(inst, &inst.operands[1])?;
        let imm = immediate(inst, &inst.operands[2])?;
        (rd, rs1, imm)
    };

    let is_shift = spec.funct7.is_some() && spec.opcode == i_op::OP_IMM;
    let imm_bits = if is_shift {
        check_range(inst, imm, 0, SHAMT_MAX)?;
        (imm as u32 & 0x1F) | (spec.funct7.unwrap_or(0) << 5)
    } else {
        check_range(inst, imm, IMM12_MIN, IMM12_MAX)?;
        imm as u32 & 0xFFF
    };

    Ok(spec.opcode
        | (rd << 7)
        | (spec.funct3.unwrap_or(0) << 12)
        | (rs1 << 15)
        | (imm_bits << 20))
}

/// S format: `rs2, imm(rs1)`.
fn encode_s_type(inst: &ParsedInstruction, spec: &InstructionSpec) -> Result<u32, AsmError> {
    expect_arity(inst, 2)?;
    let rs2 = register(inst, &inst.operands[0])?;
    let (imm, rs1) = memory_operand(inst, &inst.operands[1])?;
    check_range(inst, imm, IMM12_MIN, IMM12_MAX)?;

    let v = imm as u32;
    Ok(spec.opcode
        | ((v & 0x1F) << 7)
        | (spec.funct3.unwrap_or(0) << 12)
        | (rs1 << 15)
        | (rs2 << 20)
        | (((v >> 5) & 0x7F) << 25))
}

/// B format: `rs1, rs2, label-or-offset`.
fn encode_b_type(
    inst: &ParsedInstruction,
    spec: &InstructionSpec,
    symbols: &SymbolTable,
) -> Result<u32, AsmError> {
    expect_arity(inst, 3)?;
    let rs1 = register(inst, &inst.operands[0])?;
    let rs2 = register(inst, &inst.operands[1])?;
    let offset = pc_relative(inst, &inst.operands[2], symbols)?;
    check_range(inst, offset, B_OFF_MIN, B_OFF_MAX)?;
    check_aligned(inst, offset)?;

    let v = offset as u32;
    Ok(spec.opcode
        | (((v >> 11) & 0x1) << 7)
        | (((v >> 1) & 0xF) << 8)
        | (spec.funct3.unwrap_or(0) << 12)
        | (rs1 << 15)
        | (rs2 << 20)
        | (((v >> 5) & 0x3F) << 25)
        | (((v >> 12) & 0x1) << 31))
}

/// U format: `rd, imm20`.
fn encode_u_type(inst: &ParsedInstruction, spec: &InstructionSpec) -> Result<u32, AsmError> {
    expect_arity(inst, 2)?;
    let rd = register(inst, &inst.operands[0])?;
    let imm = immediate(inst, &inst.operands[1])?;
    check_range(inst, imm, 0, U_IMM_MAX)?;

    Ok(spec.opcode | (rd << 7) | ((imm as u32 & 0xF_FFFF) << 12))
}

/// J format: `rd, label-or-offset`.
fn encode_j_type(
    inst: &ParsedInstruction,
    spec: &InstructionSpec,
    symbols: &SymbolTable,
) -> Result<u32, AsmError> {
    expect_arity(inst, 2)?;
    let rd = register(inst, &inst.operands[0])?;
    let offset = pc_relative(inst, &inst.operands[1], symbols)?;
    check_range(inst, offset, J_OFF_MIN, J_OFF_MAX)?;
    check_aligned(inst, offset)?;

    let v = offset as u32;
    Ok(spec.opcode
        | (rd << 7)
        | (((v >> 12) & 0xFF) << 12)
        | (((v >> 11) & 0x1) << 20)
        | (((v >> 1) & 0x3FF) << 21)
        | (((v >> 20) & 0x1) << 31))
}

/// Checks the operand count against the format's shape.
fn expect_arity(inst: &ParsedInstruction, expected: usize) -> Result<(), AsmError> {
    if inst.operands.len() == expected {
        Ok(())
    } else {
        Err(AsmError::WrongOperandCount {
            line: inst.line,
            mnemonic: inst.mnemonic.clone(),
            expected,
            got: inst.operands.len(),
        })
    }
}

/// Resolves a register operand to its index.
fn register(inst: &ParsedInstruction, op: &Operand) -> Result<u32, AsmError> {
    let Operand::Register(name) = op else {
        return Err(invalid_operand(inst, op));
    };
    abi::register_index(name)
        .map(|idx| idx as u32)
        .ok_or_else(|| AsmError::InvalidRegister {
            line: inst.line,
            register: name.clone(),
        })
}

/// Extracts an immediate operand; labels are rejected here.
fn immediate(inst: &ParsedInstruction, op: &Operand) -> Result<i64, AsmError> {
    match op {
        Operand::Immediate(v) => Ok(*v),
        Operand::Label(name) => Err(AsmError::LabelNotAllowed {
            line: inst.line,
            label: name.clone(),
        }),
        _ => Err(invalid_operand(inst, op)),
    }
}

/// Extracts a memory operand as (offset, base register index).
fn memory_operand(inst: &ParsedInstruction, op: &Operand) -> Result<(i64, u32), AsmError> {
    let Operand::Memory { offset, base } = op else {
        return Err(invalid_operand(inst, op));
    };
    let base_idx = abi::register_index(base)
        .map(|idx| idx as u32)
        .ok_or_else(|| AsmError::InvalidRegister {
            line: inst.line,
            register: base.clone(),
        })?;
    Ok((*offset, base_idx))
}

/// Resolves a B/J target operand to a PC-relative offset: a label looks up
/// the symbol table and subtracts the instruction's own address; a literal
/// immediate is the offset itself.
fn pc_relative(
    inst: &ParsedInstruction,
    op: &Operand,
    symbols: &SymbolTable,
) -> Result<i64, AsmError> {
    match op {
        Operand::Immediate(v) => Ok(*v),
        Operand::Label(name) => {
            let symbol = symbols.get(name).ok_or_else(|| AsmError::UnknownLabel {
                line: inst.line,
                label: name.clone(),
            })?;
            Ok(i64::from(symbol.address()) - i64::from(inst.address))
        }
        _ => Err(invalid_operand(inst, op)),
    }
}

/// Range check shared by all immediate shapes.
fn check_range(inst: &ParsedInstruction, value: i64, min: i64, max: i64) -> Result<(), AsmError> {
    if value < min || value > max {
        return Err(AsmError::ImmediateOutOfRange {
            line: inst.line,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Bit 0 of a branch or jump offset must be zero.
fn check_aligned(inst: &ParsedInstruction, offset: i64) -> Result<(), AsmError> {
    if offset & 1 != 0 {
        return Err(AsmError::MisalignedTarget {
            line: inst.line,
            offset,
        });
    }
    Ok(())
}

/// Renders the common wrong-kind diagnostic.
fn invalid_operand(inst: &ParsedInstruction, op: &Operand) -> AsmError {
    let text = match op {
        Operand::Register(s) | Operand::Label(s) => s.clone(),
        Operand::Immediate(v) => v.to_string(),
        Operand::Memory { offset, base } => format!("{offset}({base})"),
    };
    AsmError::InvalidOperand {
        line: inst.line,
        mnemonic: inst.mnemonic.clone(),
        operand: text,
    }
}
