//! ALU tests.
//!
//! Wrapping arithmetic, shift masking, signed/unsigned compares, and the
//! div/rem fatal and overflow cases.

use rvpipe_core::common::error::SimError;
use rvpipe_core::core::units::alu::{branch_taken, immediate_op, register_op};
use rvpipe_core::isa::rv32i::{funct3 as f3, funct7 as f7};
use rvpipe_core::isa::rv32m::{funct3 as m_f3, opcodes as m_op};

// ══════════════════════════════════════════════════════════
// 1. Base integer ops
// ══════════════════════════════════════════════════════════

#[test]
fn add_and_sub_wrap() {
    assert_eq!(register_op(f3::ADD_SUB, f7::DEFAULT, u32::MAX, 1, 0).unwrap(), 0);
    assert_eq!(register_op(f3::ADD_SUB, f7::SUB, 0, 1, 0).unwrap(), u32::MAX);
}

#[test]
fn shifts_use_low_five_bits() {
    assert_eq!(register_op(f3::SLL, f7::DEFAULT, 1, 33, 0).unwrap(), 2);
    assert_eq!(register_op(f3::SRL_SRA, f7::DEFAULT, 0x8000_0000, 31, 0).unwrap(), 1);
    assert_eq!(
        register_op(f3::SRL_SRA, f7::SRA, 0x8000_0000, 31, 0).unwrap(),
        u32::MAX
    );
}

#[test]
fn signed_and_unsigned_compare() {
    let minus_one = u32::MAX;
    assert_eq!(register_op(f3::SLT, f7::DEFAULT, minus_one, 0, 0).unwrap(), 1);
    assert_eq!(register_op(f3::SLTU, f7::DEFAULT, minus_one, 0, 0).unwrap(), 0);
}

#[test]
fn immediate_ops_match_register_ops() {
    assert_eq!(immediate_op(f3::ADD_SUB, 40, 2), 42);
    assert_eq!(immediate_op(f3::AND, 0b1100, 0b1010), 0b1000);
    assert_eq!(immediate_op(f3::OR, 0b1100, 0b1010), 0b1110);
    assert_eq!(immediate_op(f3::XOR, 0b1100, 0b1010), 0b0110);
}

#[test]
fn srai_immediate_selects_arithmetic_shift() {
    // srai encodes funct7 0b0100000 in the immediate's upper bits.
    let imm = (f7::SRA << 5) | 4;
    assert_eq!(immediate_op(f3::SRL_SRA, 0x8000_0000, imm), 0xF800_0000);
    assert_eq!(immediate_op(f3::SRL_SRA, 0x8000_0000, 4), 0x0800_0000);
}

// ══════════════════════════════════════════════════════════
// 2. M extension
// ══════════════════════════════════════════════════════════

#[test]
fn mul_wraps() {
    assert_eq!(
        register_op(m_f3::MUL, m_op::M_EXTENSION, 0x8000_0000, 2, 0).unwrap(),
        0
    );
}

#[test]
fn div_and_rem_are_signed() {
    let minus_seven = (-7i32) as u32;
    assert_eq!(
        register_op(m_f3::DIV, m_op::M_EXTENSION, minus_seven, 2, 0).unwrap(),
        (-3i32) as u32
    );
    assert_eq!(
        register_op(m_f3::REM, m_op::M_EXTENSION, minus_seven, 2, 0).unwrap(),
        (-1i32) as u32
    );
}

#[test]
fn division_by_zero_is_fatal() {
    assert!(matches!(
        register_op(m_f3::DIV, m_op::M_EXTENSION, 1, 0, 0x40),
        Err(SimError::DivisionByZero { pc: 0x40 })
    ));
    assert!(matches!(
        register_op(m_f3::REM, m_op::M_EXTENSION, 1, 0, 0x44),
        Err(SimError::RemainderByZero { pc: 0x44 })
    ));
}

#[test]
fn div_overflow_wraps_to_dividend() {
    let min = i32::MIN as u32;
    let minus_one = u32::MAX;
    assert_eq!(
        register_op(m_f3::DIV, m_op::M_EXTENSION, min, minus_one, 0).unwrap(),
        min
    );
    assert_eq!(
        register_op(m_f3::REM, m_op::M_EXTENSION, min, minus_one, 0).unwrap(),
        0
    );
}

// ══════════════════════════════════════════════════════════
// 3. Branch conditions
// ══════════════════════════════════════════════════════════

#[test]
fn branch_conditions() {
    let minus_one = u32::MAX;
    assert!(branch_taken(f3::BEQ, 5, 5));
    assert!(branch_taken(f3::BNE, 5, 6));
    assert!(branch_taken(f3::BLT, minus_one, 0));
    assert!(!branch_taken(f3::BLTU, minus_one, 0));
    assert!(branch_taken(f3::BGE, 0, minus_one));
    assert!(branch_taken(f3::BGEU, minus_one, 0));
}
