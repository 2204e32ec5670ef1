//! Instruction table tests.
//!
//! Verifies mnemonic lookup, encoding classification, and the rejection of
//! unclassifiable words.

use rvpipe_core::isa::instruction::InstructionFormat;
use rvpipe_core::isa::table::{lookup_encoding, lookup_mnemonic};

// ══════════════════════════════════════════════════════════
// 1. Mnemonic lookup
// ══════════════════════════════════════════════════════════

#[test]
fn every_mnemonic_resolves() {
    for mn in [
        "add", "sub", "mul", "div", "rem", "and", "or", "xor", "sll", "srl", "sra", "slt", "sltu",
        "addi", "andi", "ori", "xori", "slti", "sltiu", "slli", "srli", "srai", "lb", "lh", "lw",
        "lbu", "lhu", "jalr", "sb", "sh", "sw", "beq", "bne", "blt", "bge", "bltu", "bgeu", "lui",
        "auipc", "jal", "ecall",
    ] {
        assert!(lookup_mnemonic(mn).is_some(), "missing mnemonic {mn}");
    }
}

#[test]
fn unknown_mnemonic_is_rejected() {
    assert!(lookup_mnemonic("fadd").is_none());
    assert!(lookup_mnemonic("ld").is_none());
    assert!(lookup_mnemonic("csrrw").is_none());
}

// ══════════════════════════════════════════════════════════
// 2. Encoding classification
// ══════════════════════════════════════════════════════════

#[test]
fn classify_add_and_sub() {
    // add x1, x2, x3 / sub x1, x2, x3
    let add = 0x003100B3;
    let sub = 0x403100B3;
    assert_eq!(lookup_encoding(add).unwrap().mnemonic, "add");
    assert_eq!(lookup_encoding(sub).unwrap().mnemonic, "sub");
}

#[test]
fn classify_m_extension() {
    // mul x5, x6, x7
    let mul = 0x027302B3;
    let spec = lookup_encoding(mul).unwrap();
    assert_eq!(spec.mnemonic, "mul");
    assert_eq!(spec.format, InstructionFormat::R);
}

#[test]
fn classify_ecall() {
    let spec = lookup_encoding(0x0000_0073).unwrap();
    assert_eq!(spec.mnemonic, "ecall");
    assert_eq!(spec.format, InstructionFormat::Standalone);
}

#[test]
fn reject_unknown_opcode() {
    assert!(lookup_encoding(0xFFFF_FFFF).is_none());
    assert!(lookup_encoding(0x0000_0000).is_none());
}

#[test]
fn reject_bad_shift_funct7() {
    // slli with funct7 = 0x15 is not a valid encoding.
    let bad = (0x15 << 25) | (1 << 20) | (1 << 15) | (0b001 << 12) | (1 << 7) | 0b0010011;
    assert!(lookup_encoding(bad).is_none());
}

#[test]
fn reject_ecall_with_nonzero_fields() {
    // Any bit outside the ECALL pattern makes the word unclassifiable.
    assert!(lookup_encoding(0x0010_0073).is_none());
}
