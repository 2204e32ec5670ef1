//! Encode/decode round-trip properties.
//!
//! For every format, assembling an instruction and decoding the resulting
//! word yields the original fields (modulo signed-immediate normalisation).

use proptest::prelude::*;

use rvpipe_core::asm::program::assemble;
use rvpipe_core::isa::decode::decode;
use rvpipe_core::isa::instruction::InstructionFormat;

/// Assembles a one-line program and returns its single text word.
fn encode_line(line: &str) -> u32 {
    let machine = assemble(line).unwrap_or_else(|e| panic!("'{line}' failed: {e}"));
    assert_eq!(machine.text.len(), 1, "'{line}' should emit one word");
    machine.text[0].word
}

proptest! {
    #[test]
    fn r_type_roundtrip(
        mn in prop::sample::select(vec![
            "add", "sub", "and", "or", "xor", "sll", "srl", "sra",
            "slt", "sltu", "mul", "div", "rem",
        ]),
        rd in 0usize..32,
        rs1 in 0usize..32,
        rs2 in 0usize..32,
    ) {
        let word = encode_line(&format!("{mn} x{rd},x{rs1},x{rs2}"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, mn);
        prop_assert_eq!(d.spec.format, InstructionFormat::R);
        prop_assert_eq!(d.rd, rd);
        prop_assert_eq!(d.rs1, rs1);
        prop_assert_eq!(d.rs2, rs2);
    }

    #[test]
    fn i_arith_roundtrip(
        mn in prop::sample::select(vec!["addi", "andi", "ori", "xori", "slti", "sltiu"]),
        rd in 0usize..32,
        rs1 in 0usize..32,
        imm in -2048i32..=2047,
    ) {
        let word = encode_line(&format!("{mn} x{rd},x{rs1},{imm}"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, mn);
        prop_assert_eq!(d.rd, rd);
        prop_assert_eq!(d.rs1, rs1);
        prop_assert_eq!(d.imm, imm);
    }

    #[test]
    fn shift_roundtrip(
        mn in prop::sample::select(vec!["slli", "srli", "srai"]),
        rd in 0usize..32,
        rs1 in 0usize..32,
        shamt in 0i32..=31,
    ) {
        let word = encode_line(&format!("{mn} x{rd},x{rs1},{shamt}"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, mn);
        prop_assert_eq!(d.imm & 0x1F, shamt);
    }

    #[test]
    fn load_roundtrip(
        mn in prop::sample::select(vec!["lb", "lh", "lw", "lbu", "lhu"]),
        rd in 0usize..32,
        rs1 in 0usize..32,
        offset in -2048i32..=2047,
    ) {
        let word = encode_line(&format!("{mn} x{rd},{offset}(x{rs1})"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, mn);
        prop_assert_eq!(d.rd, rd);
        prop_assert_eq!(d.rs1, rs1);
        prop_assert_eq!(d.imm, offset);
    }

    #[test]
    fn store_roundtrip(
        mn in prop::sample::select(vec!["sb", "sh", "sw"]),
        rs2 in 0usize..32,
        rs1 in 0usize..32,
        offset in -2048i32..=2047,
    ) {
        let word = encode_line(&format!("{mn} x{rs2},{offset}(x{rs1})"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, mn);
        prop_assert_eq!(d.spec.format, InstructionFormat::S);
        prop_assert_eq!(d.rs1, rs1);
        prop_assert_eq!(d.rs2, rs2);
        prop_assert_eq!(d.imm, offset);
    }

    #[test]
    fn branch_roundtrip(
        mn in prop::sample::select(vec!["beq", "bne", "blt", "bge", "bltu", "bgeu"]),
        rs1 in 0usize..32,
        rs2 in 0usize..32,
        halfwords in -2048i32..=2047,
    ) {
        let offset = halfwords * 2;
        let word = encode_line(&format!("{mn} x{rs1},x{rs2},{offset}"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, mn);
        prop_assert_eq!(d.spec.format, InstructionFormat::B);
        prop_assert_eq!(d.rs1, rs1);
        prop_assert_eq!(d.rs2, rs2);
        prop_assert_eq!(d.imm, offset);
    }

    #[test]
    fn upper_roundtrip(
        mn in prop::sample::select(vec!["lui", "auipc"]),
        rd in 0usize..32,
        imm20 in 0i64..=0xF_FFFF,
    ) {
        let word = encode_line(&format!("{mn} x{rd},{imm20}"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, mn);
        prop_assert_eq!(d.rd, rd);
        prop_assert_eq!((d.imm as u32) >> 12, imm20 as u32);
        prop_assert_eq!(d.imm as u32 & 0xFFF, 0);
    }

    #[test]
    fn jal_roundtrip(
        rd in 0usize..32,
        halfwords in -524_287i32..=524_287,
    ) {
        let offset = halfwords * 2;
        let word = encode_line(&format!("jal x{rd},{offset}"));
        let d = decode(word).unwrap();
        prop_assert_eq!(d.spec.mnemonic, "jal");
        prop_assert_eq!(d.rd, rd);
        prop_assert_eq!(d.imm, offset);
    }
}

#[test]
fn ecall_roundtrip() {
    let word = encode_line("ecall");
    assert_eq!(word, 0x0000_0073);
    let d = decode(word).unwrap();
    assert_eq!(d.spec.mnemonic, "ecall");
}

#[test]
fn jalr_roundtrip() {
    let word = encode_line("jalr x1,x5,-16");
    let d = decode(word).unwrap();
    assert_eq!(d.spec.mnemonic, "jalr");
    assert_eq!(d.rd, 1);
    assert_eq!(d.rs1, 5);
    assert_eq!(d.imm, -16);
}
