//! Disassembler tests.
//!
//! Verifies the listing text and the assemble ∘ disassemble round-trip:
//! disassembling a word and re-assembling the text reproduces the word.

use pretty_assertions::assert_eq;

use rvpipe_core::asm::program::assemble;
use rvpipe_core::isa::disasm::disassemble;

/// Assembles one line and returns its word.
fn encode_line(line: &str) -> u32 {
    assemble(line).unwrap().text[0].word
}

// ══════════════════════════════════════════════════════════
// 1. Listing text
// ══════════════════════════════════════════════════════════

#[test]
fn r_type_text() {
    assert_eq!(disassemble(encode_line("add x3,x1,x2")), "add x3,x1,x2");
    assert_eq!(disassemble(encode_line("sub x3,x1,x2")), "sub x3,x1,x2");
    assert_eq!(disassemble(encode_line("mul x3,x1,x2")), "mul x3,x1,x2");
}

#[test]
fn i_type_text() {
    assert_eq!(disassemble(encode_line("addi x1,x0,5")), "addi x1,x0,5");
    assert_eq!(disassemble(encode_line("addi x1,x0,-5")), "addi x1,x0,-5");
    assert_eq!(disassemble(encode_line("srai x1,x2,3")), "srai x1,x2,3");
}

#[test]
fn memory_text() {
    assert_eq!(disassemble(encode_line("lw x2,8(x1)")), "lw x2,8(x1)");
    assert_eq!(disassemble(encode_line("sb x2,-1(x1)")), "sb x2,-1(x1)");
}

#[test]
fn control_text() {
    assert_eq!(disassemble(encode_line("beq x1,x2,-8")), "beq x1,x2,-8");
    assert_eq!(disassemble(encode_line("jal x1,16")), "jal x1,16");
    assert_eq!(disassemble(encode_line("jalr x1,x5,0")), "jalr x1,x5,0");
}

#[test]
fn upper_and_system_text() {
    assert_eq!(disassemble(encode_line("lui x1,0x12345")), "lui x1,0x12345");
    assert_eq!(disassemble(encode_line("ecall")), "ecall");
}

#[test]
fn unknown_word_text() {
    assert_eq!(disassemble(0xFFFF_FFFF), "unknown (0xffffffff)");
}

// ══════════════════════════════════════════════════════════
// 2. Assemble ∘ disassemble round-trip
// ══════════════════════════════════════════════════════════

#[test]
fn reassembling_listing_reproduces_words() {
    let lines = [
        "add x3,x1,x2",
        "sub x0,x31,x15",
        "sltu x4,x5,x6",
        "rem x7,x8,x9",
        "addi x1,x0,-2048",
        "sltiu x2,x3,2047",
        "slli x4,x5,31",
        "lw x2,0(x1)",
        "lbu x3,-128(x2)",
        "sw x2,4(x1)",
        "sh x9,-2(x8)",
        "bne x1,x2,64",
        "bgeu x3,x4,-4096",
        "lui x1,0xfffff",
        "auipc x2,0x1",
        "jal x1,-1048574",
        "jalr x0,x1,0",
        "ecall",
    ];
    for line in lines {
        let word = encode_line(line);
        let listing = disassemble(word);
        let reassembled = encode_line(&listing);
        assert_eq!(reassembled, word, "round-trip failed for '{line}' → '{listing}'");
    }
}
