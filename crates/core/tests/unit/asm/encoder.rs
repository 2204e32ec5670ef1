//! Encoder tests.
//!
//! Bit-exact encodings, operand-shape rejection, label resolution, and the
//! branch/jump offset boundaries.

use rstest::rstest;

use rvpipe_core::asm::program::assemble;
use rvpipe_core::common::error::AsmError;

fn encode_line(line: &str) -> u32 {
    assemble(line).unwrap().text[0].word
}

fn first_error(source: &str) -> AsmError {
    assemble(source).unwrap_err().0.remove(0)
}

// ══════════════════════════════════════════════════════════
// 1. Known encodings
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("addi x1,x0,5", 0x00500093)]
#[case("add x3,x1,x2", 0x002081B3)]
#[case("sub x3,x1,x2", 0x402081B3)]
#[case("lw x2,0(x1)", 0x0000A103)]
#[case("sw x2,4(x1)", 0x0020A223)]
#[case("lui x1,0x12345", 0x123450B7)]
#[case("jal x1,8", 0x008000EF)]
#[case("ecall", 0x00000073)]
fn encodes_known_words(#[case] line: &str, #[case] expected: u32) {
    assert_eq!(encode_line(line), expected, "encoding of '{line}'");
}

#[test]
fn abi_aliases_and_case_are_accepted() {
    assert_eq!(encode_line("add x3,x1,x2"), encode_line("ADD gp, ra, sp"));
}

// ══════════════════════════════════════════════════════════
// 2. Label resolution
// ══════════════════════════════════════════════════════════

#[test]
fn branch_label_resolves_pc_relative() {
    // beq at address 4 targets the label at address 12: offset +8.
    let machine = assemble("addi x1,x0,1\nbeq x1,x0,done\naddi x2,x0,2\ndone: ecall").unwrap();
    assert_eq!(machine.text[1].word, encode_line("beq x1,x0,8"));
}

#[test]
fn backward_branch_offset_is_negative() {
    let machine = assemble("loop: addi x1,x1,1\nbne x1,x0,loop").unwrap();
    assert_eq!(machine.text[1].word, encode_line("bne x1,x0,-4"));
}

#[test]
fn jal_label_resolves() {
    let machine = assemble("jal x1,skip\naddi x2,x0,1\nskip: ecall").unwrap();
    assert_eq!(machine.text[0].word, encode_line("jal x1,8"));
}

#[test]
fn unknown_label_is_reported() {
    assert!(matches!(
        first_error("beq x1,x0,nowhere"),
        AsmError::UnknownLabel { line: 1, .. }
    ));
}

#[test]
fn label_rejected_outside_branch_and_jump() {
    assert!(matches!(
        first_error("x: addi x1,x0,x"),
        AsmError::LabelNotAllowed { .. }
    ));
}

// ══════════════════════════════════════════════════════════
// 3. Operand shapes
// ══════════════════════════════════════════════════════════

#[test]
fn wrong_arity_is_reported() {
    assert!(matches!(
        first_error("add x1,x2"),
        AsmError::WrongOperandCount {
            expected: 3,
            got: 2,
            ..
        }
    ));
}

#[test]
fn unknown_mnemonic_is_reported() {
    assert!(matches!(
        first_error("fmadd x1,x2,x3"),
        AsmError::UnknownMnemonic { .. }
    ));
}

#[test]
fn load_requires_memory_operand() {
    assert!(matches!(
        first_error("lw x1,x2"),
        AsmError::InvalidOperand { .. }
    ));
    assert!(matches!(
        first_error("lw x1,x2,4"),
        AsmError::WrongOperandCount { expected: 2, .. }
    ));
}

#[test]
fn all_errors_are_collected() {
    let errors = assemble("add x1,x2\nbogus x1\nbeq x1,x0,nowhere").unwrap_err();
    assert_eq!(errors.len(), 3);
}

// ══════════════════════════════════════════════════════════
// 4. Immediate boundaries
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("addi x1,x0,2047", true)]
#[case("addi x1,x0,-2048", true)]
#[case("addi x1,x0,2048", false)]
#[case("addi x1,x0,-2049", false)]
#[case("slli x1,x1,31", true)]
#[case("slli x1,x1,32", false)]
#[case("lui x1,0xfffff", true)]
#[case("lui x1,0x100000", false)]
#[case("lui x1,-1", false)]
fn immediate_ranges(#[case] line: &str, #[case] ok: bool) {
    assert_eq!(assemble(line).is_ok(), ok, "range check for '{line}'");
}

// Branch offsets: 13-bit signed, bit 0 zero.
#[rstest]
#[case(-4096, true)]
#[case(4094, true)]
#[case(4098, false)]
#[case(-4098, false)]
#[case(3, false)]
fn branch_offset_boundaries(#[case] offset: i32, #[case] ok: bool) {
    let source = format!("beq x1,x2,{offset}");
    assert_eq!(assemble(&source).is_ok(), ok, "branch offset {offset}");
}

// Jump offsets: 21-bit signed, bit 0 zero.
#[rstest]
#[case(1_048_574, true)]
#[case(-1_048_574, true)]
#[case(1_048_576, false)]
#[case(-1_048_578, false)]
#[case(7, false)]
fn jump_offset_boundaries(#[case] offset: i32, #[case] ok: bool) {
    let source = format!("jal x1,{offset}");
    assert_eq!(assemble(&source).is_ok(), ok, "jump offset {offset}");
}

#[test]
fn invalid_register_is_reported() {
    assert!(matches!(
        first_error("add x1,x2,x32"),
        AsmError::InvalidOperand { .. } | AsmError::InvalidRegister { .. }
    ));
}
