//! Machine-code artifact tests.
//!
//! Rendering, the sentinel line, and the loader round-trip — including
//! through a real file on disk.

use pretty_assertions::assert_eq;

use rvpipe_core::asm::program::assemble;
use rvpipe_core::common::error::SimError;
use rvpipe_core::sim::loader::parse_artifact;

const SOURCE: &str = "\
.data
vals: .word 0x11223344
.text
addi x1,x0,5
addi x2,x0,7
add x3,x1,x2
ecall
";

// ══════════════════════════════════════════════════════════
// 1. Rendering
// ══════════════════════════════════════════════════════════

#[test]
fn renders_text_with_disassembly_and_sentinel() {
    let machine = assemble(SOURCE).unwrap();
    let rendered = machine.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "# ---------------- TEXT SEGMENT ---------------- #");
    assert_eq!(lines[1], "0x00000000 0x00500093 , addi x1,x0,5");
    assert_eq!(lines[4], "0x0000000c 0x00000073 , ecall");
    assert_eq!(lines[5], "0x00000010 0x00000000 , <END_OF_TEXT>");
    assert!(rendered.contains("0x10000000 0x44"));
    assert!(rendered.contains("0x10000003 0x11"));
}

#[test]
fn empty_text_renders_no_sentinel() {
    let machine = assemble(".data\nv: .byte 1").unwrap();
    assert!(!machine.render().contains("<END_OF_TEXT>"));
}

// ══════════════════════════════════════════════════════════
// 2. Loader round-trip
// ══════════════════════════════════════════════════════════

#[test]
fn loader_reads_back_rendered_artifact() {
    let machine = assemble(SOURCE).unwrap();
    let parsed = parse_artifact(&machine.render()).unwrap();

    let words: Vec<(u32, u32)> = parsed.text.iter().map(|e| (e.address, e.word)).collect();
    let expected: Vec<(u32, u32)> = machine.text.iter().map(|e| (e.address, e.word)).collect();
    assert_eq!(words, expected, "text words survive the round-trip");
    assert_eq!(parsed.data, machine.data, "data bytes survive the round-trip");
}

#[test]
fn loader_round_trips_through_a_file() {
    let machine = assemble(SOURCE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("program.mc");
    std::fs::write(&path, machine.render()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed = parse_artifact(&contents).unwrap();
    assert_eq!(parsed.text.len(), 4);
    assert_eq!(parsed.data.len(), 4);
}

// ══════════════════════════════════════════════════════════
// 3. Malformed artifacts
// ══════════════════════════════════════════════════════════

#[test]
fn loader_rejects_missing_hex_prefix() {
    let err = parse_artifact("00000000 0x00000013 , addi x0,x0,0").unwrap_err();
    assert!(matches!(err, SimError::ArtifactFormat { line: 1, .. }));
}

#[test]
fn loader_rejects_wide_data_byte() {
    let err = parse_artifact("0x10000000 0x1ff").unwrap_err();
    assert!(matches!(err, SimError::ArtifactFormat { .. }));
}

#[test]
fn loader_skips_comments_and_sentinel() {
    let artifact = "# header\n0x00000000 0x00000073 , ecall\n0x00000004 0x00000000 , <END_OF_TEXT>\n";
    let parsed = parse_artifact(artifact).unwrap();
    assert_eq!(parsed.text.len(), 1);
}
