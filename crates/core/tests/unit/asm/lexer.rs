//! Lexer tests.

use rvpipe_core::asm::lexer::{TokenKind, parse_immediate, tokenize};

// ══════════════════════════════════════════════════════════
// 1. Token classification
// ══════════════════════════════════════════════════════════

#[test]
fn classifies_instruction_line() {
    let lines = tokenize("addi x1, sp, -4").unwrap();
    assert_eq!(lines.len(), 1);
    let kinds: Vec<_> = lines[0].iter().map(|t| t.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Register,
            TokenKind::Register,
            TokenKind::Immediate(-4),
        ]
    );
}

#[test]
fn classifies_memory_operand() {
    let lines = tokenize("lw x2, 8(x1)").unwrap();
    assert_eq!(
        lines[0][2].kind,
        TokenKind::Memory {
            offset: 8,
            base: "x1".to_string()
        }
    );
}

#[test]
fn memory_operand_with_empty_offset() {
    let lines = tokenize("lw x2, (sp)").unwrap();
    assert_eq!(
        lines[0][2].kind,
        TokenKind::Memory {
            offset: 0,
            base: "sp".to_string()
        }
    );
}

#[test]
fn classifies_label_definition() {
    let lines = tokenize("loop: addi x1, x1, 1").unwrap();
    assert_eq!(lines[0][0].kind, TokenKind::LabelDef);
    assert_eq!(lines[0][0].text, "loop");
}

#[test]
fn classifies_directive_and_string() {
    let lines = tokenize(".data\nmsg: .asciz \"hi there\"").unwrap();
    assert_eq!(lines[0][0].kind, TokenKind::Directive);
    assert_eq!(lines[1][2].kind, TokenKind::Str("hi there".to_string()));
}

// ══════════════════════════════════════════════════════════
// 2. Comments and blank lines
// ══════════════════════════════════════════════════════════

#[test]
fn strips_comments_and_blanks() {
    let source = "# full comment line\n\naddi x1, x0, 1 # trailing\n";
    let lines = tokenize(source).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].len(), 4);
}

#[test]
fn line_numbers_survive_blank_lines() {
    let lines = tokenize("\n\naddi x1, x0, 1").unwrap();
    assert_eq!(lines[0][0].line, 3);
}

// ══════════════════════════════════════════════════════════
// 3. Immediate literals
// ══════════════════════════════════════════════════════════

#[test]
fn immediate_radixes() {
    assert_eq!(parse_immediate("42"), Some(42));
    assert_eq!(parse_immediate("-42"), Some(-42));
    assert_eq!(parse_immediate("0x2A"), Some(42));
    assert_eq!(parse_immediate("0b101010"), Some(42));
    assert_eq!(parse_immediate("-0x10"), Some(-16));
    assert_eq!(parse_immediate("abc"), None);
    assert_eq!(parse_immediate(""), None);
}

// ══════════════════════════════════════════════════════════
// 4. Errors
// ══════════════════════════════════════════════════════════

#[test]
fn unterminated_string_is_an_error() {
    let errors = tokenize(".data\nmsg: .asciz \"oops").unwrap_err();
    assert_eq!(errors.len(), 1);
}
