//! Two-pass assembly parser.
//!
//! Pass 1 walks the token lines to assign addresses (text section stepping
//! one instruction word at a time, data section stepping by directive
//! width), to define labels, and to materialise data bytes. Pass 2 walks
//! the text section again and produces the parsed instruction stream with
//! every label now resolvable by the encoder.
//!
//! A label in the text section binds to the following instruction's
//! address. Data labels record their directive kind alongside the address.

use std::collections::HashMap;

use crate::asm::lexer::{Token, TokenKind};
use crate::common::constants::{DATA_BASE, INSTRUCTION_SIZE, TEXT_BASE};
use crate::common::error::AsmError;

/// A classified instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A register name, still in source spelling (`x5`, `sp`).
    Register(String),
    /// An integer immediate.
    Immediate(i64),
    /// A label use, resolved by the encoder.
    Label(String),
    /// A memory operand `offset(base)`.
    Memory {
        /// Byte offset.
        offset: i64,
        /// Base register name.
        base: String,
    },
}

/// One instruction of the parsed stream, with its assigned address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInstruction {
    /// Lowercase mnemonic.
    pub mnemonic: String,
    /// Classified operands in source order.
    pub operands: Vec<Operand>,
    /// The text-segment address this instruction is emitted at.
    pub address: u32,
    /// Source line number (1-based).
    pub line: usize,
}

/// The data directive kinds a label can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirective {
    /// `.byte` — 1 byte per value.
    Byte,
    /// `.half` — 2 bytes per value.
    Half,
    /// `.word` — 4 bytes per value.
    Word,
    /// `.dword` — 8 bytes per value.
    Dword,
    /// `.ascii` — string bytes, no terminator.
    Ascii,
    /// `.asciz` / `.asciiz` — string bytes plus a NUL terminator.
    Asciz,
}

impl DataDirective {
    /// Width in bytes of one numeric value (1 for string directives).
    pub fn width(self) -> u32 {
        match self {
            Self::Byte | Self::Ascii | Self::Asciz => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Dword => 8,
        }
    }

    /// Maps a directive token to its kind.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            ".byte" => Some(Self::Byte),
            ".half" => Some(Self::Half),
            ".word" => Some(Self::Word),
            ".dword" => Some(Self::Dword),
            ".ascii" => Some(Self::Ascii),
            ".asciz" | ".asciiz" => Some(Self::Asciz),
            _ => None,
        }
    }
}

/// A symbol table entry: a code label or a data label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// A label bound to a text-segment address.
    Code {
        /// The bound address.
        address: u32,
    },
    /// A label bound to a data entry.
    Data {
        /// The bound address.
        address: u32,
        /// The directive that reserved the bytes.
        directive: DataDirective,
    },
}

impl Symbol {
    /// The address the symbol resolves to.
    pub fn address(&self) -> u32 {
        match self {
            Self::Code { address } | Self::Data { address, .. } => *address,
        }
    }
}

/// Label name → symbol.
pub type SymbolTable = HashMap<String, Symbol>;

/// The parser's output: instruction stream, symbols, and data bytes.
#[derive(Debug, Clone, Default)]
pub struct ParsedProgram {
    /// Text-section instructions in emission order.
    pub instructions: Vec<ParsedInstruction>,
    /// All defined labels.
    pub symbols: SymbolTable,
    /// Data-segment bytes as (address, byte), in emission order.
    pub data: Vec<(u32, u8)>,
}

/// The active section while walking the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Text,
    Data,
}

/// Parses tokenized lines into a [`ParsedProgram`].
///
/// # Errors
///
/// Collects every diagnostic across both passes and returns them together;
/// a non-empty error list means no program is produced.
pub fn parse(lines: &[Vec<Token>]) -> Result<ParsedProgram, Vec<AsmError>> {
    let mut program = ParsedProgram::default();
    let mut errors = Vec::new();

    first_pass(lines, &mut program, &mut errors);
    second_pass(lines, &mut program, &mut errors);

    if errors.is_empty() { Ok(program) } else { Err(errors) }
}

/// Pass 1: addresses, labels, and data bytes.
fn first_pass(lines: &[Vec<Token>], program: &mut ParsedProgram, errors: &mut Vec<AsmError>) {
    let mut section = Section::Text;
    let mut text_addr = TEXT_BASE;
    let mut data_addr = DATA_BASE;

    for line in lines {
        match section_switch(line) {
            LineDirective::Switch(next) => {
                section = next;
                continue;
            }
            LineDirective::Ignored => continue,
            LineDirective::None => {}
        }

        match section {
            Section::Text => first_pass_text(line, &mut text_addr, program, errors),
            Section::Data => first_pass_data(line, &mut data_addr, program, errors),
        }
    }
}

/// What a line-leading directive means for the walk.
enum LineDirective {
    /// `.text` or `.data` — switch the active section.
    Switch(Section),
    /// Any other leading directive — consume the line with a warning.
    Ignored,
    /// Not a leading directive at all.
    None,
}

/// Recognises a `.text`/`.data` line; other leading directives are ignored
/// with a warning.
fn section_switch(line: &[Token]) -> LineDirective {
    let Some(first) = line.first() else {
        return LineDirective::None;
    };
    if first.kind != TokenKind::Directive {
        return LineDirective::None;
    }
    match first.text.as_str() {
        ".text" => LineDirective::Switch(Section::Text),
        ".data" => LineDirective::Switch(Section::Data),
        // Data directives belong to the section walker.
        other if DataDirective::from_name(other).is_some() => LineDirective::None,
        other => {
            tracing::warn!(line = first.line, directive = other, "ignoring directive");
            LineDirective::Ignored
        }
    }
}

/// Pass 1 over a text-section line: define labels, step the address cursor.
fn first_pass_text(
    line: &[Token],
    text_addr: &mut u32,
    program: &mut ParsedProgram,
    errors: &mut Vec<AsmError>,
) {
    for token in line {
        match &token.kind {
            TokenKind::LabelDef => {
                define_label(
                    program,
                    errors,
                    token,
                    Symbol::Code {
                        address: *text_addr,
                    },
                );
            }
            TokenKind::Ident => {
                // The first identifier is the mnemonic; the rest of the
                // line belongs to it.
                *text_addr += INSTRUCTION_SIZE;
                break;
            }
            _ => {
                errors.push(AsmError::Syntax {
                    line: token.line,
                    message: format!("unexpected token '{}' in text section", token.text),
                });
                break;
            }
        }
    }
}

/// Pass 1 over a data-section line: materialise bytes, define the label.
fn first_pass_data(
    line: &[Token],
    data_addr: &mut u32,
    program: &mut ParsedProgram,
    errors: &mut Vec<AsmError>,
) {
    let mut rest = line;
    let label = match rest.first() {
        Some(tok) if tok.kind == TokenKind::LabelDef => {
            rest = &rest[1..];
            Some(tok)
        }
        _ => None,
    };

    let Some(directive_tok) = rest.first() else {
        // A bare label carries over to the next data line's address.
        if let Some(tok) = label {
            define_label(
                program,
                errors,
                tok,
                Symbol::Data {
                    address: *data_addr,
                    directive: DataDirective::Byte,
                },
            );
        }
        return;
    };

    let line_no = directive_tok.line;
    if directive_tok.kind != TokenKind::Directive {
        errors.push(AsmError::Syntax {
            line: line_no,
            message: format!("expected data directive, found '{}'", directive_tok.text),
        });
        return;
    }
    let Some(directive) = DataDirective::from_name(&directive_tok.text) else {
        errors.push(AsmError::Syntax {
            line: line_no,
            message: format!("unsupported data directive '{}'", directive_tok.text),
        });
        return;
    };

    match data_bytes(directive, &rest[1..], line_no) {
        Ok((bytes, advance)) => {
            if let Some(tok) = label {
                define_label(
                    program,
                    errors,
                    tok,
                    Symbol::Data {
                        address: *data_addr,
                        directive,
                    },
                );
            }
            for (i, byte) in bytes.iter().enumerate() {
                program.data.push((*data_addr + i as u32, *byte));
            }
            *data_addr += advance;
        }
        Err(e) => errors.push(e),
    }
}

/// Materialises the bytes of one data directive and the address advance.
fn data_bytes(
    directive: DataDirective,
    values: &[Token],
    line: usize,
) -> Result<(Vec<u8>, u32), AsmError> {
    if values.is_empty() {
        return Err(AsmError::Syntax {
            line,
            message: "missing value(s) for data directive".to_string(),
        });
    }

    if matches!(directive, DataDirective::Ascii | DataDirective::Asciz) {
        let [tok] = values else {
            return Err(AsmError::Syntax {
                line,
                message: "string directive expects exactly one string literal".to_string(),
            });
        };
        let TokenKind::Str(s) = &tok.kind else {
            return Err(AsmError::Syntax {
                line,
                message: "invalid or missing string literal".to_string(),
            });
        };
        let mut bytes = s.as_bytes().to_vec();
        if directive == DataDirective::Asciz {
            bytes.push(0);
        }
        // String storage advances to the next word boundary.
        let advance = (bytes.len() as u32).div_ceil(4) * 4;
        return Ok((bytes, advance));
    }

    let width = directive.width();
    let mut bytes = Vec::new();
    for tok in values {
        let value = match &tok.kind {
            TokenKind::Immediate(v) => {
                check_data_range(directive, *v, line)?;
                *v
            }
            TokenKind::Str(s) if s.len() <= width as usize => {
                // Short strings pack little-endian into one value.
                s.bytes()
                    .enumerate()
                    .fold(0i64, |acc, (i, b)| acc | (i64::from(b) << (8 * i)))
            }
            _ => {
                return Err(AsmError::Syntax {
                    line,
                    message: format!("invalid value '{}' in data directive", tok.text),
                });
            }
        };
        bytes.extend_from_slice(&value.to_le_bytes()[..width as usize]);
    }
    let advance = width * (bytes.len() as u32 / width);
    Ok((bytes, advance))
}

/// Range-checks one numeric data value against its directive width.
fn check_data_range(directive: DataDirective, value: i64, line: usize) -> Result<(), AsmError> {
    let (min, max) = match directive {
        DataDirective::Byte => (i64::from(i8::MIN), i64::from(i8::MAX)),
        DataDirective::Half => (i64::from(i16::MIN), i64::from(i16::MAX)),
        DataDirective::Word => (i64::from(i32::MIN), i64::from(i32::MAX)),
        _ => return Ok(()),
    };
    if value < min || value > max {
        return Err(AsmError::ImmediateOutOfRange {
            line,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Defines a label, reporting duplicates.
fn define_label(
    program: &mut ParsedProgram,
    errors: &mut Vec<AsmError>,
    token: &Token,
    symbol: Symbol,
) {
    if program.symbols.contains_key(&token.text) {
        errors.push(AsmError::DuplicateLabel {
            line: token.line,
            label: token.text.clone(),
        });
        return;
    }
    let _ = program.symbols.insert(token.text.clone(), symbol);
}

/// Pass 2: build the parsed instruction stream for the text section.
fn second_pass(lines: &[Vec<Token>], program: &mut ParsedProgram, errors: &mut Vec<AsmError>) {
    let mut section = Section::Text;
    let mut text_addr = TEXT_BASE;

    for line in lines {
        match section_switch(line) {
            LineDirective::Switch(next) => {
                section = next;
                continue;
            }
            LineDirective::Ignored => continue,
            LineDirective::None => {}
        }
        if section != Section::Text {
            continue;
        }

        let mut idx = 0;
        while idx < line.len() && line[idx].kind == TokenKind::LabelDef {
            idx += 1;
        }
        let Some(mnemonic_tok) = line.get(idx) else {
            continue;
        };
        if mnemonic_tok.kind != TokenKind::Ident {
            // Pass 1 already reported the malformed line.
            continue;
        }

        let mut operands = Vec::new();
        let mut bad = false;
        for tok in &line[idx + 1..] {
            match &tok.kind {
                TokenKind::Register => operands.push(Operand::Register(tok.text.clone())),
                TokenKind::Immediate(v) => operands.push(Operand::Immediate(*v)),
                TokenKind::Memory { offset, base } => operands.push(Operand::Memory {
                    offset: *offset,
                    base: base.clone(),
                }),
                TokenKind::Ident => operands.push(Operand::Label(tok.text.clone())),
                _ => {
                    errors.push(AsmError::Syntax {
                        line: tok.line,
                        message: format!("invalid operand token '{}'", tok.text),
                    });
                    bad = true;
                    break;
                }
            }
        }
        if bad {
            continue;
        }

        program.instructions.push(ParsedInstruction {
            mnemonic: mnemonic_tok.text.to_ascii_lowercase(),
            operands,
            address: text_addr,
            line: mnemonic_tok.line,
        });
        text_addr += INSTRUCTION_SIZE;
    }
}
