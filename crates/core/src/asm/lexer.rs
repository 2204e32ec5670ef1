//! Assembly source tokenizer.
//!
//! Splits source text into lines of classified tokens. Comments start at
//! `#` and run to the end of the line. Tokens are separated by whitespace
//! and commas; string literals may contain both.
//!
//! Classification is purely lexical: a token that names a register becomes
//! [`TokenKind::Register`], a parsable integer becomes
//! [`TokenKind::Immediate`], `imm(reg)` becomes [`TokenKind::Memory`], a
//! trailing-colon word becomes [`TokenKind::LabelDef`], a leading-dot word
//! becomes [`TokenKind::Directive`]. Everything else is an
//! [`TokenKind::Ident`] — a mnemonic or a label use, decided by the parser.

use crate::common::error::AsmError;
use crate::isa::abi;

/// The lexical classes of one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `.text`, `.data`, `.word`, ...
    Directive,
    /// `name:` — a label definition (text stored without the colon).
    LabelDef,
    /// A register name (`x5`, `sp`, ...).
    Register,
    /// An integer literal with its parsed value.
    Immediate(i64),
    /// A memory operand `imm(reg)`.
    Memory {
        /// Byte offset before the parenthesis (0 when omitted).
        offset: i64,
        /// Base register name inside the parenthesis.
        base: String,
    },
    /// A double-quoted string literal with escapes resolved.
    Str(String),
    /// A mnemonic or a label use.
    Ident,
}

/// One token with its source text and line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The lexical class.
    pub kind: TokenKind,
    /// The raw token text (without a label's trailing colon).
    pub text: String,
    /// Source line number (1-based).
    pub line: usize,
}

/// Tokenizes the whole source. Empty and comment-only lines are dropped.
///
/// # Errors
///
/// Collects one [`AsmError::Syntax`] per malformed token (unterminated
/// string, bad memory operand) and returns them all.
pub fn tokenize(source: &str) -> Result<Vec<Vec<Token>>, Vec<AsmError>> {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        match tokenize_line(raw_line, line_no) {
            Ok(tokens) if tokens.is_empty() => {}
            Ok(tokens) => lines.push(tokens),
            Err(errs) => errors.extend(errs),
        }
    }

    if errors.is_empty() { Ok(lines) } else { Err(errors) }
}

/// Tokenizes a single source line.
fn tokenize_line(raw: &str, line: usize) -> Result<Vec<Token>, Vec<AsmError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut chars = raw.chars().peekable();
    let mut word = String::new();

    let flush = |word: &mut String, tokens: &mut Vec<Token>| {
        if !word.is_empty() {
            tokens.push(classify(std::mem::take(word), line));
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '#' => break,
            '"' => {
                flush(&mut word, &mut tokens);
                match lex_string(&mut chars, line) {
                    Ok(tok) => tokens.push(tok),
                    Err(e) => errors.push(e),
                }
            }
            c if c.is_whitespace() || c == ',' => flush(&mut word, &mut tokens),
            // Keep a trailing colon attached so label defs classify whole.
            _ => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);

    if errors.is_empty() { Ok(tokens) } else { Err(errors) }
}

/// Consumes a string literal body after the opening quote.
fn lex_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
) -> Result<Token, AsmError> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some('"') => {
                return Ok(Token {
                    kind: TokenKind::Str(value.clone()),
                    text: value,
                    line,
                });
            }
            Some('\\') => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('0') => value.push('\0'),
                Some('\\') => value.push('\\'),
                Some('"') => value.push('"'),
                other => {
                    return Err(AsmError::Syntax {
                        line,
                        message: format!(
                            "unknown escape '\\{}' in string literal",
                            other.map_or(String::from("<eol>"), |c| c.to_string())
                        ),
                    });
                }
            },
            Some(c) => value.push(c),
            None => {
                return Err(AsmError::Syntax {
                    line,
                    message: "unterminated string literal".to_string(),
                });
            }
        }
    }
}

/// Assigns a lexical class to a bare word.
fn classify(word: String, line: usize) -> Token {
    if let Some(stripped) = word.strip_suffix(':') {
        return Token {
            kind: TokenKind::LabelDef,
            text: stripped.to_string(),
            line,
        };
    }
    if word.starts_with('.') {
        return Token {
            kind: TokenKind::Directive,
            text: word,
            line,
        };
    }
    if abi::register_index(&word).is_some() {
        return Token {
            kind: TokenKind::Register,
            text: word,
            line,
        };
    }
    if let Some(value) = parse_immediate(&word) {
        return Token {
            kind: TokenKind::Immediate(value),
            text: word,
            line,
        };
    }
    if let Some((offset, base)) = parse_memory(&word) {
        return Token {
            kind: TokenKind::Memory { offset, base },
            text: word,
            line,
        };
    }
    Token {
        kind: TokenKind::Ident,
        text: word,
        line,
    }
}

/// Parses an integer literal: signed decimal, `0x` hex, or `0b` binary.
pub fn parse_immediate(text: &str) -> Option<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if body.is_empty() {
        return None;
    }

    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        body.parse::<i64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a memory operand of the form `imm(reg)`; the offset may be empty.
fn parse_memory(word: &str) -> Option<(i64, String)> {
    let open = word.find('(')?;
    if !word.ends_with(')') {
        return None;
    }
    let offset_text = &word[..open];
    let base = &word[open + 1..word.len() - 1];
    if abi::register_index(base).is_none() {
        return None;
    }
    let offset = if offset_text.is_empty() {
        0
    } else {
        parse_immediate(offset_text)?
    };
    Some((offset, base.to_string()))
}
