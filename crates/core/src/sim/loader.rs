//! Machine-code artifact reader.
//!
//! Parses the interchange format emitted by the assembler:
//! `0xAAAAAAAA 0xWWWWWWWW , <disassembly>` for text words,
//! `0xAAAAAAAA 0xBB` for data bytes. Comment lines (`#`), blank lines, and
//! the `<END_OF_TEXT>` sentinel are skipped. Addresses below the data base
//! are text; everything else is data.

use crate::asm::program::{MachineCode, TextEntry};
use crate::common::constants::DATA_BASE;
use crate::common::error::SimError;

/// Parses an artifact file's contents into a [`MachineCode`].
///
/// # Errors
///
/// [`SimError::ArtifactFormat`] for a line that is neither a comment, the
/// sentinel, a text word, nor a data byte.
pub fn parse_artifact(contents: &str) -> Result<MachineCode, SimError> {
    let mut machine = MachineCode::default();

    for (idx, raw) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.contains("<END_OF_TEXT>") {
            continue;
        }

        let mut parts = line.split_whitespace();
        let address = parse_hex(parts.next(), line_no)?;
        let value = parse_hex(parts.next(), line_no)?;

        if address < DATA_BASE {
            let disasm = line
                .split_once(',')
                .map(|(_, rest)| rest.trim().to_string())
                .unwrap_or_default();
            machine.text.push(TextEntry {
                address,
                word: value,
                disasm,
                line: line_no,
            });
        } else {
            if value > 0xFF {
                return Err(SimError::ArtifactFormat {
                    line: line_no,
                    message: format!("data byte {value:#x} wider than one byte"),
                });
            }
            machine.data.push((address, value as u8));
        }
    }

    Ok(machine)
}

/// Parses one `0x…` field.
fn parse_hex(field: Option<&str>, line: usize) -> Result<u32, SimError> {
    let text = field.ok_or_else(|| SimError::ArtifactFormat {
        line,
        message: "missing field".to_string(),
    })?;
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| SimError::ArtifactFormat {
            line,
            message: format!("expected 0x-prefixed value, found '{text}'"),
        })?;
    u32::from_str_radix(digits, 16).map_err(|_| SimError::ArtifactFormat {
        line,
        message: format!("invalid hex value '{text}'"),
    })
}
