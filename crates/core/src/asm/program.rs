//! Batch assembly driver and machine-code artifact.
//!
//! Runs the lexer, the two-pass parser, and the encoder over a whole
//! source, collecting every diagnostic; renders the ordered artifact in the
//! interchange format consumed by the simulator's loader:
//!
//! ```text
//! 0xAAAAAAAA 0xWWWWWWWW , <disassembly>     (text, one word per line)
//! 0x<end+4>  0x00000000 , <END_OF_TEXT>     (sentinel)
//! 0xAAAAAAAA 0xBB                           (data, one byte per line)
//! ```

use crate::asm::{encoder, lexer, parser};
use crate::common::error::{AsmError, AsmErrors};
use crate::isa::disasm;

/// One encoded text-segment word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    /// Word-aligned text address.
    pub address: u32,
    /// The 32-bit encoding.
    pub word: u32,
    /// Disassembly listing text.
    pub disasm: String,
    /// Source line the word came from.
    pub line: usize,
}

/// The ordered machine-code artifact: text words plus data bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineCode {
    /// Text-segment words in address order.
    pub text: Vec<TextEntry>,
    /// Data-segment bytes in address order.
    pub data: Vec<(u32, u8)>,
}

impl MachineCode {
    /// Renders the artifact in the interchange format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# ---------------- TEXT SEGMENT ---------------- #\n");
        for entry in &self.text {
            out.push_str(&format!(
                "0x{:08x} 0x{:08x} , {}\n",
                entry.address, entry.word, entry.disasm
            ));
        }
        if let Some(last) = self.text.last() {
            out.push_str(&format!(
                "0x{:08x} 0x00000000 , <END_OF_TEXT>\n",
                last.address + 4
            ));
        }
        out.push_str("\n# ---------------- DATA SEGMENT ---------------- #\n");
        for (address, byte) in &self.data {
            out.push_str(&format!("0x{address:08x} 0x{byte:02x}\n"));
        }
        out
    }
}

/// Assembles a whole source text into a machine-code artifact.
///
/// # Errors
///
/// Returns every diagnostic the batch produced — lexing, parsing, and
/// encoding errors together, each tied to its source line. No artifact is
/// produced when any diagnostic exists.
pub fn assemble(source: &str) -> Result<MachineCode, AsmErrors> {
    let lines = lexer::tokenize(source).map_err(AsmErrors)?;
    let parsed = parser::parse(&lines).map_err(AsmErrors)?;

    let mut machine = MachineCode {
        text: Vec::with_capacity(parsed.instructions.len()),
        data: parsed.data.clone(),
    };
    let mut errors: Vec<AsmError> = Vec::new();

    for inst in &parsed.instructions {
        match encoder::encode(inst, &parsed.symbols) {
            Ok(word) => machine.text.push(TextEntry {
                address: inst.address,
                word,
                disasm: disasm::disassemble(word),
                line: inst.line,
            }),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(machine)
    } else {
        Err(AsmErrors(errors))
    }
}
