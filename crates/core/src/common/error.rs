//! Assembler diagnostics and fatal simulator errors.
//!
//! This module defines the two error families of the system:
//! 1. **Diagnostics** (`AsmError`): recoverable per-line assembler errors.
//!    They are collected for the whole batch and reported together as an
//!    [`AsmErrors`] list; no artifact is written when the list is non-empty.
//! 2. **Fatal runtime** (`SimError`): unrecoverable simulator errors that
//!    terminate the run. The statistics file is still written with whatever
//!    counters were accumulated.

use thiserror::Error;

/// A single assembler diagnostic, tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    /// The mnemonic is not part of the supported instruction set.
    #[error("line {line}: unknown instruction '{mnemonic}'")]
    UnknownMnemonic {
        /// Source line number (1-based).
        line: usize,
        /// The offending mnemonic text.
        mnemonic: String,
    },

    /// The operand list does not match the instruction's format.
    #[error("line {line}: '{mnemonic}' expects {expected} operand(s), got {got}")]
    WrongOperandCount {
        /// Source line number (1-based).
        line: usize,
        /// The instruction mnemonic.
        mnemonic: String,
        /// Number of operands the format requires.
        expected: usize,
        /// Number of operands found.
        got: usize,
    },

    /// An operand of the wrong kind appeared (e.g. an immediate where a
    /// register is required).
    #[error("line {line}: invalid operand '{operand}' for '{mnemonic}'")]
    InvalidOperand {
        /// Source line number (1-based).
        line: usize,
        /// The instruction mnemonic.
        mnemonic: String,
        /// The offending operand text.
        operand: String,
    },

    /// A register name that is neither `xN` (0..31) nor an ABI alias.
    #[error("line {line}: invalid register '{register}'")]
    InvalidRegister {
        /// Source line number (1-based).
        line: usize,
        /// The offending register text.
        register: String,
    },

    /// An immediate outside the range its format can encode.
    #[error("line {line}: immediate {value} out of range ({min} to {max})")]
    ImmediateOutOfRange {
        /// Source line number (1-based).
        line: usize,
        /// The rejected value.
        value: i64,
        /// Smallest encodable value.
        min: i64,
        /// Largest encodable value.
        max: i64,
    },

    /// A label operand that is not defined anywhere in the program.
    #[error("line {line}: undefined label '{label}'")]
    UnknownLabel {
        /// Source line number (1-based).
        line: usize,
        /// The unresolved label name.
        label: String,
    },

    /// A branch or jump target whose offset has bit 0 set.
    #[error("line {line}: misaligned branch/jump target (offset {offset})")]
    MisalignedTarget {
        /// Source line number (1-based).
        line: usize,
        /// The odd PC-relative offset.
        offset: i64,
    },

    /// A label used as an operand of a format that does not take labels.
    #[error("line {line}: label '{label}' not allowed here")]
    LabelNotAllowed {
        /// Source line number (1-based).
        line: usize,
        /// The label name.
        label: String,
    },

    /// The same label defined twice.
    #[error("line {line}: duplicate label '{label}'")]
    DuplicateLabel {
        /// Source line number (1-based).
        line: usize,
        /// The redefined label name.
        label: String,
    },

    /// A malformed token, directive, or line the parser cannot make sense of.
    #[error("line {line}: {message}")]
    Syntax {
        /// Source line number (1-based).
        line: usize,
        /// Human-readable description.
        message: String,
    },
}

/// The collected diagnostics of one assembly batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("assembly failed with {} error(s)", .0.len())]
pub struct AsmErrors(pub Vec<AsmError>);

impl AsmErrors {
    /// Number of collected diagnostics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no diagnostics were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the individual diagnostics in source order.
    pub fn iter(&self) -> impl Iterator<Item = &AsmError> {
        self.0.iter()
    }
}

/// A fatal simulator error. Terminates the run; counters survive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A fetched word matches no known (opcode, funct3, funct7) combination.
    #[error("instruction {word:#010x} could not be classified: invalid encoding")]
    UnknownInstruction {
        /// The unclassifiable instruction word.
        word: u32,
    },

    /// A load, store, or fetch touched memory outside the valid range.
    #[error(
        "memory access error: address {address:#010x} with size {size} is \
         outside of valid memory range"
    )]
    MemoryOutOfBounds {
        /// First byte of the access.
        address: u32,
        /// Access width in bytes.
        size: u32,
    },

    /// `div` with a zero divisor.
    #[error("division by zero at PC {pc:#010x}")]
    DivisionByZero {
        /// PC of the dividing instruction.
        pc: u32,
    },

    /// `rem` with a zero divisor.
    #[error("remainder by zero at PC {pc:#010x}")]
    RemainderByZero {
        /// PC of the instruction.
        pc: u32,
    },

    /// `step()` invoked after the simulator halted.
    #[error("cannot step - simulator is not running")]
    Halted,

    /// A malformed line in a machine-code artifact file.
    #[error("artifact line {line}: {message}")]
    ArtifactFormat {
        /// Line number within the artifact file (1-based).
        line: usize,
        /// Human-readable description.
        message: String,
    },
}
