//! Execution units.

/// Integer ALU operations.
pub mod alu;
/// Branch prediction unit (PHT + BTB).
pub mod bru;
