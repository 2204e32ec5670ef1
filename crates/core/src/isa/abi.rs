//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Maps the 32 ABI register names to their indices and parses register
//! operands in either `xN` or ABI-alias form, case-insensitively.

/// ABI register names for x0–x31.
pub const REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Resolves a register operand to its index.
///
/// Accepts `xN` with N in 0..32 and all 32 ABI aliases, case-insensitively.
/// Returns `None` for anything else.
pub fn register_index(name: &str) -> Option<usize> {
    let lower = name.to_ascii_lowercase();
    if let Some(num) = lower.strip_prefix('x') {
        if let Ok(idx) = num.parse::<usize>() {
            // "x07" style padding is not a register name.
            if idx < 32 && num == idx.to_string() {
                return Some(idx);
            }
        }
        // Fall through: "x" could prefix no alias, so this is invalid.
        return None;
    }
    REG_NAMES.iter().position(|&n| n == lower)
}
