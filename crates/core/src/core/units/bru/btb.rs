//! Branch Target Buffer (BTB).
//!
//! Stores the last observed taken-target per control-flow PC so the fetch
//! stage can redirect before the instruction is decoded. Grows lazily.

use std::collections::HashMap;

/// Branch Target Buffer.
#[derive(Debug, Clone, Default)]
pub struct Btb {
    table: HashMap<u32, u32>,
}

impl Btb {
    /// Creates an empty BTB.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the recorded target for `pc`.
    pub fn lookup(&self, pc: u32) -> Option<u32> {
        self.table.get(&pc).copied()
    }

    /// Records (or overwrites) the target for `pc`.
    pub fn update(&mut self, pc: u32, target: u32) {
        let _ = self.table.insert(pc, target);
    }

    /// Drops all entries.
    pub fn reset(&mut self) {
        self.table.clear();
    }
}
