//! Branch Prediction Unit.
//!
//! A per-PC 2-bit saturating counter Pattern History Table combined with a
//! Branch Target Buffer. Both tables grow lazily on first encounter; a PC
//! absent from the PHT predicts not taken.

/// Branch Target Buffer.
pub mod btb;

use std::collections::HashMap;

use btb::Btb;

/// Strongly not-taken counter state.
pub const STRONGLY_NOT_TAKEN: u8 = 0;
/// Weakly not-taken counter state (the lazy-insert default).
pub const WEAKLY_NOT_TAKEN: u8 = 1;
/// Weakly taken counter state.
pub const WEAKLY_TAKEN: u8 = 2;
/// Strongly taken counter state.
pub const STRONGLY_TAKEN: u8 = 3;

/// The branch predictor: PHT + BTB + accuracy counters.
#[derive(Debug, Clone, Default)]
pub struct BranchPredictor {
    pht: HashMap<u32, u8>,
    btb: Btb,
    lookups: u64,
}

impl BranchPredictor {
    /// Creates an empty predictor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Predicts the direction for `pc`: taken when the counter is in a
    /// taken state (>= 2). PCs absent from the PHT predict not taken.
    pub fn predict(&mut self, pc: u32) -> bool {
        self.lookups += 1;
        self.pht.get(&pc).is_some_and(|&c| c >= WEAKLY_TAKEN)
    }

    /// BTB target for `pc`, if one has been observed.
    pub fn target(&self, pc: u32) -> Option<u32> {
        self.btb.lookup(pc)
    }

    /// True when `pc` has a BTB entry.
    pub fn in_btb(&self, pc: u32) -> bool {
        self.btb.lookup(pc).is_some()
    }

    /// Trains the PHT with the resolved outcome of a branch and records the
    /// taken target in the BTB when it is new or has changed.
    pub fn update(&mut self, pc: u32, taken: bool, target: u32) {
        let counter = self.pht.entry(pc).or_insert(WEAKLY_NOT_TAKEN);
        if taken {
            *counter = (*counter + 1).min(STRONGLY_TAKEN);
        } else {
            *counter = counter.saturating_sub(1);
        }

        if taken && self.btb.lookup(pc) != Some(target) {
            self.btb.update(pc, target);
        }
    }

    /// Records a jump target in the BTB without touching the PHT.
    pub fn update_target(&mut self, pc: u32, target: u32) {
        if self.btb.lookup(pc) != Some(target) {
            self.btb.update(pc, target);
        }
    }

    /// Raw PHT counter for `pc` (absent PCs report strongly not-taken).
    pub fn counter(&self, pc: u32) -> u8 {
        self.pht.get(&pc).copied().unwrap_or(STRONGLY_NOT_TAKEN)
    }

    /// Number of direction lookups made.
    pub fn lookups(&self) -> u64 {
        self.lookups
    }

    /// Drops all predictor state.
    pub fn reset(&mut self) {
        self.pht.clear();
        self.btb.reset();
        self.lookups = 0;
    }
}
