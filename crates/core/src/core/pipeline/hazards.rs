//! Data Hazard Detection and Forwarding.
//!
//! This module maintains pipeline consistency when data dependencies exist
//! between in-flight instructions. It provides:
//! 1. **Dependency Tracking:** one record per in-flight writing instruction,
//!    updated as it moves through the stages.
//! 2. **RAW Detection:** the stall query used when data forwarding is
//!    disabled.
//! 3. **Load-Use Detection:** the one-cycle stall required even with
//!    forwarding when a load's consumer is directly behind it.
//! 4. **Operand Forwarding:** the value-select decision at the
//!    Decode→Execute boundary.

use crate::core::pipeline::node::{InstructionNode, Stage};
use crate::isa::instruction::InstructionFormat;

/// One in-flight register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDependency {
    /// Destination register.
    pub reg: usize,
    /// PC of the writing instruction.
    pub pc: u32,
    /// The stage the writer most recently completed.
    pub stage: Stage,
    /// The writer's opcode bits.
    pub opcode: u32,
}

/// The ordered list of in-flight register writes.
///
/// At most five instructions are in flight, so a flat vector scanned
/// linearly is as good as any index.
#[derive(Debug, Clone, Default)]
pub struct DependencyTracker {
    records: Vec<RegisterDependency>,
}

impl DependencyTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a writing instruction as it leaves Decode. Instructions
    /// that write nothing (stores, branches, rd = x0) create no record.
    pub fn insert(&mut self, node: &InstructionNode) {
        if !node.writes_rd() {
            return;
        }
        self.records.push(RegisterDependency {
            reg: node.rd,
            pc: node.pc,
            stage: Stage::Decode,
            opcode: node.spec.opcode,
        });
    }

    /// Updates the stage of the record owned by `pc`.
    pub fn set_stage(&mut self, pc: u32, stage: Stage) {
        if let Some(rec) = self.records.iter_mut().find(|r| r.pc == pc) {
            rec.stage = stage;
        }
    }

    /// Removes the record owned by `pc` after its Writeback completes.
    pub fn remove(&mut self, pc: u32) {
        self.records.retain(|r| r.pc != pc);
    }

    /// RAW query for the no-forwarding configuration: true when any other
    /// in-flight writer in Execute or Memory produces a register this node
    /// reads.
    pub fn has_raw_hazard(&self, node: &InstructionNode) -> bool {
        self.records.iter().any(|dep| {
            if !matches!(dep.stage, Stage::Execute | Stage::Memory) {
                return false;
            }
            let rs1_hit = node.reads_rs1() && node.rs1 != 0 && node.rs1 == dep.reg;
            let rs2_hit = node.reads_rs2() && node.rs2 != 0 && node.rs2 == dep.reg;
            if rs1_hit || rs2_hit {
                tracing::debug!(
                    pc = format_args!("{:#x}", node.pc),
                    reg = dep.reg,
                    stage = %dep.stage,
                    "data hazard"
                );
                return true;
            }
            false
        })
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Checks whether the node in the Decode slot depends on a load currently
/// one stage ahead in the Execute slot. Used only when forwarding is
/// enabled; without forwarding the RAW query already covers it.
pub fn load_use_hazard(decode: Option<&InstructionNode>, execute: Option<&InstructionNode>) -> bool {
    let (Some(consumer), Some(producer)) = (decode, execute) else {
        return false;
    };
    if !producer.is_load() || producer.rd == 0 {
        return false;
    }
    let rs1_hit = consumer.reads_rs1() && consumer.rs1 != 0 && consumer.rs1 == producer.rd;
    let rs2_hit = consumer.reads_rs2() && consumer.rs2 != 0 && consumer.rs2 == producer.rd;
    if rs1_hit || rs2_hit {
        tracing::debug!(
            pc = format_args!("{:#x}", consumer.pc),
            load_pc = format_args!("{:#x}", producer.pc),
            rd = producer.rd,
            "load-use hazard"
        );
        return true;
    }
    false
}

/// A value produced earlier in the current cycle, available for bypass.
#[derive(Debug, Clone, Copy)]
pub struct Forward {
    /// The register the producer writes.
    pub reg: usize,
    /// The produced value (RZ out of Memory, RY out of Execute).
    pub value: u32,
}

/// Applies forwarding to a node advancing out of Decode.
///
/// The Memory-stage bypass is applied first and the Execute-stage bypass
/// second, so the younger producer wins when both write the same register.
/// Forwarded rs2 values land in the operand the consumer actually reads:
/// RB for the R format, RM for S and B formats (whose RB carries the
/// immediate).
pub fn apply_forwarding(
    node: &mut InstructionNode,
    from_memory: Option<Forward>,
    from_execute: Option<Forward>,
) {
    for (source, fwd) in [("MEM", from_memory), ("EX", from_execute)] {
        let Some(fwd) = fwd else { continue };
        if node.reads_rs1() && node.rs1 != 0 && node.rs1 == fwd.reg {
            node.latch.ra = fwd.value;
            tracing::debug!(
                pc = format_args!("{:#x}", node.pc),
                reg = node.rs1,
                source,
                "forwarding rs1"
            );
        }
        if node.reads_rs2() && node.rs2 != 0 && node.rs2 == fwd.reg {
            match node.format() {
                InstructionFormat::S | InstructionFormat::B => node.latch.rm = fwd.value,
                _ => node.latch.rb = fwd.value,
            }
            tracing::debug!(
                pc = format_args!("{:#x}", node.pc),
                reg = node.rs2,
                source,
                "forwarding rs2"
            );
        }
    }
}
