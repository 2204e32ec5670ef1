//! Fetch stage.
//!
//! Reads the next word from the text map, classifies it, and — when branch
//! prediction is enabled — speculates on the next PC. The speculation
//! decision belongs here; the correction belongs to Execute.

use crate::common::constants::{INSTRUCTION_SIZE, MEM_LIMIT};
use crate::common::error::SimError;
use crate::core::cpu::Cpu;
use crate::core::pipeline::node::InstructionNode;
use crate::isa::decode;

/// Fetches one instruction at the current PC.
///
/// Returns `None` when the PC has no text entry (the program drains).
/// On success the PC advances sequentially, or to the predicted target for
/// a branch/jump the predictor marks taken and the BTB knows.
///
/// # Errors
///
/// A PC outside the valid memory range or an unclassifiable word is fatal.
pub fn fetch(cpu: &mut Cpu) -> Result<Option<InstructionNode>, SimError> {
    if u64::from(cpu.pc) + u64::from(INSTRUCTION_SIZE) > MEM_LIMIT {
        return Err(SimError::MemoryOutOfBounds {
            address: cpu.pc,
            size: INSTRUCTION_SIZE,
        });
    }

    let Some(&word) = cpu.text.get(&cpu.pc) else {
        return Ok(None);
    };

    let decoded = decode::decode(word)?;
    let mut node = InstructionNode::new(decoded, cpu.pc);
    cpu.pc = cpu.pc.wrapping_add(INSTRUCTION_SIZE);

    if cpu.pipelined && cpu.branch_prediction && (node.is_branch() || node.is_jump()) {
        speculate(cpu, &mut node);
    }

    Ok(Some(node))
}

/// Consults the predictor; on a taken prediction with a BTB hit, redirects
/// the PC and latches the speculated direction on the node.
fn speculate(cpu: &mut Cpu, node: &mut InstructionNode) {
    if cpu.predictor.predict(node.pc) {
        if let Some(target) = cpu.predictor.target(node.pc) {
            tracing::debug!(
                pc = format_args!("{:#x}", node.pc),
                target = format_args!("{target:#x}"),
                "predicted taken"
            );
            cpu.pc = target;
            node.predicted_taken = true;
            return;
        }
    }
    tracing::trace!(pc = format_args!("{:#x}", node.pc), "predicted not taken");
    node.predicted_taken = false;
}
