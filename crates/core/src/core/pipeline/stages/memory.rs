//! Memory stage.
//!
//! Loads read from data memory into RZ with the correct width and
//! extension; stores write RM. Every other instruction passes RY through.
//! RZ is set to RY unconditionally first, so stores carry their effective
//! address through Writeback.

use crate::common::error::SimError;
use crate::core::cpu::Cpu;
use crate::core::pipeline::node::InstructionNode;
use crate::isa::rv32i::funct3 as i_f3;

/// Performs the data access for one instruction.
///
/// # Errors
///
/// Any access reaching outside the valid memory range is fatal.
pub fn memory(cpu: &mut Cpu, node: &mut InstructionNode) -> Result<(), SimError> {
    node.latch.rz = node.latch.ry;
    let address = node.latch.ry;

    if node.is_load() {
        node.latch.rz = match node.funct3 {
            i_f3::LB => cpu.mem.read_u8(address)? as i8 as u32,
            i_f3::LH => cpu.mem.read_u16(address)? as i16 as u32,
            i_f3::LBU => u32::from(cpu.mem.read_u8(address)?),
            i_f3::LHU => u32::from(cpu.mem.read_u16(address)?),
            _ => cpu.mem.read_u32(address)?,
        };
    } else if node.is_store() {
        let value = node.latch.rm;
        match node.funct3 {
            i_f3::SB => cpu.mem.write_u8(address, (value & 0xFF) as u8)?,
            i_f3::SH => cpu.mem.write_u16(address, (value & 0xFFFF) as u16)?,
            _ => cpu.mem.write_u32(address, value)?,
        }
    }

    if let Some(follow) = &mut cpu.follow {
        if follow.pc == node.pc {
            follow.latch.rz = node.latch.rz;
        }
    }
    Ok(())
}
