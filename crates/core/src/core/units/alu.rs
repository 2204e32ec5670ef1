//! Integer ALU.
//!
//! Pure functions realising the RV32I/M register-register and
//! register-immediate arithmetic. All arithmetic wraps; shifts use only the
//! low 5 bits of the second operand; `div`/`rem` are signed, with a zero
//! divisor surfacing as a fatal runtime error and the RV32 overflow case
//! (`i32::MIN / -1`) wrapping to the dividend.

use crate::common::error::SimError;
use crate::isa::rv32i::{funct3 as i_f3, funct7 as i_f7};
use crate::isa::rv32m::{funct3 as m_f3, opcodes as m_op};

/// Evaluates an R-format operation selected by (funct3, funct7).
///
/// The decoder guarantees the (funct3, funct7) pair names a real
/// instruction before execution reaches this point.
///
/// # Errors
///
/// [`SimError::DivisionByZero`] / [`SimError::RemainderByZero`] for `div` /
/// `rem` with a zero right operand; `pc` identifies the instruction.
pub fn register_op(funct3: u32, funct7: u32, a: u32, b: u32, pc: u32) -> Result<u32, SimError> {
    if funct7 == m_op::M_EXTENSION {
        return match funct3 {
            m_f3::DIV => {
                if b == 0 {
                    Err(SimError::DivisionByZero { pc })
                } else {
                    Ok((a as i32).wrapping_div(b as i32) as u32)
                }
            }
            m_f3::REM => {
                if b == 0 {
                    Err(SimError::RemainderByZero { pc })
                } else {
                    Ok((a as i32).wrapping_rem(b as i32) as u32)
                }
            }
            _ => Ok(a.wrapping_mul(b)),
        };
    }

    Ok(match (funct3, funct7) {
        (i_f3::ADD_SUB, i_f7::SUB) => a.wrapping_sub(b),
        (i_f3::ADD_SUB, _) => a.wrapping_add(b),
        (i_f3::SLL, _) => a << (b & 0x1F),
        (i_f3::SLT, _) => u32::from((a as i32) < (b as i32)),
        (i_f3::SLTU, _) => u32::from(a < b),
        (i_f3::XOR, _) => a ^ b,
        (i_f3::SRL_SRA, i_f7::SRA) => ((a as i32) >> (b & 0x1F)) as u32,
        (i_f3::SRL_SRA, _) => a >> (b & 0x1F),
        (i_f3::OR, _) => a | b,
        _ => a & b,
    })
}

/// Evaluates an I-format arithmetic operation. The immediate arrives
/// sign-extended in `b`; shifts use its low 5 bits and select logical vs
/// arithmetic via the funct7 bits of the immediate.
pub fn immediate_op(funct3: u32, a: u32, b: u32) -> u32 {
    match funct3 {
        i_f3::ADD_SUB => a.wrapping_add(b),
        i_f3::SLL => a << (b & 0x1F),
        i_f3::SLT => u32::from((a as i32) < (b as i32)),
        i_f3::SLTU => u32::from(a < b),
        i_f3::XOR => a ^ b,
        i_f3::SRL_SRA => {
            if (b >> 5) & 0x7F == i_f7::SRA {
                ((a as i32) >> (b & 0x1F)) as u32
            } else {
                a >> (b & 0x1F)
            }
        }
        i_f3::OR => a | b,
        _ => a & b,
    }
}

/// Evaluates a branch condition selected by funct3 over (a, b).
pub fn branch_taken(funct3: u32, a: u32, b: u32) -> bool {
    match funct3 {
        i_f3::BEQ => a == b,
        i_f3::BNE => a != b,
        i_f3::BLT => (a as i32) < (b as i32),
        i_f3::BGE => (a as i32) >= (b as i32),
        i_f3::BLTU => a < b,
        _ => a >= b,
    }
}
