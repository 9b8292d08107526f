//! RV32M multiply/divide extension.
//!
//! Reached from `rv32i::execute_op` whenever an OP-opcode instruction
//! carries funct7 == 0000001. Division-by-zero and signed-overflow
//! corner cases produce the RISC-V-defined trap-free results rather
//! than panicking.

use crate::decode::Rtype;
use crate::hart::Hart;

pub fn execute(hart: &mut Hart, r: Rtype) {
    let src1 = hart.x(r.rs1);
    let src2 = hart.x(r.rs2);
    let value = match r.funct3 {
        0b000 => ((src1 as i32 as i64).wrapping_mul(src2 as i32 as i64)) as u32, // MUL
        0b001 => {
            let product = (src1 as i32 as i64).wrapping_mul(src2 as i32 as i64);
            (product >> 32) as u32 // MULH
        }
        0b010 => {
            let product = (src1 as i64).wrapping_mul(src2 as i32 as i64);
            (product >> 32) as u32 // MULHSU
        }
        0b011 => {
            let product = (src1 as u64).wrapping_mul(src2 as u64);
            (product >> 32) as u32 // MULHU
        }
        0b100 => div_signed(src1 as i32, src2 as i32), // DIV
        0b101 => div_unsigned(src1, src2),             // DIVU
        0b110 => rem_signed(src1 as i32, src2 as i32), // REM
        0b111 => rem_unsigned(src1, src2),             // REMU
        _ => unreachable!("funct3 is a 3-bit field"),
    };
    hart.set_x(r.rd, value);
    hart.advance_pc();
}

fn div_signed(dividend: i32, divisor: i32) -> u32 {
    if divisor == 0 {
        u32::MAX // -1
    } else if dividend == i32::MIN && divisor == -1 {
        dividend as u32
    } else {
        dividend.wrapping_div(divisor) as u32
    }
}

fn div_unsigned(dividend: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        u32::MAX
    } else {
        dividend / divisor
    }
}

fn rem_signed(dividend: i32, divisor: i32) -> u32 {
    if divisor == 0 {
        dividend as u32
    } else if dividend == i32::MIN && divisor == -1 {
        0
    } else {
        dividend.wrapping_rem(divisor) as u32
    }
}

fn rem_unsigned(dividend: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        dividend
    } else {
        dividend % divisor
    }
}
