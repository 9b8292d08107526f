//! RV32I base integer instructions plus the Zicsr extension.
//!
//! Each `execute_*` function receives the hart and the pre-decoded
//! fields for its instruction class, mutates architectural state, and
//! advances the program counter as its final effect (branches and
//! jumps set `pc` directly instead).

use crate::decode::{Btype, Itype, Jtype, Rtype, Stype, Utype};
use crate::fields;
use crate::hart::Hart;
use crate::memory::Wordsize;

pub fn execute_lui(hart: &mut Hart, u: Utype) {
    hart.set_x(u.rd, u.imm as u32);
    hart.advance_pc();
}

pub fn execute_auipc(hart: &mut Hart, u: Utype) {
    let value = hart.pc.wrapping_add(u.imm as u32);
    hart.set_x(u.rd, value);
    hart.advance_pc();
}

pub fn execute_jal(hart: &mut Hart, j: Jtype) {
    let return_address = hart.pc.wrapping_add(4);
    hart.set_x(j.rd, return_address);
    hart.pc = hart.pc.wrapping_add(j.imm as u32);
}

pub fn execute_jalr(hart: &mut Hart, i: Itype) {
    // t must be computed before the rd write, in case rd == rs1.
    let t = hart.pc.wrapping_add(4);
    let base = hart.x(i.rs1);
    let target = base.wrapping_add(i.imm as u32) & !1u32;
    hart.pc = target;
    hart.set_x(i.rd, t);
}

#[derive(Debug, Clone, Copy)]
pub enum BranchCond {
    Eq,
    Ne,
    Lt,
    Ge,
    Ltu,
    Geu,
}

fn branch_cond(funct3: u32) -> Option<BranchCond> {
    match funct3 {
        0b000 => Some(BranchCond::Eq),
        0b001 => Some(BranchCond::Ne),
        0b100 => Some(BranchCond::Lt),
        0b101 => Some(BranchCond::Ge),
        0b110 => Some(BranchCond::Ltu),
        0b111 => Some(BranchCond::Geu),
        _ => None,
    }
}

pub fn execute_branch(hart: &mut Hart, instr: u32, b: Btype) {
    let Some(cond) = branch_cond(fields::funct3(instr)) else {
        hart.advance_pc();
        return;
    };
    let src1 = hart.x(b.rs1);
    let src2 = hart.x(b.rs2);
    let taken = match cond {
        BranchCond::Eq => src1 == src2,
        BranchCond::Ne => src1 != src2,
        BranchCond::Lt => (src1 as i32) < (src2 as i32),
        BranchCond::Ge => (src1 as i32) >= (src2 as i32),
        BranchCond::Ltu => src1 < src2,
        BranchCond::Geu => src1 >= src2,
    };
    if taken {
        hart.pc = hart.pc.wrapping_add(b.imm as u32);
    } else {
        hart.advance_pc();
    }
}

pub fn execute_load(hart: &mut Hart, instr: u32, i: Itype) {
    let addr = hart.x(i.rs1).wrapping_add(i.imm as u32);
    let value = match fields::funct3(instr) {
        0b000 => hart.memory.read(addr, Wordsize::Byte) as i8 as i32 as u32,
        0b001 => hart.memory.read(addr, Wordsize::Halfword) as i16 as i32 as u32,
        0b010 => hart.memory.read(addr, Wordsize::Word),
        0b100 => hart.memory.read(addr, Wordsize::Byte),
        0b101 => hart.memory.read(addr, Wordsize::Halfword),
        _ => {
            hart.advance_pc();
            return;
        }
    };
    hart.set_x(i.rd, value);
    hart.advance_pc();
}

pub fn execute_store(hart: &mut Hart, instr: u32, s: Stype) {
    let addr = hart.x(s.rs1).wrapping_add(s.imm as u32);
    let value = hart.x(s.rs2);
    let width = match fields::funct3(instr) {
        0b000 => Wordsize::Byte,
        0b001 => Wordsize::Halfword,
        0b010 => Wordsize::Word,
        _ => {
            hart.advance_pc();
            return;
        }
    };
    hart.memory.write(addr, width, value);
    hart.advance_pc();
}

pub fn execute_op_imm(hart: &mut Hart, instr: u32, i: Itype) {
    let src = hart.x(i.rs1);
    let shamt = (i.imm as u32) & 0x1f;
    let value = match fields::funct3(instr) {
        0b000 => src.wrapping_add(i.imm as u32), // ADDI
        0b010 => (((src as i32) < i.imm) as u32), // SLTI
        0b011 => ((src < (i.imm as u32)) as u32), // SLTIU
        0b100 => src ^ (i.imm as u32),           // XORI
        0b110 => src | (i.imm as u32),           // ORI
        0b111 => src & (i.imm as u32),           // ANDI
        0b001 => src << shamt,                   // SLLI
        0b101 => {
            if fields::funct7(instr) & 0x20 != 0 {
                ((src as i32) >> shamt) as u32 // SRAI
            } else {
                src >> shamt // SRLI
            }
        }
        _ => unreachable!("funct3 is a 3-bit field"),
    };
    hart.set_x(i.rd, value);
    hart.advance_pc();
}

pub fn execute_op(hart: &mut Hart, r: Rtype) {
    if r.funct7 == crate::decode::FUNCT7_MULDIV {
        crate::rv32m::execute(hart, r);
        return;
    }
    let src1 = hart.x(r.rs1);
    let src2 = hart.x(r.rs2);
    let shamt = src2 & 0x1f;
    let value = match (r.funct3, r.funct7) {
        (0b000, 0) => src1.wrapping_add(src2),              // ADD
        (0b000, _) => src1.wrapping_sub(src2),              // SUB (funct7 bit 5 set)
        (0b001, _) => src1 << shamt,                        // SLL
        (0b010, _) => (((src1 as i32) < (src2 as i32)) as u32), // SLT
        (0b011, _) => ((src1 < src2) as u32),               // SLTU
        (0b100, _) => src1 ^ src2,                          // XOR
        (0b101, 0) => src1 >> shamt,                        // SRL
        (0b101, _) => ((src1 as i32) >> shamt) as u32,      // SRA
        (0b110, _) => src1 | src2,                          // OR
        (0b111, _) => src1 & src2,                          // AND
        _ => unreachable!("funct3 is a 3-bit field"),
    };
    hart.set_x(r.rd, value);
    hart.advance_pc();
}

/// Outcome of executing the SYSTEM opcode group.
pub enum SystemEffect {
    /// Not an ECALL: a Zicsr instruction (or an unimplemented SYSTEM
    /// sub-opcode, treated as a no-op) already advanced pc.
    Continue,
    /// ECALL: simulation halts with this exit code (x[3]).
    Ecall(u32),
}

const ECALL_WORD: u32 = 0x0000_0073;

pub fn execute_system(hart: &mut Hart, instr: u32) -> SystemEffect {
    if instr == ECALL_WORD {
        return SystemEffect::Ecall(hart.x(3));
    }

    let csr = (instr >> 20) as u16;
    let rd = fields::rd(instr);
    let rs1 = fields::rs1(instr);
    let zimm = rs1 as u32; // 5-bit unsigned immediate shares the rs1 field

    let old = hart.csr.read(csr);
    let new_value = match fields::funct3(instr) {
        0b001 => hart.x(rs1),               // CSRRW
        0b010 => old | hart.x(rs1),         // CSRRS
        0b011 => old & !hart.x(rs1),        // CSRRC
        0b101 => zimm,                      // CSRRWI
        0b110 => old | zimm,                // CSRRSI
        0b111 => old & !zimm,               // CSRRCI
        _ => {
            hart.advance_pc();
            return SystemEffect::Continue;
        }
    };
    hart.csr.write(csr, new_value);
    hart.set_x(rd, old);
    hart.advance_pc();
    SystemEffect::Continue
}
