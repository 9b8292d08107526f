//! Top-level instruction decoder.
//!
//! A pure function from a 32-bit instruction word to a tagged
//! `Decoded` value carrying pre-extracted fields and sign-extended
//! immediates. Finer-grained
//! sub-decoding (which ALU op, which vector addressing mode) happens
//! inside the executor modules, which already need the raw
//! instruction word to pull out opcode-family-specific bitfields.

use crate::fields::*;

pub const OP_LUI: u32 = 0b011_0111;
pub const OP_AUIPC: u32 = 0b001_0111;
pub const OP_JAL: u32 = 0b110_1111;
pub const OP_JALR: u32 = 0b110_0111;
pub const OP_BRANCH: u32 = 0b110_0011;
pub const OP_LOAD: u32 = 0b000_0011;
pub const OP_STORE: u32 = 0b010_0011;
pub const OP_IMM: u32 = 0b001_0011;
pub const OP_REG: u32 = 0b011_0011;
pub const OP_SYSTEM: u32 = 0b111_0011;
pub const OP_VECTOR: u32 = 0b101_0111;
pub const OP_VECTOR_LOAD: u32 = 0b000_0111;
pub const OP_VECTOR_STORE: u32 = 0b010_0111;

pub const FUNCT7_MULDIV: u32 = 0b0000001;

#[derive(Debug, Clone, Copy)]
pub struct Utype {
    pub rd: u8,
    pub imm: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Jtype {
    pub rd: u8,
    pub imm: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Itype {
    pub rd: u8,
    pub rs1: u8,
    pub imm: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Stype {
    pub rs1: u8,
    pub rs2: u8,
    pub imm: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Btype {
    pub rs1: u8,
    pub rs2: u8,
    pub imm: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Rtype {
    pub rd: u8,
    pub rs1: u8,
    pub rs2: u8,
    pub funct3: u32,
    pub funct7: u32,
}

/// The architectural class an instruction word belongs to, with the
/// fields it needs already extracted. `instr` is carried alongside on
/// every variant that needs further opcode-family-specific decoding
/// (System, Vector*) because those groups pack more information into
/// the word than a single struct captures cleanly.
#[derive(Debug, Clone, Copy)]
pub enum Decoded {
    Lui(Utype),
    Auipc(Utype),
    Jal(Jtype),
    Jalr(Itype),
    Branch(Btype),
    Load(Itype),
    Store(Stype),
    OpImm(Itype),
    Op(Rtype),
    System { instr: u32 },
    VectorConfig { instr: u32 },
    VectorLoad { instr: u32 },
    VectorStore { instr: u32 },
    VectorArith { instr: u32 },
    /// Opcode not recognized, or a recognized opcode with a
    /// funct3/funct7 combination this subset doesn't implement.
    Unknown,
}

pub fn decode(instr: u32) -> Decoded {
    let op = opcode(instr);
    match op {
        OP_LUI => Decoded::Lui(Utype {
            rd: rd(instr),
            imm: imm_u(instr),
        }),
        OP_AUIPC => Decoded::Auipc(Utype {
            rd: rd(instr),
            imm: imm_u(instr),
        }),
        OP_JAL => Decoded::Jal(Jtype {
            rd: rd(instr),
            imm: imm_j(instr),
        }),
        OP_JALR => Decoded::Jalr(Itype {
            rd: rd(instr),
            rs1: rs1(instr),
            imm: imm_i(instr),
        }),
        OP_BRANCH => Decoded::Branch(Btype {
            rs1: rs1(instr),
            rs2: rs2(instr),
            imm: imm_b(instr),
        }),
        OP_LOAD => Decoded::Load(Itype {
            rd: rd(instr),
            rs1: rs1(instr),
            imm: imm_i(instr),
        }),
        OP_STORE => Decoded::Store(Stype {
            rs1: rs1(instr),
            rs2: rs2(instr),
            imm: imm_s(instr),
        }),
        OP_IMM => Decoded::OpImm(Itype {
            rd: rd(instr),
            rs1: rs1(instr),
            imm: imm_i(instr),
        }),
        OP_REG => Decoded::Op(Rtype {
            rd: rd(instr),
            rs1: rs1(instr),
            rs2: rs2(instr),
            funct3: funct3(instr),
            funct7: funct7(instr),
        }),
        OP_SYSTEM => Decoded::System { instr },
        OP_VECTOR => {
            if funct3(instr) == 0b111 {
                Decoded::VectorConfig { instr }
            } else {
                Decoded::VectorArith { instr }
            }
        }
        OP_VECTOR_LOAD => Decoded::VectorLoad { instr },
        OP_VECTOR_STORE => Decoded::VectorStore { instr },
        _ => Decoded::Unknown,
    }
}
