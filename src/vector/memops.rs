//! Vector load/store addressing modes: unit-stride, strided, indexed,
//! and whole-register.
//!
//! Segmented (NFIELDS > 1) accesses interleave `nf` fields per index
//! the way the base ISA's struct-of-arrays layout does: field `f` of
//! element `i` lives at `base + i*nf*eew_bytes + f*eew_bytes` for
//! unit-stride/indexed, and `base + i*stride + f*eew_bytes` for
//! strided.

use itertools::iproduct;

use crate::fields;
use crate::hart::Hart;
use crate::memory::Wordsize;
use crate::vector::Sew;

const LUMOP_REGULAR: u8 = 0b00000;
const LUMOP_WHOLE_REGISTER: u8 = 0b01000;
const LUMOP_MASK: u8 = 0b01011;

fn eew(width: u32) -> Option<Sew> {
    match width {
        0b000 => Some(Sew::E8),
        0b001 => Some(Sew::E16),
        0b010 => Some(Sew::E32),
        _ => None,
    }
}

struct Header {
    nf: u32,
    mop: u32,
    vm: bool,
    aux: u8, // rs2 field: lumop for unit-stride, stride/index register for the rest
    rs1: u8,
    vd: u8,
    width: u32,
}

fn parse(instr: u32) -> Header {
    Header {
        nf: (instr >> 29) & 0b111,
        mop: (instr >> 26) & 0b11,
        vm: (instr >> 25) & 1 != 0,
        aux: fields::rs2(instr),
        rs1: fields::rs1(instr),
        vd: fields::rd(instr),
        width: fields::funct3(instr),
    }
}

pub fn execute_load(hart: &mut Hart, instr: u32) {
    let header = parse(instr);
    let Some(sew) = eew(header.width) else {
        hart.advance_pc();
        return;
    };
    let base = hart.x(header.rs1);
    let nf = (header.nf + 1) as usize;

    match header.mop {
        0b00 if header.aux == LUMOP_WHOLE_REGISTER => {
            whole_register_load(hart, base, header.vd, nf);
        }
        0b00 if header.aux == LUMOP_MASK => {
            let vl = hart.vector.vl.max(1);
            unit_stride_load(hart, base, header.vd, Sew::E8, 1, vl.div_ceil(8), true);
        }
        0b00 if header.aux == LUMOP_REGULAR => {
            unit_stride_load(hart, base, header.vd, sew, nf, hart.vector.vl, header.vm);
        }
        0b10 => {
            let stride = hart.x(header.aux) as i32;
            strided_load(hart, base, stride, header.vd, sew, nf, header.vm);
        }
        0b01 | 0b11 => {
            indexed_load(hart, base, header.aux, header.vd, sew, nf, header.vm);
        }
        _ => {}
    }
    hart.advance_pc();
}

pub fn execute_store(hart: &mut Hart, instr: u32) {
    let header = parse(instr);
    let Some(sew) = eew(header.width) else {
        hart.advance_pc();
        return;
    };
    let base = hart.x(header.rs1);
    let nf = (header.nf + 1) as usize;

    match header.mop {
        0b00 if header.aux == LUMOP_WHOLE_REGISTER => {
            whole_register_store(hart, base, header.vd, nf);
        }
        0b00 => {
            unit_stride_store(hart, base, header.vd, sew, nf, hart.vector.vl, header.vm);
        }
        0b10 => {
            let stride = hart.x(header.aux) as i32;
            strided_store(hart, base, stride, header.vd, sew, nf, header.vm);
        }
        0b01 | 0b11 => {
            indexed_store(hart, base, header.aux, header.vd, sew, nf, header.vm);
        }
        _ => {}
    }
    hart.advance_pc();
}

fn unit_stride_load(hart: &mut Hart, base: u32, vd: u8, sew: Sew, nf: usize, vl: u32, vm: bool) {
    for (i, f) in iproduct!(0..vl, 0..nf) {
        if !hart.vector.mask_active(vm, i) {
            continue;
        }
        let addr = base.wrapping_add((i as usize * nf + f) as u32 * sew.bytes() as u32);
        let value = hart.memory.read(addr, width_of(sew));
        hart.vector.write_element(vd + f as u8, sew, i, value);
    }
}

fn unit_stride_store(hart: &mut Hart, base: u32, vd: u8, sew: Sew, nf: usize, vl: u32, vm: bool) {
    for (i, f) in iproduct!(0..vl, 0..nf) {
        if !hart.vector.mask_active(vm, i) {
            continue;
        }
        let addr = base.wrapping_add((i as usize * nf + f) as u32 * sew.bytes() as u32);
        let value = hart.vector.read_element(vd + f as u8, sew, i);
        hart.memory.write(addr, width_of(sew), value);
    }
}

fn strided_load(hart: &mut Hart, base: u32, stride: i32, vd: u8, sew: Sew, nf: usize, vm: bool) {
    for (i, f) in iproduct!(0..hart.vector.vl, 0..nf) {
        if !hart.vector.mask_active(vm, i) {
            continue;
        }
        let row = base.wrapping_add((stride.wrapping_mul(i as i32)) as u32);
        let addr = row.wrapping_add(f as u32 * sew.bytes() as u32);
        let value = hart.memory.read(addr, width_of(sew));
        hart.vector.write_element(vd + f as u8, sew, i, value);
    }
}

fn strided_store(hart: &mut Hart, base: u32, stride: i32, vd: u8, sew: Sew, nf: usize, vm: bool) {
    for (i, f) in iproduct!(0..hart.vector.vl, 0..nf) {
        if !hart.vector.mask_active(vm, i) {
            continue;
        }
        let row = base.wrapping_add((stride.wrapping_mul(i as i32)) as u32);
        let addr = row.wrapping_add(f as u32 * sew.bytes() as u32);
        let value = hart.vector.read_element(vd + f as u8, sew, i);
        hart.memory.write(addr, width_of(sew), value);
    }
}

fn indexed_load(hart: &mut Hart, base: u32, index_vreg: u8, vd: u8, data_sew: Sew, nf: usize, vm: bool) {
    let index_sew = hart.vector.vtype.sew;
    for (i, f) in iproduct!(0..hart.vector.vl, 0..nf) {
        if !hart.vector.mask_active(vm, i) {
            continue;
        }
        let offset = hart.vector.read_element(index_vreg, index_sew, i);
        let row = base.wrapping_add(offset);
        let addr = row.wrapping_add(f as u32 * data_sew.bytes() as u32);
        let value = hart.memory.read(addr, width_of(data_sew));
        hart.vector.write_element(vd + f as u8, data_sew, i, value);
    }
}

fn indexed_store(hart: &mut Hart, base: u32, index_vreg: u8, vd: u8, data_sew: Sew, nf: usize, vm: bool) {
    let index_sew = hart.vector.vtype.sew;
    for (i, f) in iproduct!(0..hart.vector.vl, 0..nf) {
        if !hart.vector.mask_active(vm, i) {
            continue;
        }
        let offset = hart.vector.read_element(index_vreg, index_sew, i);
        let row = base.wrapping_add(offset);
        let addr = row.wrapping_add(f as u32 * data_sew.bytes() as u32);
        let value = hart.vector.read_element(vd + f as u8, data_sew, i);
        hart.memory.write(addr, width_of(data_sew), value);
    }
}

fn whole_register_load(hart: &mut Hart, base: u32, vd: u8, nf: usize) {
    for f in 0..nf {
        let bytes = hart.memory.read_bytes(base.wrapping_add((f * crate::vector::VLEN_BYTES) as u32), crate::vector::VLEN_BYTES);
        hart.vector.registers[(vd as usize + f) & 0x1f].copy_from_slice(&bytes);
    }
}

fn whole_register_store(hart: &mut Hart, base: u32, vd: u8, nf: usize) {
    for f in 0..nf {
        let bytes = hart.vector.registers[(vd as usize + f) & 0x1f];
        hart.memory.write_bytes(base.wrapping_add((f * crate::vector::VLEN_BYTES) as u32), &bytes);
    }
}

fn width_of(sew: Sew) -> Wordsize {
    match sew {
        Sew::E8 => Wordsize::Byte,
        Sew::E16 => Wordsize::Halfword,
        Sew::E32 => Wordsize::Word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hart::Hart;
    use crate::vector::{Lmul, Vtype};

    fn configure(hart: &mut Hart, vl: u32) {
        hart.vector.vtype = Vtype { sew: Sew::E32, lmul: Lmul { numerator: 1, denominator: 1 }, vta: false, vma: false };
        hart.vector.vill = false;
        hart.vector.vl = vl;
    }

    #[test]
    fn unit_stride_round_trips_word_elements() {
        let mut hart = Hart::default();
        configure(&mut hart, 4);
        for i in 0..4u32 {
            hart.vector.write_element(1, Sew::E32, i, 100 + i);
        }
        hart.set_x(2, 0x100);
        unit_stride_store(&mut hart, 0x100, 1, Sew::E32, 1, 4, true);
        let mut dest = crate::hart::Hart::default();
        configure(&mut dest, 4);
        dest.memory = hart.memory.clone();
        unit_stride_load(&mut dest, 0x100, 3, Sew::E32, 1, 4, true);
        for i in 0..4u32 {
            assert_eq!(dest.vector.read_element(3, Sew::E32, i), 100 + i);
        }
    }

    #[test]
    fn eew_maps_width_field_per_this_subsets_simplified_encoding() {
        assert_eq!(eew(0b000), Some(Sew::E8));
        assert_eq!(eew(0b001), Some(Sew::E16));
        assert_eq!(eew(0b010), Some(Sew::E32));
        assert_eq!(eew(0b101), None);
        assert_eq!(eew(0b110), None);
    }

    #[test]
    fn halfword_width_field_round_trips_through_unit_stride_load_store() {
        let mut hart = Hart::default();
        configure(&mut hart, 4);
        hart.vector.vtype.sew = Sew::E16;
        for i in 0..4u32 {
            hart.vector.write_element(1, Sew::E16, i, 1000 + i);
        }
        hart.set_x(2, 0x200);
        // vs1 store, width = 0b001 (E16), unit-stride regular, unmasked
        let store_instr = (0b001 << 12) | (1 << 25) | (2 << 15) | (1 << 7) | crate::decode::OP_VECTOR_STORE;
        execute_store(&mut hart, store_instr);

        let mut dest = Hart::default();
        configure(&mut dest, 4);
        dest.vector.vtype.sew = Sew::E16;
        dest.memory = hart.memory.clone();
        dest.set_x(2, 0x200);
        let load_instr = (0b001 << 12) | (1 << 25) | (2 << 15) | (3 << 7) | crate::decode::OP_VECTOR_LOAD;
        execute_load(&mut dest, load_instr);
        for i in 0..4u32 {
            assert_eq!(dest.vector.read_element(3, Sew::E16, i), 1000 + i);
        }
    }

    #[test]
    fn masked_elements_are_skipped() {
        let mut hart = Hart::default();
        configure(&mut hart, 2);
        hart.vector.write_mask_bit(0, 0, true);
        hart.vector.write_mask_bit(0, 1, false);
        hart.memory.write(0, Wordsize::Word, 0xaaaa_aaaa);
        hart.memory.write(4, Wordsize::Word, 0xbbbb_bbbb);
        hart.vector.write_element(2, Sew::E32, 1, 0xdead_beef);
        unit_stride_load(&mut hart, 0, 2, Sew::E32, 1, 2, false);
        assert_eq!(hart.vector.read_element(2, Sew::E32, 0), 0xaaaa_aaaa);
        assert_eq!(hart.vector.read_element(2, Sew::E32, 1), 0xdead_beef);
    }
}
