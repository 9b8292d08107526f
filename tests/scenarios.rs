//! End-to-end scenarios driven through the public `Simulator` API
//! rather than individual executor functions.

use rvsim::hart::RunOutcome;
use rvsim::memory::Wordsize;
use rvsim::trace::NullSink;
use rvsim::vector::Sew;
use rvsim::{SimConfig, Simulator};

fn simulator() -> Simulator {
    Simulator::new(SimConfig::default())
}

#[test]
fn addi_wraps_to_zero() {
    let mut sim = simulator();
    sim.hart.set_x(1, 0xffff_ffff);
    sim.hart.memory.write(0, Wordsize::Word, 0x0010_8113); // addi x2, x1, 1
    sim.hart.step();
    assert_eq!(sim.hart.x(2), 0);
    assert_eq!(sim.hart.pc, 4);
}

#[test]
fn lui_addi_sw_lw_round_trips_through_memory() {
    let mut sim = simulator();
    sim.load_image(&[
        0xb7, 0x50, 0x34, 0x12, // lui x1, 0x12345
        0x93, 0x80, 0x70, 0x67, // addi x1, x1, 0x678
        0x23, 0x20, 0x10, 0x00, // sw x1, 0(x0)
        0x03, 0x21, 0x00, 0x00, // lw x2, 0(x0)
        0x73, 0x00, 0x00, 0x00, // ecall
    ]);
    sim.hart.set_x(3, 0);
    let mut sink = NullSink;
    assert_eq!(sim.run(&mut sink), RunOutcome::Ecall(0));
    assert_eq!(sim.hart.x(1), 0x1234_5678);
    assert_eq!(sim.hart.x(2), 0x1234_5678);
    assert_eq!(sim.hart.memory.read_bytes(0, 4), vec![0x78, 0x56, 0x34, 0x12]);
}

#[test]
fn branch_taken_jumps_forward_by_eight() {
    let mut sim = simulator();
    sim.hart.pc = 0x40;
    sim.hart.set_x(1, 5);
    sim.hart.set_x(2, 5);
    sim.hart.memory.write(0x40, Wordsize::Word, 0x0020_8463); // beq x1, x2, +8
    sim.hart.step();
    assert_eq!(sim.hart.pc, 0x48);
}

#[test]
fn div_rem_divu_corner_cases() {
    let mut sim = simulator();
    sim.hart.set_x(1, 0x8000_0000);
    sim.hart.set_x(2, 0xffff_ffff);
    sim.hart.memory.write(0, Wordsize::Word, 0x0220_c1b3); // div x3, x1, x2
    sim.hart.memory.write(4, Wordsize::Word, 0x0220_e233); // rem x4, x1, x2
    sim.hart.set_x(5, 0); // divisor for the divu case below
    sim.hart.memory.write(8, Wordsize::Word, 0x0250_d2b3); // divu x5, x1, x5
    sim.hart.step();
    sim.hart.step();
    sim.hart.step();
    assert_eq!(sim.hart.x(3), 0x8000_0000);
    assert_eq!(sim.hart.x(4), 0);
    assert_eq!(sim.hart.x(5), 0xffff_ffff);
}

#[test]
fn vsetvli_floors_vlmax_and_vector_add_operates_elementwise() {
    let mut sim = simulator();
    // vsetvli x1, x0, e32, m1, ta, ma
    let vtypei: u32 = 0b1101_0000; // vma=1, vta=1, vsew=e32(010), vlmul=1(000)
    let instr = (vtypei << 20) | (0b111 << 12) | (1 << 7) | rvsim::decode::OP_VECTOR;
    sim.hart.memory.write(0, Wordsize::Word, instr);
    sim.hart.step();

    assert_eq!(sim.hart.x(1), 4);
    assert_eq!(sim.hart.vector.vl, 4);
    assert!(!sim.hart.vector.vill);

    for i in 0..4u32 {
        sim.hart.vector.write_element(1, Sew::E32, i, i + 1); // v1 = 1,2,3,4
        sim.hart.vector.write_element(2, Sew::E32, i, (i + 1) * 10); // v2 = 10,20,30,40
    }

    // vadd.vv v3, v1, v2, vm=1
    let vadd = (0x00u32 << 26) | (1 << 25) | (2 << 20) | (1 << 15) | (3 << 7) | rvsim::decode::OP_VECTOR;
    sim.hart.memory.write(4, Wordsize::Word, vadd);
    sim.hart.step();

    for i in 0..4u32 {
        assert_eq!(sim.hart.vector.read_element(3, Sew::E32, i), 11 + i * 11);
    }
    assert_eq!(sim.hart.vector.vl, 4);
}

#[test]
fn cycle_budget_exceeded_terminates_without_ecall() {
    let mut sim = Simulator::new(SimConfig { cycle_budget: 2, ..SimConfig::default() });
    sim.hart.memory.write(0, Wordsize::Word, 0x0000_0013); // addi x0, x0, 0
    sim.hart.memory.write(4, Wordsize::Word, 0x0000_0013);
    sim.hart.memory.write(8, Wordsize::Word, 0x0000_0013);
    let mut sink = NullSink;
    assert_eq!(sim.run(&mut sink), RunOutcome::CycleBudgetExceeded);
}
