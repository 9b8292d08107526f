#![forbid(unsafe_code)]

pub mod csr;
pub mod decode;
pub mod error;
pub mod fields;
pub mod hart;
pub mod memory;
pub mod registers;
pub mod rv32i;
pub mod rv32m;
pub mod trace;
pub mod vector;

use hart::{Hart, RunOutcome, StepOutcome};
use memory::Memory;
use trace::TraceSink;

/// Knobs the CLI front-end exposes; everything else about a run is
/// architectural state owned by `Hart`.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub memory_bytes: usize,
    pub cycle_budget: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            memory_bytes: memory::DEFAULT_MEMORY_BYTES,
            cycle_budget: 1_000_000_000,
        }
    }
}

/// Top-level handle: a hart plus the config it was built with. Owns
/// the run loop so the CLI binary (and integration tests) never touch
/// `Hart::step` directly.
pub struct Simulator {
    pub hart: Hart,
    pub config: SimConfig,
}

impl Simulator {
    pub fn new(config: SimConfig) -> Self {
        let memory = Memory::new(config.memory_bytes);
        Self {
            hart: Hart::new(memory),
            config,
        }
    }

    pub fn load_image(&mut self, image: &[u8]) {
        self.hart.memory.load_image(image);
    }

    /// Run to completion, feeding every retired instruction to `sink`.
    pub fn run(&mut self, sink: &mut dyn TraceSink) -> RunOutcome {
        for _ in 0..self.config.cycle_budget {
            let pc = self.hart.pc;
            let instr = self.hart.fetch();
            let outcome = self.hart.step();
            sink.on_retire(pc, instr);
            if let StepOutcome::Ecall(code) = outcome {
                return RunOutcome::Ecall(code);
            }
        }
        RunOutcome::CycleBudgetExceeded
    }
}
