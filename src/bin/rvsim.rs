//! Command-line front end: load a flat binary image and run it to
//! completion, mapping the outcome to a process exit code.

use clap::Parser;
use clap_num::maybe_hex;
use rvsim::error::ImageError;
use rvsim::hart::RunOutcome;
use rvsim::trace::{NullSink, StdoutSink, TraceSink};
use rvsim::{SimConfig, Simulator};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "A 32-bit RISC-V (RV32IMV subset) instruction-set simulator")]
struct Args {
    /// Path to the flat binary memory image to load at address 0.
    image: String,

    /// Print one line per retired instruction.
    #[arg(long)]
    trace: bool,

    /// Size of the simulated address space, in bytes.
    #[arg(long, value_parser=maybe_hex::<usize>, default_value_t = rvsim::memory::DEFAULT_MEMORY_BYTES)]
    memory_bytes: usize,

    /// Maximum number of instructions to execute before giving up.
    #[arg(long, value_parser=maybe_hex::<u64>, default_value_t = SimConfig::default().cycle_budget)]
    cycle_budget: u64,
}

fn load_image(path: &str) -> Result<Vec<u8>, ImageError> {
    std::fs::read(path).map_err(|source| ImageError::Io {
        path: path.to_string(),
        source,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    let image = match load_image(&args.image) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("rvsim: {err}");
            return ExitCode::from(1);
        }
    };

    let config = SimConfig {
        memory_bytes: args.memory_bytes,
        cycle_budget: args.cycle_budget,
    };
    let mut sim = Simulator::new(config);
    sim.load_image(&image);

    let mut sink: Box<dyn TraceSink> = if args.trace {
        Box::new(StdoutSink)
    } else {
        Box::new(NullSink)
    };

    match sim.run(sink.as_mut()) {
        RunOutcome::Ecall(code) => ExitCode::from((code & 0xff) as u8),
        RunOutcome::CycleBudgetExceeded => {
            eprintln!("rvsim: cycle budget exhausted without an ECALL");
            ExitCode::from(2)
        }
    }
}
