//! Retirement tracing.
//!
//! The core never prints anything itself; a `TraceSink` is handed in
//! by the caller (the CLI binary, or a test) and fed one `on_retire`
//! call per instruction. This replaces the direct `println!` calls the
//! interpreter this simulator is modeled on used for its own tracing.

pub trait TraceSink {
    fn on_retire(&mut self, pc: u32, instr: u32);
}

/// The default: tracing costs nothing unless asked for.
#[derive(Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn on_retire(&mut self, _pc: u32, _instr: u32) {}
}

/// `--trace`: one line per retired instruction, in the reference
/// interpreter's `pc: instr` layout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl TraceSink for StdoutSink {
    fn on_retire(&mut self, pc: u32, instr: u32) {
        println!("{pc:08x}: {instr:08x}");
    }
}
