//! Error taxonomy for the simulator core.
//!
//! Architecturally-unusual conditions (illegal vector configuration,
//! unsupported vector feature, unknown opcode) are silent no-ops
//! rather than errors, so the core itself never returns a `Result`
//! from instruction execution. The one real failure mode left is
//! outside the core: loading a program image from disk.

use thiserror::Error;

/// Failure to load a program image from disk. Owned by the `rvsim`
/// binary rather than the core library — the core only ever sees
/// bytes already in memory.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("could not read program image {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
