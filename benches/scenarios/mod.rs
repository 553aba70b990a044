//! Benchmarks for realistic graphs.

mod engine;
mod synth;

pub use engine::bench_engine;
pub use synth::bench_synth;
