//! Benchmarks for low-level node primitives.

mod osc;
mod param;
mod queue;

pub use osc::bench_osc;
pub use param::bench_param;
pub use queue::bench_queue;
