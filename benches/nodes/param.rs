//! Benchmarks for fast and slow parameter evaluation.

use std::hint::black_box;

use ampsynth::{
    core::Queue,
    module::Ramp,
    node::{Ctrl, Param},
};
use criterion::{BenchmarkId, Criterion};

use crate::{times, BLOCK_SIZES};

pub fn bench_param(c: &mut Criterion) {
    let mut group = c.benchmark_group("nodes/param");
    let queue = Queue::new();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];
        let time = times(size);

        let mut flt = Param::flt(0.5);
        group.bench_with_input(BenchmarkId::new("flt", size), &size, |b, _| {
            b.iter(|| flt.process(black_box(&mut buffer), &time, &queue))
        });

        let mut ctrl = Param::ctrl(Ctrl::linear(1, 7, 0.0, 1.0, 0.5));
        group.bench_with_input(BenchmarkId::new("ctrl", size), &size, |b, _| {
            b.iter(|| ctrl.process(black_box(&mut buffer), &time, &queue))
        });

        let mut module = Param::module(Box::new(Ramp::new(Param::flt(440.0), 48_000)));
        group.bench_with_input(BenchmarkId::new("module", size), &size, |b, _| {
            b.iter(|| module.process(black_box(&mut buffer), &time, &queue))
        });
    }

    group.finish();
}
