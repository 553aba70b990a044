//! Benchmarks for oscillator waveforms driven by a ramp.

use std::hint::black_box;

use ampsynth::{
    core::Queue,
    module::{Osc, Ramp, Wave},
    node::{Module, Param},
};
use criterion::{BenchmarkId, Criterion};

use crate::{times, BLOCK_SIZES};

pub fn bench_osc(c: &mut Criterion) {
    let mut group = c.benchmark_group("nodes/osc");
    let queue = Queue::new();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];
        let time = times(size);

        for (name, wave) in [
            ("sine", Wave::Sine),
            ("tri", Wave::Tri),
            ("square", Wave::Square),
            ("impulse", Wave::Impulse),
        ] {
            let mut osc = Osc::new(wave, Box::new(Ramp::new(Param::flt(440.0), 48_000)));
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| osc.process(black_box(&mut buffer), &time, &queue))
            });
        }
    }

    group.finish();
}
