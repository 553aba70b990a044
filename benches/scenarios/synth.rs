//! Benchmarks for a polyphonic synth with all voices held.

use std::hint::black_box;

use ampsynth::{
    core::{Action, Event, Info, Queue},
    effect::Synth,
    module::{Adsr, Mul, Osc, Ramp, Trig, Wave},
    node::{Effect, Param},
};
use criterion::{BenchmarkId, Criterion};

use crate::{times, BLOCK_SIZES};

fn voice() -> Mul {
    let phase = Ramp::new(Param::module(Box::new(Trig::new(1.0))), 48_000);
    let osc = Osc::new(Wave::Tri, Box::new(phase));
    let env = Adsr::new(0.0, 0.3, 0.005, 0.1, 0.6, 0.2, 48_000);
    Mul::new(Param::module(Box::new(osc)), Param::module(Box::new(env)))
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");
    let queue = Queue::new();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];
        let time = times(size);

        for voices in [1usize, 8, 32] {
            let mut synth = Synth::new(1, voices, Box::new(voice()));
            for v in 0..voices {
                let action = Action::new(0, Event::new(1, 48 + v as u16, u16::MAX));
                synth.info(&mut Info::Action(&action));
            }

            let id = format!("{}v", voices);
            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, _| {
                b.iter(|| synth.process(black_box(&mut buffer), &time, &queue))
            });
        }
    }

    group.finish();
}
