//! Benchmarks for a complete engine block built from script values.

use std::hint::black_box;

use ampsynth::{
    build::{Env, Value},
    engine::{Engine, EngineConfig, Graph},
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

fn script() -> (Value, Value) {
    let mut notes = Vec::new();
    for i in 0..16 {
        let beat = i as f64 * 0.25;
        notes.push(Value::from(((0, beat), (1, 48 + i, 65535))));
        notes.push(Value::from(((0, beat + 0.125), (1, 48 + i, 0))));
    }
    let seq = Value::call("Repeat", Value::from((0, 1, Value::call("Sched", Value::List(notes)))));

    let osc = Value::call("Square", Value::call("Ramp", Value::call("Trig", Value::Num(1.0))));
    let env = Value::call(
        "ADSR",
        Value::tuple([
            Value::from((0.0, 0.3)),
            Value::tuple([0.002, 0.05, 0.5, 0.1].map(Value::Num)),
        ]),
    );
    let voice = Value::call("Mul", Value::from((osc, env)));
    let synth = Value::call("Synth", Value::from((1, 16, voice)));
    let effect = Value::call(
        "Chain",
        Value::list([synth, Value::call("Gain", Value::Num(0.5))]),
    );

    (seq, effect)
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let env = Env::core();

    for &size in BLOCK_SIZES {
        let mut engine = Engine::new(EngineConfig::default());
        let cx = engine.context();
        let (seq, effect) = script();

        let mut graph = Graph::new();
        if let (Ok(seq), Ok(effect)) = (env.eval(seq, &cx), env.eval(effect, &cx)) {
            let _ = graph.bind("amp.seq", seq);
            let _ = graph.bind("amp.effect", effect);
        }
        graph.run = Some(true);
        engine.load(graph);

        let mut left = vec![0.0f64; size];
        let mut right = vec![0.0f64; size];

        group.bench_with_input(BenchmarkId::new("arpeggio", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut left), black_box(&mut right)))
        });
    }

    group.finish();
}
