//! amp - play a small node graph on the default output device
//!
//! Run with: cargo run --bin amp

mod app;

use ampsynth::build::Value;
use app::{Amp, VOLUME};
use tracing_subscriber::EnvFilter;

/// One bar of an A minor arpeggio, each note released half a beat later.
fn arpeggio() -> Value {
    let keys = [57, 60, 64, 69, 64, 60, 57, 52];
    let mut entries = Vec::new();

    for (i, key) in keys.into_iter().enumerate() {
        let beat = i as f64 * 0.5;
        entries.push(Value::from(((0, beat), (1, key, 65535))));
        entries.push(Value::from(((0, beat + 0.25), (1, key, 0))));
    }

    Value::call("Repeat", Value::from((0, 1, Value::call("Sched", Value::List(entries)))))
}

fn voice() -> Value {
    let osc = Value::call("Tri", Value::call("Ramp", Value::call("Trig", Value::Num(1.0))));
    let env = Value::call("ADSR", Value::tuple([
        Value::from((0.0, 0.3)),
        Value::tuple([0.005, 0.1, 0.6, 0.2].map(Value::Num)),
    ]));
    Value::call("Mul", Value::from((osc, env)))
}

fn effect() -> Value {
    let (dev, key) = VOLUME;
    let volume = Value::call(
        "Ctrl",
        Value::from(((dev as i32, key as i32), (0.0, 1.0), 0.8)),
    );

    Value::call(
        "Chain",
        Value::list([
            Value::call("Synth", Value::from((1, 8, voice()))),
            Value::call("Gain", volume),
        ]),
    )
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Amp::new()
        .bpm(120.0)
        .bind("amp.seq", arpeggio())
        .bind("amp.effect", effect())
        .run()
}
