use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Module, NodeBox},
};

/// Outputs the current note's frequency times a multiplier.
#[derive(Clone, Debug)]
pub struct Trig {
    freq: f64,
    mul: f64,
}

impl Trig {
    pub fn new(mul: f64) -> Self {
        Self { freq: 0.0, mul }
    }
}

impl Module for Trig {
    fn info(&mut self, info: &mut Info<'_>) {
        if let Some(note) = info.note() {
            self.freq = note.freq * self.mul;
        }
    }

    fn process(&mut self, buf: &mut [f64], _time: &[Time], _queue: &Queue) -> bool {
        buf.fill(self.freq);
        false
    }
}

/// `Trig(mul)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "f")?;
    Ok(NodeBox::module(Trig::new(args.num()?)))
}
