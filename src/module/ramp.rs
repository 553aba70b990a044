use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Module, NodeBox, Param},
    MAX_BLOCK_SIZE,
};

/// Phase accumulator in `[0, 1)` running at the frequency parameter.
///
/// Each output sample is the phase after that sample's increment. A fresh
/// note resets the phase to zero.
#[derive(Clone, Debug)]
pub struct Ramp {
    freq: Param,
    v: f64,
    rate: f64,
    tmp: Vec<f64>,
}

impl Ramp {
    pub fn new(freq: Param, rate: u32) -> Self {
        Self {
            freq,
            v: 0.0,
            rate: rate as f64,
            tmp: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    #[inline]
    fn step(&self, freq: f64) -> f64 {
        if self.rate > 0.0 {
            freq / self.rate
        } else {
            0.0
        }
    }
}

#[inline]
fn advance(v: f64, step: f64) -> f64 {
    (v + step).rem_euclid(1.0)
}

impl Module for Ramp {
    fn info(&mut self, info: &mut Info<'_>) {
        self.freq.info(info);
        if info.note().is_some_and(|note| note.init) {
            self.v = 0.0;
        }
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let mut v = self.v;

        let cont = if self.freq.is_fast() {
            let inc = self.step(self.freq.value());
            for s in buf.iter_mut() {
                v = advance(v, inc);
                *s = v;
            }
            false
        } else {
            let len = buf.len().min(self.tmp.len());
            let cont = self.freq.process(&mut self.tmp[..len], time, queue);
            for (s, &f) in buf.iter_mut().zip(self.tmp.iter()) {
                v = advance(v, self.step(f));
                *s = v;
            }
            cont
        };

        self.v = v;
        cont
    }
}

/// `Ramp(freq)`
pub fn make(value: Value, cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "P")?;
    Ok(NodeBox::module(Ramp::new(args.param()?, cx.rate)))
}
