use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Module, NodeBox},
};

/*
Exponential ADSR
================

The envelope level moves by constant per-sample factors, so every stage is
an exponential curve. Levels never drop below a floor of 0.01, which is
subtracted from the output so silence reads as exactly 0:

    level
     peak ┤    ╱╲
          │   ╱  ╲___________ sustain = peak * sus
          │  ╱               ╲
     0.01 ┼─╯                 ╲___ floor
          └─────────────────────── t
            atk  decay   (held) rel

A note with velocity > 0 sets the peak to `min + (max - min) * vel` and
starts the attack from wherever the level is. A note with velocity 0 starts
the release. The envelope keeps running after it reaches the floor; it just
reports no continuation until the next note.
*/

const FLOOR: f64 = 0.01;

#[derive(Clone, Debug)]
pub struct Adsr {
    min: f64,
    max: f64,
    /// Releasing.
    on: bool,
    v: f64,
    atk: f64,
    decay: f64,
    sus: f64,
    rel: f64,
    target: [f64; 2],
}

impl Adsr {
    /// Stage times are in seconds; `sus` is a fraction of the peak.
    pub fn new(min: f64, max: f64, atk: f64, decay: f64, sus: f64, rel: f64, rate: u32) -> Self {
        let rate = rate as f64;
        let sus = sus.max(FLOOR);
        let rel_target = if sus == FLOOR { FLOOR } else { FLOOR / sus };

        Self {
            min,
            max,
            on: false,
            v: FLOOR,
            atk: (1.0 / FLOOR).powf(1.0 / (atk * rate)),
            decay: sus.powf(1.0 / (decay * rate)),
            sus,
            rel: rel_target.powf(1.0 / (rel * rate)),
            target: [FLOOR; 2],
        }
    }

    /// Current level above the floor.
    pub fn level(&self) -> f64 {
        self.v - FLOOR
    }
}

impl Module for Adsr {
    fn info(&mut self, info: &mut Info<'_>) {
        let Some(note) = info.note() else {
            return;
        };

        let vel = if note.vel > 0.0 {
            self.on = false;
            self.min + (self.max - self.min) * note.vel
        } else {
            self.on = true;
            0.0
        };

        self.target = [vel.max(FLOOR), (vel * self.sus).max(FLOOR)];
    }

    fn process(&mut self, buf: &mut [f64], _time: &[Time], _queue: &Queue) -> bool {
        let mut v = self.v;

        for s in buf.iter_mut() {
            if v < self.target[0] {
                v *= self.atk;
                if v >= self.target[0] {
                    v = self.target[0];
                    self.target[0] = self.target[1];
                }
            } else if v > self.target[0] {
                v *= if self.on { self.rel } else { self.decay };
                if v <= self.target[0] {
                    v = self.target[0];
                    self.target[0] = self.target[1];
                }
            }

            *s = v - FLOOR;
        }

        self.v = v;
        v > FLOOR
    }
}

/// `ADSR((min, max), (atk, decay, sus, rel))`
pub fn make(value: Value, cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "((f,f),(f,f,f,f))")?;
    let min = args.num()?;
    let max = args.num()?;
    let atk = args.num()?;
    let decay = args.num()?;
    let sus = args.num()?;
    let rel = args.num()?;

    if !(atk > 0.0 && decay > 0.0 && rel > 0.0) {
        return Err(BuildError::invalid("Envelope times must be positive."));
    }

    Ok(NodeBox::module(Adsr::new(min, max, atk, decay, sus, rel, cx.rate)))
}
