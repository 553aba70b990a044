use std::f64::consts::TAU;

use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Module, NodeBox},
    MAX_BLOCK_SIZE,
};

/// Waveform shapes, in the order the `eO` format tag names them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Tri,
    Square,
    Impulse,
}

impl Wave {
    pub fn from_tag(tag: usize) -> Option<Self> {
        match tag {
            0 => Some(Wave::Sine),
            1 => Some(Wave::Tri),
            2 => Some(Wave::Square),
            3 => Some(Wave::Impulse),
            _ => None,
        }
    }

    /// Value of a stateless waveform at `phase` in `[0, 1)`.
    #[inline]
    pub fn at(self, phase: f64) -> f64 {
        match self {
            Wave::Sine => (TAU * phase).sin(),
            Wave::Tri => 4.0 * (phase + (phase - 0.75).abs() - (phase - 0.25).abs()) - 2.0,
            Wave::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Wave::Impulse => 0.0,
        }
    }
}

/// Shapes a phase signal (usually a `Ramp`) into a waveform.
///
/// The impulse wave fires once per cycle, on the first sample whose phase is
/// below 0.25, and re-arms once the phase passes 0.75. A fresh note re-arms it.
#[derive(Clone)]
pub struct Osc {
    wave: Wave,
    phase: Box<dyn Module>,
    armed: bool,
    tmp: Vec<f64>,
}

impl Osc {
    pub fn new(wave: Wave, phase: Box<dyn Module>) -> Self {
        Self {
            wave,
            phase,
            armed: true,
            tmp: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn wave(&self) -> Wave {
        self.wave
    }
}

impl Module for Osc {
    fn info(&mut self, info: &mut Info<'_>) {
        if info.note().is_some_and(|note| note.init) {
            self.armed = true;
        }
        self.phase.info(info);
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let len = buf.len().min(self.tmp.len());
        let phase = &mut self.tmp[..len];
        let cont = self.phase.process(phase, time, queue);

        match self.wave {
            Wave::Impulse => {
                let mut armed = self.armed;
                for (s, &p) in buf.iter_mut().zip(phase.iter()) {
                    *s = 0.0;
                    if armed && p < 0.25 {
                        armed = false;
                        *s = 1.0;
                    } else if !armed && p > 0.75 {
                        armed = true;
                    }
                }
                self.armed = armed;
            }
            wave => {
                for (s, &p) in buf.iter_mut().zip(phase.iter()) {
                    *s = wave.at(p);
                }
            }
        }

        cont
    }
}

/// `Osc(wave, phase)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(eO,M)")?;
    let tag = args.tag()?;
    let phase = args.module()?;
    let wave = Wave::from_tag(tag).ok_or_else(|| BuildError::invalid("Unknown waveform."))?;

    Ok(NodeBox::module(Osc::new(wave, phase)))
}

fn make_wave(value: Value, wave: Wave) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "M")?;
    Ok(NodeBox::module(Osc::new(wave, args.module()?)))
}

/// `Sine(phase)`
pub fn make_sine(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    make_wave(value, Wave::Sine)
}

/// `Tri(phase)`
pub fn make_tri(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    make_wave(value, Wave::Tri)
}

/// `Square(phase)`
pub fn make_square(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    make_wave(value, Wave::Square)
}

/// `Impulse(phase)`
pub fn make_impulse(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    make_wave(value, Wave::Impulse)
}
