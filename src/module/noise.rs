use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Queue, Time},
    node::{Module, NodeBox},
};

/// White noise in `[-1, 1)` from a linear congruential generator.
#[derive(Clone, Debug)]
pub struct Noise {
    state: u32,
}

impl Noise {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        ((self.state >> 16) & 0x7fff) as f64 / 16384.0 - 1.0
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Module for Noise {
    fn process(&mut self, buf: &mut [f64], _time: &[Time], _queue: &Queue) -> bool {
        for s in buf.iter_mut() {
            *s = self.next();
        }
        false
    }
}

/// `Noise(nil)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "n")?;
    args.nil()?;
    Ok(NodeBox::module(Noise::default()))
}
