use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Effect, Instrument, NodeBox},
};

/// Runs one effect on a single channel (0 = left, 1 = right).
#[derive(Clone)]
pub struct Single {
    idx: usize,
    effect: Box<dyn Effect>,
}

impl Single {
    pub fn new(idx: usize, effect: Box<dyn Effect>) -> Self {
        Self { idx, effect }
    }
}

impl Instrument for Single {
    fn info(&mut self, info: &mut Info<'_>) {
        if matches!(info, Info::Action(_)) {
            self.effect.info(info);
        }
    }

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool {
        match buf.get_mut(self.idx) {
            Some(chan) => self.effect.process(chan, time, queue),
            None => false,
        }
    }
}

/// `Single(channel, effect)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(d,E)")?;
    let idx = args.int()?;
    let effect = args.effect()?;

    let idx = usize::try_from(idx).map_err(|_| BuildError::invalid("Invalid channel."))?;

    Ok(NodeBox::instr(Single::new(idx, effect)))
}
