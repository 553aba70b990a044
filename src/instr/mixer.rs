use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Instrument, NodeBox},
    MAX_BLOCK_SIZE,
};

/// Sums several instruments. Each one sees the same input.
#[derive(Clone)]
pub struct Mixer {
    instrs: Vec<Box<dyn Instrument>>,
    input: [Vec<f64>; 2],
    output: [Vec<f64>; 2],
}

impl Mixer {
    pub fn new(instrs: Vec<Box<dyn Instrument>>) -> Self {
        Self {
            instrs,
            input: [vec![0.0; MAX_BLOCK_SIZE], vec![0.0; MAX_BLOCK_SIZE]],
            output: [vec![0.0; MAX_BLOCK_SIZE], vec![0.0; MAX_BLOCK_SIZE]],
        }
    }

    pub fn push(&mut self, instr: Box<dyn Instrument>) {
        self.instrs.push(instr);
    }
}

impl Instrument for Mixer {
    fn info(&mut self, info: &mut Info<'_>) {
        for instr in &mut self.instrs {
            instr.info(info);
        }
    }

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool {
        let len = buf[0].len().min(buf[1].len()).min(MAX_BLOCK_SIZE);

        for ch in 0..2 {
            self.input[ch][..len].copy_from_slice(&buf[ch][..len]);
            self.output[ch][..len].fill(0.0);
        }

        let mut cont = false;
        for instr in &mut self.instrs {
            for ch in 0..2 {
                buf[ch][..len].copy_from_slice(&self.input[ch][..len]);
            }

            cont |= instr.process(buf, time, queue);

            for ch in 0..2 {
                for (o, s) in self.output[ch][..len].iter_mut().zip(buf[ch].iter()) {
                    *o += s;
                }
            }
        }

        for ch in 0..2 {
            buf[ch][..len].copy_from_slice(&self.output[ch][..len]);
        }

        cont
    }
}

/// `Mixer([instr, ...])`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "[I]")?;
    let instrs = args
        .list()?
        .into_iter()
        .map(|mut item| item.instr())
        .collect::<Result<_, _>>()?;

    Ok(NodeBox::instr(Mixer::new(instrs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effect::Gain, instr::Single, node::Param, test_support::times};

    #[test]
    fn sums_instruments_over_shared_input() {
        let mut mixer = Mixer::new(vec![
            Box::new(Single::new(0, Box::new(Gain::new(Param::flt(2.0))))),
            Box::new(Single::new(1, Box::new(Gain::new(Param::flt(3.0))))),
        ]);

        let mut left = vec![1.0; 4];
        let mut right = vec![1.0; 4];
        mixer.process(&mut [&mut left, &mut right], &times(4), &Queue::new());

        // left: 2 + 1 (second instrument leaves left untouched)
        assert_eq!(left, vec![3.0; 4]);
        assert_eq!(right, vec![4.0; 4]);
    }

    #[test]
    fn empty_mixer_is_silent() {
        let mut mixer = Mixer::new(Vec::new());
        let mut left = vec![1.0; 4];
        let mut right = vec![1.0; 4];
        mixer.process(&mut [&mut left, &mut right], &times(4), &Queue::new());
        assert_eq!(left, vec![0.0; 4]);
        assert_eq!(right, vec![0.0; 4]);
    }
}
