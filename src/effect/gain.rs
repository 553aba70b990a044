use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Effect, NodeBox, Param},
    MAX_BLOCK_SIZE,
};

/// Multiplies the signal by a parameter.
#[derive(Clone, Debug)]
pub struct Gain {
    scale: Param,
    tmp: Vec<f64>,
}

impl Gain {
    pub fn new(scale: Param) -> Self {
        Self {
            scale,
            tmp: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn scale(&self) -> &Param {
        &self.scale
    }
}

impl Effect for Gain {
    fn info(&mut self, info: &mut Info<'_>) {
        self.scale.info(info);
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        if self.scale.is_fast() {
            let g = self.scale.value();
            for s in buf.iter_mut() {
                *s *= g;
            }
            return false;
        }

        let len = buf.len().min(self.tmp.len());
        let tmp = &mut self.tmp[..len];
        let cont = self.scale.process(tmp, time, queue);
        for (s, g) in buf.iter_mut().zip(tmp.iter()) {
            *s *= g;
        }

        cont
    }
}

/// `Gain(scale)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "P")?;
    Ok(NodeBox::effect(Gain::new(args.param()?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Action, Event},
        module::Ramp,
        node::Ctrl,
        test_support::times,
    };

    #[test]
    fn constant_scales_block() {
        let mut gain = Gain::new(Param::flt(0.5));
        let mut buf = vec![1.0, -2.0, 4.0];
        gain.process(&mut buf, &times(3), &Queue::new());
        assert_eq!(buf, vec![0.5, -1.0, 2.0]);
    }

    #[test]
    fn controller_changes_gain_between_blocks() {
        let mut gain = Gain::new(Param::ctrl(Ctrl::linear(0, 7, 0.0, 2.0, 1.0)));
        let action = Action::new(0, Event::new(0, 7, 0));
        gain.info(&mut Info::Action(&action));

        let mut buf = vec![1.0; 4];
        gain.process(&mut buf, &times(4), &Queue::new());
        assert_eq!(buf, vec![0.0; 4]);
    }

    #[test]
    fn module_scale_is_per_sample() {
        let mut gain = Gain::new(Param::module(Box::new(Ramp::new(Param::flt(12_000.0), 48_000))));
        let mut buf = vec![1.0; 4];
        gain.process(&mut buf, &times(4), &Queue::new());
        assert_eq!(buf, vec![0.25, 0.5, 0.75, 0.0]);
    }
}
