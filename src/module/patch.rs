use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Effect, Module, NodeBox},
};

/// A module followed by an effect on its output.
#[derive(Clone)]
pub struct Patch {
    input: Box<dyn Module>,
    effect: Box<dyn Effect>,
}

impl Patch {
    pub fn new(input: Box<dyn Module>, effect: Box<dyn Effect>) -> Self {
        Self { input, effect }
    }
}

impl Module for Patch {
    fn info(&mut self, info: &mut Info<'_>) {
        self.input.info(info);
        self.effect.info(info);
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let mut cont = self.input.process(buf, time, queue);
        cont |= self.effect.process(buf, time, queue);
        cont
    }
}

/// `Patch(module, effect)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(M,E)")?;
    let input = args.module()?;
    let effect = args.effect()?;

    Ok(NodeBox::module(Patch::new(input, effect)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effect::Gain, module::Trig, node::Param, test_support::times};

    #[test]
    fn effect_runs_on_module_output() {
        let mut patch = Patch::new(
            Box::new(Trig::new(1.0)),
            Box::new(Gain::new(Param::flt(0.5))),
        );
        let note = crate::core::Note {
            freq: 100.0,
            ..Default::default()
        };
        patch.info(&mut Info::Note(&note));

        let mut buf = vec![0.0; 3];
        patch.process(&mut buf, &times(3), &Queue::new());
        assert_eq!(buf, vec![50.0; 3]);
    }
}
