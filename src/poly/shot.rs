use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Effect, Instrument, Module, NodeBox},
};

/// Restricts a node to the actions of one `(dev, key)`.
///
/// `N` is the boxed instrument, effect or module being wrapped; the wrapper
/// implements the same kind.
#[derive(Clone)]
pub struct Shot<N> {
    dev: u16,
    key: u16,
    node: N,
}

impl<N> Shot<N> {
    pub fn new(dev: u16, key: u16, node: N) -> Self {
        Self { dev, key, node }
    }

    fn filter(&self, queue: &Queue) -> Queue {
        queue.filter(self.dev, self.key)
    }
}

impl Instrument for Shot<Box<dyn Instrument>> {
    fn info(&mut self, info: &mut Info<'_>) {
        self.node.info(info);
    }

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool {
        let filt = self.filter(queue);
        self.node.process(buf, time, &filt)
    }
}

impl Effect for Shot<Box<dyn Effect>> {
    fn info(&mut self, info: &mut Info<'_>) {
        self.node.info(info);
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let filt = self.filter(queue);
        self.node.process(buf, time, &filt)
    }
}

impl Module for Shot<Box<dyn Module>> {
    fn info(&mut self, info: &mut Info<'_>) {
        self.node.info(info);
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let filt = self.filter(queue);
        self.node.process(buf, time, &filt)
    }
}

/// `Shot(node, (dev, key))`, returning a node of the wrapped kind.
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(*,(d,d))")?;
    let node = args.any()?;
    let dev = u16::try_from(args.int()?).map_err(|_| BuildError::invalid("Invalid device ID."))?;
    let key = u16::try_from(args.int()?).map_err(|_| BuildError::invalid("Invalid device ID."))?;

    match node {
        NodeBox::Instr(instr) => Ok(NodeBox::instr(Shot::new(dev, key, instr))),
        NodeBox::Effect(effect) => Ok(NodeBox::effect(Shot::new(dev, key, effect))),
        NodeBox::Module(module) => Ok(NodeBox::module(Shot::new(dev, key, module))),
        other => Err(BuildError::invalid(format!(
            "Shot cannot wrap a {}.",
            other.kind()
        ))),
    }
}
