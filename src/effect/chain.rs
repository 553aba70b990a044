use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Effect, NodeBox},
};

/// Effects applied one after another on the same buffer.
#[derive(Clone, Default)]
pub struct Chain {
    effects: Vec<Box<dyn Effect>>,
}

impl Chain {
    pub fn new(effects: Vec<Box<dyn Effect>>) -> Self {
        Self { effects }
    }

    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Effect for Chain {
    fn info(&mut self, info: &mut Info<'_>) {
        for effect in &mut self.effects {
            effect.info(info);
        }
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let mut cont = false;
        for effect in &mut self.effects {
            cont |= effect.process(buf, time, queue);
        }
        cont
    }
}

/// `Chain([effect, ...])`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "[E]")?;
    let effects = args
        .list()?
        .into_iter()
        .map(|mut item| item.effect())
        .collect::<Result<_, _>>()?;

    Ok(NodeBox::effect(Chain::new(effects)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effect::Gain, node::Param, test_support::times};

    #[test]
    fn applies_in_order() {
        let mut chain = Chain::new(vec![
            Box::new(Gain::new(Param::flt(0.5))),
            Box::new(Gain::new(Param::flt(3.0))),
        ]);
        let mut buf = vec![2.0; 8];

        chain.process(&mut buf, &times(8), &Queue::new());

        assert!(buf.iter().all(|&s| s == 3.0));
    }

    #[test]
    fn empty_chain_is_identity() {
        let mut chain = Chain::default();
        let mut buf = vec![0.7; 4];
        assert!(!chain.process(&mut buf, &times(4), &Queue::new()));
        assert_eq!(buf, vec![0.7; 4]);
    }

    #[test]
    fn constructor_rejects_non_effects() {
        let cx = BuildContext::default();
        let gain = NodeBox::effect(Gain::new(Param::flt(1.0)));
        assert!(make(Value::list([Value::Box(gain)]), &cx).is_ok());
        assert_eq!(
            make(Value::list([Value::Num(1.0)]), &cx)
                .err()
                .map(|e| e.to_string())
                .as_deref(),
            Some("Type error. Expected '[Effect]'.")
        );
    }
}
