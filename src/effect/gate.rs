use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Effect, NodeBox},
    MAX_BLOCK_SIZE,
};

/// Runs two effects on copies of the input and multiplies the results.
#[derive(Clone)]
pub struct Gate {
    left: Box<dyn Effect>,
    right: Box<dyn Effect>,
    tmp: [Vec<f64>; 2],
}

impl Gate {
    pub fn new(left: Box<dyn Effect>, right: Box<dyn Effect>) -> Self {
        Self {
            left,
            right,
            tmp: [vec![0.0; MAX_BLOCK_SIZE], vec![0.0; MAX_BLOCK_SIZE]],
        }
    }
}

impl Effect for Gate {
    fn info(&mut self, info: &mut Info<'_>) {
        self.left.info(info);
        self.right.info(info);
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let len = buf.len().min(MAX_BLOCK_SIZE);
        let [a, b] = &mut self.tmp;
        let (a, b) = (&mut a[..len], &mut b[..len]);

        a.copy_from_slice(&buf[..len]);
        b.copy_from_slice(&buf[..len]);

        let mut cont = self.left.process(a, time, queue);
        cont |= self.right.process(b, time, queue);

        for ((s, x), y) in buf.iter_mut().zip(a.iter()).zip(b.iter()) {
            *s = x * y;
        }

        cont
    }
}

/// `Gate(effect, effect)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(E,E)")?;
    let left = args.effect()?;
    let right = args.effect()?;

    Ok(NodeBox::effect(Gate::new(left, right)))
}
