use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Module, NodeBox, Param},
    MAX_BLOCK_SIZE,
};

/// Product of two parameters, typically an oscillator and an envelope.
#[derive(Clone, Debug)]
pub struct Mul {
    left: Param,
    right: Param,
    tmp: Vec<f64>,
}

impl Mul {
    pub fn new(left: Param, right: Param) -> Self {
        Self {
            left,
            right,
            tmp: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl Module for Mul {
    fn info(&mut self, info: &mut Info<'_>) {
        self.left.info(info);
        self.right.info(info);
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        // A fast side is a scalar; render the other side straight into `buf`.
        let (signal, scale) = if self.right.is_fast() {
            (&mut self.left, self.right.value())
        } else if self.left.is_fast() {
            (&mut self.right, self.left.value())
        } else {
            let len = buf.len().min(self.tmp.len());
            let tmp = &mut self.tmp[..len];

            let mut cont = self.left.process(buf, time, queue);
            cont |= self.right.process(tmp, time, queue);

            for (s, r) in buf.iter_mut().zip(tmp.iter()) {
                *s *= r;
            }
            return cont;
        };

        let cont = signal.process(buf, time, queue);
        for s in buf.iter_mut() {
            *s *= scale;
        }
        cont
    }
}

/// `Mul(param, param)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(P,P)")?;
    let left = args.param()?;
    let right = args.param()?;

    Ok(NodeBox::module(Mul::new(left, right)))
}
