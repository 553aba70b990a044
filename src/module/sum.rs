use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Module, NodeBox, Param},
    MAX_BLOCK_SIZE,
};

/// Sum of parameters.
#[derive(Clone, Debug)]
pub struct Sum {
    params: Vec<Param>,
    tmp: Vec<f64>,
}

impl Sum {
    pub fn new(params: Vec<Param>) -> Self {
        Self {
            params,
            tmp: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl Module for Sum {
    fn info(&mut self, info: &mut Info<'_>) {
        for param in &mut self.params {
            param.info(info);
        }
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        buf.fill(0.0);

        let len = buf.len().min(self.tmp.len());
        let mut cont = false;
        for param in &mut self.params {
            if param.is_fast() {
                let v = param.value();
                buf.iter_mut().for_each(|s| *s += v);
                continue;
            }

            let tmp = &mut self.tmp[..len];
            cont |= param.process(tmp, time, queue);
            for (s, t) in buf.iter_mut().zip(tmp.iter()) {
                *s += t;
            }
        }

        cont
    }
}

/// `Sum([param, ...])`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "[P]")?;
    let params = args
        .list()?
        .into_iter()
        .map(|mut item| item.param())
        .collect::<Result<_, _>>()?;

    Ok(NodeBox::module(Sum::new(params)))
}
