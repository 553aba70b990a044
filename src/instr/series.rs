use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Instrument, NodeBox},
};

/// Instruments applied one after another on the same stereo buffer.
///
/// Each instrument sees what the previous one wrote, so a source followed by
/// a `Pan` places that source in the stereo field.
#[derive(Clone, Default)]
pub struct Series {
    instrs: Vec<Box<dyn Instrument>>,
}

impl Series {
    pub fn new(instrs: Vec<Box<dyn Instrument>>) -> Self {
        Self { instrs }
    }

    pub fn push(&mut self, instr: Box<dyn Instrument>) {
        self.instrs.push(instr);
    }
}

impl Instrument for Series {
    fn info(&mut self, info: &mut Info<'_>) {
        for instr in &mut self.instrs {
            instr.info(info);
        }
    }

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool {
        let mut cont = false;
        for instr in &mut self.instrs {
            cont |= instr.process(buf, time, queue);
        }
        cont
    }
}

/// `Series([instr, ...])`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "[I]")?;
    let instrs = args
        .list()?
        .into_iter()
        .map(|mut item| item.instr())
        .collect::<Result<_, _>>()?;

    Ok(NodeBox::instr(Series::new(instrs)))
}
