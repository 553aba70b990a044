use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{NodeBox, Sequencer},
};

/// Gates a child sequencer on a controller key.
///
/// A nonzero value on `(dev, key)` switches the child on, zero switches it
/// off. The child only sees the stretches of the block where it is on; its
/// events are written at their position in the full block.
#[derive(Clone)]
pub struct Enable {
    dev: u16,
    key: u16,
    on: bool,
    seq: Box<dyn Sequencer>,
    tmp: Queue,
    out: Queue,
}

impl Enable {
    pub fn new(dev: u16, key: u16, seq: Box<dyn Sequencer>) -> Self {
        Self {
            dev,
            key,
            on: false,
            seq,
            tmp: Queue::new(),
            out: Queue::new(),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Run the child over `time`, which starts `offset` samples into the block.
    fn run(&mut self, time: &[Time], offset: usize) {
        if time.len() < 2 {
            return;
        }

        self.tmp.clear();
        self.seq.process(time, &mut self.tmp);

        for action in self.tmp.iter() {
            self.out.add(action.event, action.delay + offset as u32);
        }
    }
}

impl Sequencer for Enable {
    fn info(&mut self, info: &mut Info<'_>) {
        self.seq.info(info);
    }

    fn process(&mut self, time: &[Time], queue: &mut Queue) {
        let Some(len) = time.len().checked_sub(1) else {
            return;
        };

        self.out.clear();
        let mut idx = 0;

        for action in queue.iter() {
            if !action.event.matches(self.dev, self.key) {
                continue;
            }

            let on = action.event.val > 0;
            if on == self.on {
                continue;
            }

            let at = (action.delay as usize).min(len);
            if self.on {
                self.run(&time[idx..=at], idx);
            }
            idx = at;
            self.on = on;
        }

        if self.on {
            self.run(&time[idx..=len], idx);
        }

        for action in self.out.iter() {
            queue.add(action.event, action.delay);
        }
    }
}

/// `Enable((dev,key), seq)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "((d,d),S)")?;
    let dev = args.int()?;
    let key = args.int()?;
    let seq = args.seq()?;

    let dev = u16::try_from(dev).map_err(|_| BuildError::invalid("Invalid device ID."))?;
    let key = u16::try_from(key).map_err(|_| BuildError::invalid("Invalid device ID."))?;

    Ok(NodeBox::seq(Enable::new(dev, key, seq)))
}
