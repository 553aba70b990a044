use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Queue, Time},
    node::{NodeBox, Sequencer},
};

#[derive(Debug, Clone, Copy)]
struct Latch {
    dev: u16,
    key: u16,
    on: bool,
}

/// Turns momentary keys into latching ones.
///
/// A key-down on a listed key flips its state: the event passes through on
/// the way on and is rewritten to a key-up on the way off. Key-ups on listed
/// keys are swallowed.
#[derive(Debug, Clone, Default)]
pub struct Toggle {
    latches: Vec<Latch>,
}

impl Toggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, dev: u16, key: u16) {
        self.latches.push(Latch {
            dev,
            key,
            on: false,
        });
    }

    pub fn is_on(&self, dev: u16, key: u16) -> bool {
        self.latches
            .iter()
            .any(|l| l.dev == dev && l.key == key && l.on)
    }
}

impl Sequencer for Toggle {
    fn process(&mut self, _time: &[Time], queue: &mut Queue) {
        let mut i = 0;
        while let Some(event) = queue.event_mut(i) {
            let latch = self
                .latches
                .iter_mut()
                .find(|l| event.matches(l.dev, l.key));

            match latch {
                Some(latch) if event.val > 0 => {
                    latch.on = !latch.on;
                    if !latch.on {
                        event.val = 0;
                    }
                    i += 1;
                }
                Some(_) => {
                    queue.remove(i);
                }
                None => i += 1,
            }
        }
    }
}

/// `Toggle([(dev,key), ...])`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "[(d,d)]")?;
    let mut toggle = Toggle::new();

    for mut item in args.list()? {
        let dev =
            u16::try_from(item.int()?).map_err(|_| BuildError::invalid("Invalid device ID."))?;
        let key =
            u16::try_from(item.int()?).map_err(|_| BuildError::invalid("Invalid device ID."))?;
        toggle.add(dev, key);
    }

    Ok(NodeBox::seq(toggle))
}
