use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{NodeBox, Sequencer},
    MAX_BLOCK_SIZE,
};

/// Loops a child sequencer over `len` bars starting at bar `off`.
#[derive(Clone)]
pub struct Repeat {
    off: i32,
    len: i32,
    seq: Box<dyn Sequencer>,
    tmp: Vec<Time>,
}

impl Repeat {
    /// `len` must be positive.
    pub fn new(off: i32, len: i32, seq: Box<dyn Sequencer>) -> Self {
        Self {
            off,
            len,
            seq,
            tmp: vec![Time::ZERO; MAX_BLOCK_SIZE + 1],
        }
    }
}

impl Sequencer for Repeat {
    fn info(&mut self, info: &mut Info<'_>) {
        self.seq.info(info);
    }

    fn process(&mut self, time: &[Time], queue: &mut Queue) {
        let n = time.len().min(self.tmp.len());
        for (dst, src) in self.tmp[..n].iter_mut().zip(time) {
            *dst = src.repeat(self.off, self.len);
        }

        self.seq.process(&self.tmp[..n], queue);
    }
}

/// `Repeat(off, len, seq)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(d,d,S)")?;
    let off = args.int()?;
    let len = args.int()?;
    let seq = args.seq()?;

    if len <= 0 {
        return Err(BuildError::invalid("Repeat length must be positive."));
    }

    let off = i32::try_from(off).map_err(|_| BuildError::invalid("Repeat offset out of range."))?;
    let len = i32::try_from(len).map_err(|_| BuildError::invalid("Repeat length out of range."))?;

    Ok(NodeBox::seq(Repeat::new(off, len, seq)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::Event, seq::Sched};

    /// Reports the bar of every time it is given as an event key.
    #[derive(Clone)]
    struct Bars;

    impl Sequencer for Bars {
        fn process(&mut self, time: &[Time], queue: &mut Queue) {
            for (i, t) in time.iter().enumerate() {
                queue.add(Event::new(0, t.bar as u16, 0), i as u32);
            }
        }
    }

    #[test]
    fn child_sees_wrapped_bars() {
        let mut repeat = Repeat::new(1, 2, Box::new(Bars));
        let time: Vec<Time> = (0..5).map(|bar| Time::at(bar, 0.0)).collect();
        let mut queue = Queue::new();

        repeat.process(&time, &mut queue);

        let bars: Vec<u16> = queue.iter().map(|a| a.event.key).collect();
        assert_eq!(bars, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn schedule_loops_inside_region() {
        let mut sched = Sched::new();
        sched.add(Time::at(0, 0.0), Event::new(0, 7, 1));
        let mut repeat = Repeat::new(0, 1, Box::new(sched));

        let time: Vec<Time> = (0..=40)
            .map(|i| Time::calc(i, 720_000.0, 4.0, 48_000))
            .collect();
        let mut queue = Queue::new();
        repeat.process(&time, &mut queue);

        let delays: Vec<u32> = queue.iter().map(|a| a.delay).collect();
        assert_eq!(delays, vec![0, 16, 32]);
    }

    #[test]
    fn length_must_be_positive() {
        let cx = BuildContext::default();
        let seq = NodeBox::seq(Sched::new());
        let err = make(Value::from((0, 0, seq)), &cx).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("Repeat length must be positive.")
        );
    }
}
