use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{NodeBox, Sequencer},
};

/// Runs several sequencers over the same block and queue, in list order.
#[derive(Clone, Default)]
pub struct Merge {
    seqs: Vec<Box<dyn Sequencer>>,
}

impl Merge {
    pub fn new(seqs: Vec<Box<dyn Sequencer>>) -> Self {
        Self { seqs }
    }

    pub fn push(&mut self, seq: Box<dyn Sequencer>) {
        self.seqs.push(seq);
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}

impl Sequencer for Merge {
    fn info(&mut self, info: &mut Info<'_>) {
        for seq in &mut self.seqs {
            seq.info(info);
        }
    }

    fn process(&mut self, time: &[Time], queue: &mut Queue) {
        for seq in &mut self.seqs {
            seq.process(time, queue);
        }
    }
}

/// `Merge([seq, ...])`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "[S]")?;
    let seqs = args
        .list()?
        .into_iter()
        .map(|mut item| item.seq())
        .collect::<Result<_, _>>()?;

    Ok(NodeBox::seq(Merge::new(seqs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Event, Seek},
        seq::Sched,
        test_support::times,
    };

    /// Adds one event with `key` at `delay` every block.
    #[derive(Clone)]
    struct Emit {
        key: u16,
        delay: u32,
    }

    impl Sequencer for Emit {
        fn process(&mut self, _time: &[Time], queue: &mut Queue) {
            queue.add(Event::new(0, self.key, 1), self.delay);
        }
    }

    #[test]
    fn children_share_one_queue() {
        let mut merge = Merge::new(vec![
            Box::new(Emit { key: 1, delay: 4 }),
            Box::new(Emit { key: 2, delay: 0 }),
            Box::new(Emit { key: 3, delay: 4 }),
        ]);

        let mut queue = Queue::new();
        merge.process(&times(8), &mut queue);

        // sorted by delay, list order among equal delays
        let seen: Vec<(u32, u16)> = queue.iter().map(|a| (a.delay, a.event.key)).collect();
        assert_eq!(seen, vec![(0, 2), (4, 1), (4, 3)]);
    }

    #[test]
    fn seek_reaches_every_child() {
        let mut first = Sched::new();
        first.add(Time::at(0, 0.0), Event::new(0, 10, 1));
        first.add(Time::at(1, 0.0), Event::new(0, 11, 1));
        let mut second = Sched::new();
        second.add(Time::at(0, 0.0), Event::new(0, 20, 1));
        second.add(Time::at(1, 0.0), Event::new(0, 21, 1));

        let mut merge = Merge::default();
        merge.push(Box::new(first));
        merge.push(Box::new(second));
        assert_eq!(merge.len(), 2);

        let mut seek = Seek::to(1, 0.0);
        merge.info(&mut Info::Seek(&mut seek));

        // one block starting exactly on bar 1 at 120 bpm, 48 kHz
        let time: Vec<Time> = (96_000..=96_004)
            .map(|i| Time::calc(i, 120.0, 4.0, 48_000))
            .collect();
        let mut queue = Queue::new();
        merge.process(&time, &mut queue);

        let keys: Vec<u16> = queue.iter().map(|a| a.event.key).collect();
        assert_eq!(keys, vec![11, 21]);
    }

    #[test]
    fn constructor_accepts_only_sequencers() {
        let cx = BuildContext::default();
        assert!(make(Value::list([Value::Box(NodeBox::seq(Sched::new()))]), &cx).is_ok());
        assert!(make(Value::list([]), &cx).is_ok());
        assert_eq!(
            make(Value::list([Value::Num(1.0)]), &cx)
                .err()
                .map(|e| e.to_string())
                .as_deref(),
            Some("Type error. Expected '[Seq]'.")
        );
    }
}
