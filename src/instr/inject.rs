use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time, QUEUE_CAPACITY},
    node::{Instrument, NodeBox, Sequencer},
};

/// Feeds an instrument from its own sequencer.
///
/// The sequencer works on a private copy of the block queue. Actions it adds
/// are delivered to the instrument as `Info::Action` before the instrument
/// renders with the extended queue.
#[derive(Clone)]
pub struct Inject {
    seq: Box<dyn Sequencer>,
    instr: Box<dyn Instrument>,
    copy: Queue,
}

impl Inject {
    pub fn new(seq: Box<dyn Sequencer>, instr: Box<dyn Instrument>) -> Self {
        Self {
            seq,
            instr,
            copy: Queue::new(),
        }
    }
}

impl Instrument for Inject {
    fn info(&mut self, info: &mut Info<'_>) {
        self.seq.info(info);
        self.instr.info(info);
    }

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool {
        self.copy.copy_from(queue);
        self.seq.process(time, &mut self.copy);

        // Pair every original action with one in the copy; the rest are new.
        let mut seen = [false; QUEUE_CAPACITY];
        for action in self.copy.iter() {
            let found = queue
                .iter()
                .enumerate()
                .find(|(i, a)| !seen[*i] && *a == action)
                .map(|(i, _)| i);

            match found {
                Some(i) => seen[i] = true,
                None => self.instr.info(&mut Info::Action(action)),
            }
        }

        self.instr.process(buf, time, &self.copy)
    }
}

/// `Inject(seq, instr)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(S,I)")?;
    let seq = args.seq()?;
    let instr = args.instr()?;

    Ok(NodeBox::instr(Inject::new(seq, instr)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Action, Event},
        effect::Synth,
        instr::Single,
        module::Trig,
        seq::Sched,
        test_support::times,
    };

    #[derive(Clone)]
    struct Count {
        actions: usize,
    }

    impl Instrument for Count {
        fn info(&mut self, info: &mut Info<'_>) {
            if info.action().is_some() {
                self.actions += 1;
            }
        }

        fn process(&mut self, buf: &mut [&mut [f64]; 2], _time: &[Time], queue: &Queue) -> bool {
            buf[0].fill(self.actions as f64);
            buf[1].fill(queue.len() as f64);
            false
        }
    }

    #[test]
    fn only_new_actions_are_delivered() {
        let mut sched = Sched::new();
        sched.add(Time::ZERO, Event::new(0, 60, u16::MAX));
        let mut inject = Inject::new(Box::new(sched), Box::new(Count { actions: 0 }));

        let mut queue = Queue::new();
        queue.push(Action::new(0, Event::new(5, 1, 1)));

        let mut left = vec![0.0; 4];
        let mut right = vec![0.0; 4];
        inject.process(&mut [&mut left, &mut right], &times(4), &queue);

        assert_eq!(left[0], 1.0);
        assert_eq!(right[0], 2.0);
        // the caller's queue is untouched
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn drives_a_synth_from_a_schedule() {
        let mut sched = Sched::new();
        sched.add(Time::ZERO, Event::new(0, 57, u16::MAX));
        let synth = Synth::new(0, 1, Box::new(Trig::new(1.0)));
        let mut inject = Inject::new(Box::new(sched), Box::new(Single::new(0, Box::new(synth))));

        let mut left = vec![0.0; 4];
        let mut right = vec![0.0; 4];
        inject.process(&mut [&mut left, &mut right], &times(4), &Queue::new());

        assert_eq!(left, vec![440.0; 4]);
    }
}
