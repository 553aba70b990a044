use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Event, Info, Queue, Time},
    node::{NodeBox, Sequencer},
};

/// One scheduled event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub time: Time,
    pub event: Event,
}

/*
Schedule
========

A loop of events at fixed musical positions. Entries are kept sorted by
time and walked with a circular cursor:

    entries:  (0,0.0) (0,2.0) (1,0.0) (1,3.5)
                         ^cur

For each sample `i` of a block, every entry from the cursor onwards whose
time lies in `[time[i], time[i+1])` is emitted at delay `i`. The cursor wraps
past the last entry, so a clock that loops (see `Repeat`) replays the
schedule. One full lap is the most a single sample can emit.

A block whose first and last times are the same position means the clock is
stopped; nothing is emitted.
*/

#[derive(Debug, Clone, Default)]
pub struct Sched {
    entries: Vec<Entry>,
    cur: usize,
}

impl Sched {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every entry at or before `time`.
    pub fn add(&mut self, time: Time, event: Event) {
        let pos = self
            .entries
            .iter()
            .rposition(|e| e.time.compare(&time).level() <= 0)
            .map_or(0, |i| i + 1);

        self.entries.insert(pos, Entry { time, event });
        if pos == 0 {
            self.cur = 0;
        } else if pos <= self.cur {
            self.cur += 1;
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Point the cursor at the first entry at or after `time`.
    fn seek(&mut self, time: &Time) {
        self.cur = self
            .entries
            .iter()
            .position(|e| e.time.compare(time).level() >= 0)
            .unwrap_or(0);
    }
}

impl Sequencer for Sched {
    fn info(&mut self, info: &mut Info<'_>) {
        if let Info::Seek(seek) = info {
            self.seek(&seek.time);
        }
    }

    fn process(&mut self, time: &[Time], queue: &mut Queue) {
        let n = self.entries.len();
        if n == 0 || time.len() < 2 {
            return;
        }

        let len = time.len() - 1;
        if time[0].same_position(&time[len]) {
            return;
        }

        for (i, span) in time.windows(2).enumerate() {
            if span[0].same_position(&span[1]) {
                continue;
            }

            let start = self.cur;
            loop {
                let entry = &self.entries[self.cur];
                if !entry.time.between(&span[0], &span[1]) {
                    break;
                }

                queue.add(entry.event, i as u32);

                self.cur = (self.cur + 1) % n;
                if self.cur == start {
                    break;
                }
            }
        }
    }
}

/// `Sched([((bar,beat),(dev,key,val)), ...])`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "[((d,f),(d,d,d))]")?;
    let mut sched = Sched::new();

    for mut item in args.list()? {
        let bar = item.int()?;
        let beat = item.num()?;
        let dev = item.int()?;
        let key = item.int()?;
        let val = item.int()?;

        let event = Event::new(field(dev)?, field(key)?, field(val)?);
        sched.add(Time::at(bar as i32, beat), event);
    }

    Ok(NodeBox::seq(sched))
}

fn field(n: i64) -> Result<u16, BuildError> {
    u16::try_from(n).map_err(|_| BuildError::invalid("Event field out of range."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Seek;

    /// Times for `len` samples starting at `start`, at a tempo where one
    /// sample is a quarter beat.
    fn block(start: i64, len: usize) -> Vec<Time> {
        // 48000 Hz, 720000 bpm -> 0.25 beats per sample
        (0..=len as i64)
            .map(|i| Time::calc(start + i, 720_000.0, 4.0, 48_000))
            .collect()
    }

    fn delays(queue: &Queue) -> Vec<(u32, u16)> {
        queue.iter().map(|a| (a.delay, a.event.key)).collect()
    }

    fn sched() -> Sched {
        let mut sched = Sched::new();
        sched.add(Time::at(0, 1.0), Event::new(0, 2, 1));
        sched.add(Time::at(0, 0.0), Event::new(0, 1, 1));
        sched.add(Time::at(1, 0.0), Event::new(0, 3, 1));
        sched
    }

    #[test]
    fn entries_are_sorted() {
        let keys: Vec<u16> = sched().entries().iter().map(|e| e.event.key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn emits_at_sample_delay() {
        let mut sched = sched();
        let mut queue = Queue::new();

        // samples 0..8 cover beats [0, 2)
        sched.process(&block(0, 8), &mut queue);
        assert_eq!(delays(&queue), vec![(0, 1), (4, 2)]);

        queue.clear();
        // samples 8..20 cover [2.0, bar 1 beat 1.0)
        sched.process(&block(8, 12), &mut queue);
        assert_eq!(delays(&queue), vec![(8, 3)]);
    }

    #[test]
    fn stalled_clock_emits_nothing() {
        let mut sched = sched();
        let mut queue = Queue::new();
        sched.process(&[Time::ZERO; 9], &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn looping_clock_replays_schedule() {
        let mut sched = Sched::new();
        sched.add(Time::at(0, 0.0), Event::new(0, 1, 1));
        sched.add(Time::at(0, 1.0), Event::new(0, 2, 1));
        let mut queue = Queue::new();

        // Almost two bars of 16 samples each, with the bar wrapped to length 1.
        let looped: Vec<Time> = block(0, 30).iter().map(|t| t.repeat(0, 1)).collect();
        sched.process(&looped, &mut queue);

        let keys: Vec<u16> = queue.iter().map(|a| a.event.key).collect();
        assert_eq!(keys, vec![1, 2, 1, 2]);
    }

    #[test]
    fn seek_moves_cursor() {
        let mut sched = sched();
        sched.info(&mut Info::Seek(&mut Seek::to(0, 0.5)));

        let mut queue = Queue::new();
        sched.process(&block(2, 4), &mut queue);
        assert_eq!(delays(&queue), vec![(2, 2)]);
    }

    #[test]
    fn constructor_validates_shape() {
        let cx = BuildContext::default();
        let value = Value::list([Value::from(((0, 0.0), (0, 60, 65535)))]);
        assert!(make(value, &cx).is_ok());

        let bad = Value::list([Value::from(((0, 0.0), (0, 60)))]);
        assert_eq!(
            make(bad, &cx).err().map(|e| e.to_string()).as_deref(),
            Some("Type error. Expected '[((Int,Num),(Int,Int,Int))]'.")
        );

        let range = Value::list([Value::from(((0, 0.0), (0, 60, 70_000)))]);
        assert!(matches!(make(range, &cx), Err(BuildError::Invalid(_))));
    }
}
