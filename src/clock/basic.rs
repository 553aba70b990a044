use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Seek, Time},
    node::{Clock, NodeBox},
};

/// Fixed-tempo transport.
///
/// The sample index advances only while running; a stopped clock repeats
/// its current position for every sample of the block.
#[derive(Debug, Clone)]
pub struct Basic {
    run: bool,
    idx: i64,
    cur: Time,
    rate: u32,
    bpm: f64,
    nbeats: f64,
}

impl Basic {
    pub fn new(bpm: f64, nbeats: f64, rate: u32) -> Self {
        Self {
            run: false,
            idx: 0,
            cur: Time::ZERO,
            rate,
            bpm,
            nbeats,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn beats_per_bar(&self) -> f64 {
        self.nbeats
    }

    fn calc(&self, idx: i64) -> Time {
        Time::calc(idx, self.bpm, self.nbeats, self.rate)
    }

    fn seek(&mut self, target: Time) {
        let beats = target.bar as f64 * self.nbeats + target.beat;
        self.idx = (beats * 60.0 * self.rate as f64 / self.bpm).round() as i64;
        self.cur = self.calc(self.idx);
    }

    fn report(&self, seek: &mut Seek) {
        seek.index = self.idx;
        seek.time = self.calc(self.idx);
    }
}

impl Clock for Basic {
    fn info(&mut self, info: &mut Info<'_>) {
        match info {
            Info::Seek(seek) => {
                self.seek(seek.time);
                self.report(seek);
            }
            Info::Start(seek) => {
                self.run = true;
                self.report(seek);
            }
            Info::Stop(seek) => {
                self.run = false;
                self.report(seek);
            }
            Info::Tell(time) => **time = self.cur,
            _ => {}
        }
    }

    fn process(&mut self, time: &mut [Time]) {
        let Some((first, rest)) = time.split_first_mut() else {
            return;
        };

        *first = self.cur;
        for t in rest.iter_mut() {
            if self.run {
                self.idx += 1;
            }
            *t = self.calc(self.idx);
        }

        if let Some(&last) = rest.last() {
            self.cur = last;
        }
    }
}

/// `Basic(bpm, beats_per_bar)`
pub fn make(value: Value, cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(f,f)")?;
    let bpm = args.num()?;
    let nbeats = args.num()?;

    if !(bpm > 0.0 && nbeats > 0.0) {
        return Err(BuildError::invalid("Tempo must be positive."));
    }

    Ok(NodeBox::clock(Basic::new(bpm, nbeats, cx.rate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(clock: &mut Basic, len: usize) -> Vec<Time> {
        let mut time = vec![Time::ZERO; len + 1];
        clock.process(&mut time);
        time
    }

    #[test]
    fn stopped_clock_holds_position() {
        let mut clock = Basic::new(120.0, 4.0, 48_000);
        let time = run(&mut clock, 16);

        assert!(time.iter().all(|t| *t == Time::ZERO));
    }

    #[test]
    fn running_clock_advances_one_index_per_sample() {
        let mut clock = Basic::new(120.0, 4.0, 48_000);
        clock.info(&mut Info::Start(&mut Seek::default()));

        let first = run(&mut clock, 8);
        let indices: Vec<i64> = first.iter().map(|t| t.index).collect();
        assert_eq!(indices, (0..=8).collect::<Vec<_>>());

        // The next block starts where the last one ended.
        let second = run(&mut clock, 8);
        assert_eq!(second[0], first[8]);
        assert_eq!(second[8].index, 16);
    }

    #[test]
    fn seek_writes_back_landing_position() {
        let mut clock = Basic::new(120.0, 4.0, 48_000);
        let mut seek = Seek::to(2, 1.0);
        clock.info(&mut Info::Seek(&mut seek));

        // 9 beats at 120 bpm is 4.5 seconds.
        assert_eq!(seek.index, 216_000);
        assert_eq!(seek.time.bar, 2);
        assert!((seek.time.beat - 1.0).abs() < 1e-9);

        let mut now = Time::ZERO;
        clock.info(&mut Info::Tell(&mut now));
        assert_eq!(now.index, 216_000);
    }

    #[test]
    fn stop_freezes_transport() {
        let mut clock = Basic::new(120.0, 4.0, 48_000);
        clock.info(&mut Info::Start(&mut Seek::default()));
        run(&mut clock, 4);

        let mut seek = Seek::default();
        clock.info(&mut Info::Stop(&mut seek));
        assert_eq!(seek.index, 4);
        assert!(!clock.is_running());

        let time = run(&mut clock, 4);
        assert!(time.iter().all(|t| t.index == 4));
    }

    #[test]
    fn constructor_reads_tempo() {
        let cx = BuildContext::default();
        assert!(make(Value::from((120.0, 4.0)), &cx).is_ok());
        assert!(make(Value::from((0.0, 4.0)), &cx).is_err());
        assert!(make(Value::from((120.0, "4")), &cx).is_err());
    }
}
