use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{Info, Queue, Time},
    node::{Instrument, NodeBox, Param},
    MAX_BLOCK_SIZE,
};

/// Fixed-length delay line.
#[derive(Clone, Debug)]
struct Delay {
    buf: Vec<f64>,
    idx: usize,
}

impl Delay {
    /// `None` for a zero-length delay.
    fn new(len: usize) -> Option<Self> {
        (len > 0).then(|| Self {
            buf: vec![0.0; len],
            idx: 0,
        })
    }

    #[inline]
    fn push(&mut self, x: f64) -> f64 {
        let y = std::mem::replace(&mut self.buf[self.idx], x);
        self.idx = (self.idx + 1) % self.buf.len();
        y
    }
}

/// Volume and delay for one channel.
#[derive(Clone, Debug)]
struct Side {
    vol: Param,
    delay: Option<Delay>,
}

impl Side {
    fn process(
        &mut self,
        buf: &mut [f64],
        tmp: &mut [f64],
        time: &[Time],
        queue: &Queue,
    ) -> bool {
        if let Some(delay) = self.delay.as_mut() {
            for s in buf.iter_mut() {
                *s = delay.push(*s);
            }
        }

        if self.vol.is_fast() {
            let v = self.vol.value();
            for s in buf.iter_mut() {
                *s *= v;
            }
            return false;
        }

        let len = buf.len().min(tmp.len());
        let tmp = &mut tmp[..len];
        let cont = self.vol.process(tmp, time, queue);
        for (s, v) in buf.iter_mut().zip(tmp.iter()) {
            *s *= v;
        }
        cont
    }
}

/// Places a stereo signal by scaling and delaying each channel.
///
/// A few hundred microseconds of delay on one side moves the image towards
/// the other, on top of what the volume difference does.
#[derive(Clone, Debug)]
pub struct Pan {
    sides: [Side; 2],
    tmp: Vec<f64>,
}

impl Pan {
    /// Delays are in samples.
    pub fn new(lvol: Param, rvol: Param, ldelay: usize, rdelay: usize) -> Self {
        Self {
            sides: [
                Side {
                    vol: lvol,
                    delay: Delay::new(ldelay),
                },
                Side {
                    vol: rvol,
                    delay: Delay::new(rdelay),
                },
            ],
            tmp: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl Instrument for Pan {
    fn info(&mut self, info: &mut Info<'_>) {
        for side in &mut self.sides {
            side.vol.info(info);
        }
    }

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool {
        let mut cont = false;
        for (side, chan) in self.sides.iter_mut().zip(buf.iter_mut()) {
            cont |= side.process(&mut **chan, &mut self.tmp, time, queue);
        }
        cont
    }
}

/// `Pan((lvol,rvol),(ldelay,rdelay))`, delays in seconds.
pub fn make(value: Value, cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "((P,P),(f,f))")?;
    let lvol = args.param()?;
    let rvol = args.param()?;
    let ldelay = samples(args.num()?, cx.rate)?;
    let rdelay = samples(args.num()?, cx.rate)?;

    Ok(NodeBox::instr(Pan::new(lvol, rvol, ldelay, rdelay)))
}

fn samples(secs: f64, rate: u32) -> Result<usize, BuildError> {
    if !(0.0..=1.0).contains(&secs) {
        return Err(BuildError::invalid("Pan delay must be between 0 and 1 second."));
    }
    Ok((secs * f64::from(rate)).round() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Action, Event},
        module::Ramp,
        node::Ctrl,
        test_support::times,
    };

    #[test]
    fn constant_volumes_scale_each_side() {
        let mut pan = Pan::new(Param::flt(0.25), Param::flt(0.75), 0, 0);
        let mut left = vec![1.0; 4];
        let mut right = vec![2.0; 4];

        assert!(!pan.process(&mut [&mut left, &mut right], &times(4), &Queue::new()));
        assert_eq!(left, vec![0.25; 4]);
        assert_eq!(right, vec![1.5; 4]);
    }

    #[test]
    fn delay_carries_across_blocks() {
        let mut pan = Pan::new(Param::flt(1.0), Param::flt(1.0), 2, 0);
        let mut left = vec![1.0, 2.0, 3.0];
        let mut right = vec![1.0, 2.0, 3.0];
        pan.process(&mut [&mut left, &mut right], &times(3), &Queue::new());
        assert_eq!(left, vec![0.0, 0.0, 1.0]);
        assert_eq!(right, vec![1.0, 2.0, 3.0]);

        let mut left = vec![4.0, 5.0];
        let mut right = vec![0.0, 0.0];
        pan.process(&mut [&mut left, &mut right], &times(2), &Queue::new());
        assert_eq!(left, vec![2.0, 3.0]);
    }

    #[test]
    fn module_volume_is_rendered_per_sample() {
        let ramp = Param::module(Box::new(Ramp::new(Param::flt(12_000.0), 48_000)));
        let mut pan = Pan::new(ramp, Param::flt(1.0), 0, 0);
        let mut left = vec![2.0; 4];
        let mut right = vec![2.0; 4];

        pan.process(&mut [&mut left, &mut right], &times(4), &Queue::new());
        assert_eq!(left, vec![0.5, 1.0, 1.5, 0.0]);
        assert_eq!(right, vec![2.0; 4]);
    }

    #[test]
    fn controller_moves_one_side() {
        let ctrl = Param::ctrl(Ctrl::linear(1, 10, 0.0, 1.0, 1.0));
        let mut pan = Pan::new(ctrl, Param::flt(1.0), 0, 0);

        let action = Action::new(0, Event::new(1, 10, 0));
        pan.info(&mut Info::Action(&action));

        let mut left = vec![1.0; 2];
        let mut right = vec![1.0; 2];
        pan.process(&mut [&mut left, &mut right], &times(2), &Queue::new());
        assert_eq!((left, right), (vec![0.0; 2], vec![1.0; 2]));
    }

    #[test]
    fn constructor_converts_seconds() {
        let cx = BuildContext::default();
        let value = Value::tuple([Value::from((1.0, 0.5)), Value::from((0.0, 0.001))]);
        assert!(make(value, &cx).is_ok());
        assert_eq!(samples(0.001, 48_000).ok(), Some(48));

        let value = Value::tuple([Value::from((1.0, 0.5)), Value::from((-0.1, 0.0))]);
        assert!(matches!(make(value, &cx), Err(BuildError::Invalid(_))));
    }
}
