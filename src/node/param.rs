use crate::{
    core::{Info, Queue, Time},
    node::{Ctrl, Module},
};

/*
Parameters
==========

Most node inputs (gain, frequency, cutoff) can be driven three ways:

  Flt      a literal constant                     1.0
  Ctrl     a hardware controller mapped to a range  Ctrl((1,7),(0,1),0.5)
  Module   a full signal sub-graph                  Sine(Ramp(5))

Flt and Ctrl are "fast": their value changes at most once per control
message, so a node can read `value()` once per block instead of filling a
per-sample buffer. Module is "slow" and has to be rendered sample by sample.

Call sites branch on `is_fast()`:

    if gain.is_fast() {
        let g = gain.value();                 // O(1)
        for s in buf { *s *= g; }
    } else {
        gain.process(&mut tmp, time, queue);  // O(len)
        for (s, g) in buf.iter_mut().zip(&tmp) { *s *= g; }
    }

`value()` is always valid. For a Module it is the last sample written by
`process`, which is enough for display without re-running DSP.
*/

#[derive(Clone)]
enum Source {
    Flt,
    Ctrl(Ctrl),
    Module(Box<dyn Module>),
}

/// A constant, controller-driven or signal-driven node input.
#[derive(Clone)]
pub struct Param {
    flt: f64,
    source: Source,
}

impl Param {
    pub fn flt(value: f64) -> Self {
        Self {
            flt: value,
            source: Source::Flt,
        }
    }

    pub fn ctrl(ctrl: Ctrl) -> Self {
        Self {
            flt: ctrl.value(),
            source: Source::Ctrl(ctrl),
        }
    }

    pub fn module(module: Box<dyn Module>) -> Self {
        Self {
            flt: 0.0,
            source: Source::Module(module),
        }
    }

    /// O(1) to evaluate: constant or controller.
    #[inline]
    pub fn is_fast(&self) -> bool {
        !matches!(self.source, Source::Module(_))
    }

    /// Cached scalar.
    #[inline]
    pub fn value(&self) -> f64 {
        self.flt
    }

    pub fn info(&mut self, info: &mut Info<'_>) {
        match &mut self.source {
            Source::Flt => {}
            Source::Ctrl(ctrl) => {
                if let Info::Action(action) = info {
                    self.flt = ctrl.apply(&action.event);
                }
            }
            Source::Module(module) => module.info(info),
        }
    }

    /// Fill `buf` with the parameter's signal.
    ///
    /// Fast parameters fill with the cached scalar and report no continuation.
    pub fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        match &mut self.source {
            Source::Flt | Source::Ctrl(_) => {
                buf.fill(self.flt);
                false
            }
            Source::Module(module) => {
                let cont = module.process(buf, time, queue);
                if let Some(&last) = buf.last() {
                    self.flt = last;
                }
                cont
            }
        }
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::flt(value)
    }
}

impl From<Ctrl> for Param {
    fn from(ctrl: Ctrl) -> Self {
        Param::ctrl(ctrl)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.source {
            Source::Flt => "Flt",
            Source::Ctrl(_) => "Ctrl",
            Source::Module(_) => "Module",
        };
        f.debug_struct("Param")
            .field("kind", &kind)
            .field("flt", &self.flt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Action, Event},
        module::ramp::Ramp,
        test_support::times,
    };

    #[test]
    fn constant_fills_block_with_cached_value() {
        let mut param = Param::flt(0.25);
        let mut buf = vec![9.0; 64];

        let cont = param.process(&mut buf, &times(64), &Queue::new());

        assert!(!cont);
        assert!(param.is_fast());
        assert!(buf.iter().all(|&s| s == param.value()));
    }

    #[test]
    fn ctrl_updates_on_matching_action() {
        let mut param = Param::ctrl(Ctrl::linear(2, 10, 0.0, 100.0, 50.0));
        assert_eq!(param.value(), 50.0);

        let action = Action::new(0, Event::new(2, 10, u16::MAX));
        param.info(&mut Info::Action(&action));
        assert_eq!(param.value(), 100.0);

        let other = Action::new(0, Event::new(2, 11, 0));
        param.info(&mut Info::Action(&other));
        assert_eq!(param.value(), 100.0);
        assert!(param.is_fast());
    }

    #[test]
    fn module_is_slow_and_caches_last_sample() {
        let mut param = Param::module(Box::new(Ramp::new(Param::flt(100.0), 48_000)));
        let mut buf = vec![0.0; 32];

        assert!(!param.is_fast());
        param.process(&mut buf, &times(32), &Queue::new());

        assert_eq!(param.value(), buf[31]);
        assert!(param.value() > 0.0);
    }

    #[test]
    fn copy_deep_copies_module() {
        let mut original = Param::module(Box::new(Ramp::new(Param::flt(100.0), 48_000)));
        let mut copy = original.clone();
        let mut scratch = vec![0.0; 16];
        copy.process(&mut scratch, &times(16), &Queue::new());

        let mut buf = vec![0.0; 16];
        original.process(&mut buf, &times(16), &Queue::new());

        // The original starts from phase zero, untouched by the copy's run.
        assert!((buf[0] - 100.0 / 48_000.0).abs() < 1e-12);
    }
}
