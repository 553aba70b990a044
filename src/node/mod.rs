//! The node protocol shared by every graph component.
//!
//! There are five node kinds. Each one is a trait with the same four
//! capabilities:
//!
//! - `info` is the control-rate broadcast.
//! - `process` is the block render.
//! - `Clone` is the deep copy.
//! - `Drop` is the recursive delete.
//!
//! Trait objects of each kind (`Box<dyn Effect>`, ...) are cloneable through
//! a small helper trait, so composites can copy their children without
//! knowing the concrete type.

use crate::core::{Info, Queue, Time};

pub mod boxed;
pub mod ctrl;
pub mod param;

pub use boxed::{BoxKind, NodeBox};
pub use ctrl::{Ctrl, CtrlScale};
pub use param::Param;

/// Produces the time array for a block.
///
/// `time.len()` is the block length plus one; `time[i]` is the position at
/// the start of sample `i` and `time[len]` the position after the block.
pub trait Clock: ClockClone + Send {
    fn info(&mut self, info: &mut Info<'_>);

    fn process(&mut self, time: &mut [Time]);
}

/// Populates (and may rewrite) the block's event queue.
pub trait Sequencer: SequencerClone + Send {
    fn info(&mut self, _info: &mut Info<'_>) {}

    fn process(&mut self, time: &[Time], queue: &mut Queue);
}

/// Writes a stereo signal from nothing.
///
/// Returns true while the subtree is still audibly active.
pub trait Instrument: InstrumentClone + Send {
    fn info(&mut self, _info: &mut Info<'_>) {}

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool;
}

/// Transforms a mono signal in place.
///
/// Returns true while the subtree is still audibly active.
pub trait Effect: EffectClone + Send {
    fn info(&mut self, _info: &mut Info<'_>) {}

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool;
}

/// Writes a mono signal (audio or control) from nothing.
///
/// Returns true while the subtree is still audibly active. A module must
/// tolerate `process` calls after reporting false and keep emitting cheaply,
/// since a later note may wake it up.
pub trait Module: ModuleClone + Send {
    fn info(&mut self, _info: &mut Info<'_>) {}

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool;
}

macro_rules! boxed_clone {
    ($kind:ident, $helper:ident, $method:ident) => {
        #[doc = concat!("Deep copy support for `Box<dyn ", stringify!($kind), ">`.")]
        pub trait $helper {
            fn $method(&self) -> Box<dyn $kind>;
        }

        impl<T: $kind + Clone + 'static> $helper for T {
            fn $method(&self) -> Box<dyn $kind> {
                Box::new(self.clone())
            }
        }

        impl Clone for Box<dyn $kind> {
            fn clone(&self) -> Self {
                (**self).$method()
            }
        }
    };
}

boxed_clone!(Clock, ClockClone, clone_clock);
boxed_clone!(Sequencer, SequencerClone, clone_sequencer);
boxed_clone!(Instrument, InstrumentClone, clone_instrument);
boxed_clone!(Effect, EffectClone, clone_effect);
boxed_clone!(Module, ModuleClone, clone_module);

/// Allow boxed nodes to be used wherever a concrete node is expected
impl Clock for Box<dyn Clock> {
    fn info(&mut self, info: &mut Info<'_>) {
        (**self).info(info)
    }

    fn process(&mut self, time: &mut [Time]) {
        (**self).process(time)
    }
}

impl Sequencer for Box<dyn Sequencer> {
    fn info(&mut self, info: &mut Info<'_>) {
        (**self).info(info)
    }

    fn process(&mut self, time: &[Time], queue: &mut Queue) {
        (**self).process(time, queue)
    }
}

impl Instrument for Box<dyn Instrument> {
    fn info(&mut self, info: &mut Info<'_>) {
        (**self).info(info)
    }

    fn process(&mut self, buf: &mut [&mut [f64]; 2], time: &[Time], queue: &Queue) -> bool {
        (**self).process(buf, time, queue)
    }
}

impl Effect for Box<dyn Effect> {
    fn info(&mut self, info: &mut Info<'_>) {
        (**self).info(info)
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        (**self).process(buf, time, queue)
    }
}

impl Module for Box<dyn Module> {
    fn info(&mut self, info: &mut Info<'_>) {
        (**self).info(info)
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        (**self).process(buf, time, queue)
    }
}
