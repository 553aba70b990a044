//! Modules: mono signal generators.
//!
//! Modules double as parameter sources (`Param::module`) and as synth voices.

pub mod adsr;
pub mod mul;
pub mod noise;
pub mod osc;
pub mod patch;
pub mod ramp;
pub mod sample;
pub mod sum;
pub mod trig;

pub use adsr::Adsr;
pub use mul::Mul;
pub use noise::Noise;
pub use osc::{Osc, Wave};
pub use patch::Patch;
pub use ramp::Ramp;
pub use sample::Sampler;
pub use sum::Sum;
pub use trig::Trig;
