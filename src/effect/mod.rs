//! Effects: in-place mono processors.

pub mod chain;
pub mod gain;
pub mod gate;
pub mod synth;

pub use chain::Chain;
pub use gain::Gain;
pub use gate::Gate;
pub use synth::Synth;
