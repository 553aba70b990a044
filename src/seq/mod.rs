//! Sequencers: nodes that write events into the block queue.

pub mod enable;
pub mod merge;
pub mod repeat;
pub mod sched;
pub mod toggle;

pub use enable::Enable;
pub use merge::Merge;
pub use repeat::Repeat;
pub use sched::Sched;
pub use toggle::Toggle;
