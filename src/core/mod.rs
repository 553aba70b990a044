//! Data model shared by every node: musical time, control events, the
//! per-block event queue and the control-rate info messages.

pub mod event;
pub mod info;
pub mod key;
pub mod time;

pub use event::{velocity, Action, Event, Note, Queue, Seek, QUEUE_CAPACITY};
pub use info::Info;
pub use key::{key_freq, parse_key};
pub use time::{Order, Time};
