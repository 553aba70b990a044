//! Getting data in from outside the graph.
//!
//! WAV files are decoded once into a shared [`SampleCache`]; raw MIDI bytes are
//! parsed into [`MidiEvent`]s and mapped onto engine [`Event`](crate::core::Event)s.

pub mod cache;
pub mod converter;
pub mod midi;

pub use cache::{Sample, SampleCache};
pub use converter::{midi_to_event, CC_KEY_BASE};
pub use midi::MidiEvent;
