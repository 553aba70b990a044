#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine setup: rate, tempo and controller ring size.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub bpm: f64,
    pub beats_per_bar: f64,
    /// Capacity of the controller event ring.
    pub event_capacity: usize,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn beats_per_bar(mut self, beats: f64) -> Self {
        self.beats_per_bar = beats;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            bpm: 120.0,
            beats_per_bar: 4.0,
            event_capacity: 256,
        }
    }
}
