#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

/*
Musical Time
============

Every sample in a block carries a Time: the absolute sample index plus the
musical position (bar, beat) derived from it. The clock computes one Time per
sample boundary, so a block of `len` samples comes with `len + 1` times:

    time[0]      time[1]      time[2]   ...   time[len]
       │ sample 0  │ sample 1  │               │
       └───────────┴───────────┴─── ... ───────┘

Sample `i` spans the half-open interval [time[i], time[i+1]). Sequencers use
that interval to decide which samples an event lands on.

Deriving bar/beat
-----------------

    beats = index * bpm / (rate * 60)
    bar   = floor(beats / beats_per_bar)
    beat  = beats - bar * beats_per_bar        (always in [0, beats_per_bar))

Negative indices (pre-roll) borrow from the bar so `beat` never goes negative:

    index = -rate/2 at 120bpm, 4/4   →   beats = -1.0   →   bar -1, beat 3.0

Comparing
---------

Ordering is bar-major, beat-minor. `compare` keeps the distinction between a
difference in bar ("far") and a difference in beat only ("near"); callers
that only care about ordering use `Order::ordering()`.

Circular intervals
------------------

`between(t, lo, hi)` supports loop regions that wrap:

    lo < hi:   lo ≤ t < hi                 ──[lo====hi)──
    lo ≥ hi:   t ≥ lo  or  t < hi          ==hi)────[lo==
*/

/// A position on the timeline: absolute sample index and musical location.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Time {
    pub index: i64,
    pub bar: i32,
    pub beat: f64,
}

/// Result of comparing two times.
///
/// `Far*` means the bars differ, `Near*` means only the beats differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    FarBefore,
    NearBefore,
    Equal,
    NearAfter,
    FarAfter,
}

impl Order {
    pub fn ordering(self) -> Ordering {
        match self {
            Order::FarBefore | Order::NearBefore => Ordering::Less,
            Order::Equal => Ordering::Equal,
            Order::NearAfter | Order::FarAfter => Ordering::Greater,
        }
    }

    /// Signed level: -2, -1, 0, 1, 2.
    pub fn level(self) -> i32 {
        match self {
            Order::FarBefore => -2,
            Order::NearBefore => -1,
            Order::Equal => 0,
            Order::NearAfter => 1,
            Order::FarAfter => 2,
        }
    }
}

impl Time {
    pub const ZERO: Time = Time {
        index: 0,
        bar: 0,
        beat: 0.0,
    };

    /// A musical location without a sample index.
    pub const fn at(bar: i32, beat: f64) -> Self {
        Self {
            index: 0,
            bar,
            beat,
        }
    }

    /// Derive the musical position of a sample index.
    pub fn calc(index: i64, bpm: f64, beats_per_bar: f64, rate: u32) -> Self {
        let beats = (index as f64 * bpm) / (rate as f64 * 60.0);
        let (bar, beat) = normalize(beats, beats_per_bar);

        Self { index, bar, beat }
    }

    /// Bar-major, beat-minor comparison. The index is ignored.
    pub fn compare(&self, other: &Time) -> Order {
        if self.bar > other.bar {
            Order::FarAfter
        } else if self.bar < other.bar {
            Order::FarBefore
        } else if self.beat > other.beat {
            Order::NearAfter
        } else if self.beat < other.beat {
            Order::NearBefore
        } else {
            Order::Equal
        }
    }

    /// Same musical position, regardless of index.
    pub fn same_position(&self, other: &Time) -> bool {
        self.compare(other) == Order::Equal
    }

    /// Per-field modulus. A zero (or negative) field in `m` leaves that field alone.
    pub fn modulus(&self, m: &Time) -> Time {
        let mut out = *self;

        if m.index > 0 {
            out.index = self.index.rem_euclid(m.index);
        }
        if m.bar > 0 {
            out.bar = self.bar.rem_euclid(m.bar);
        }
        if m.beat > 0.0 {
            out.beat = self.beat.rem_euclid(m.beat);
            if out.beat >= m.beat {
                out.beat = 0.0;
            }
        }

        out
    }

    /// Circular interval test over `[lo, hi)`.
    pub fn between(&self, lo: &Time, hi: &Time) -> bool {
        if lo.compare(hi).level() < 0 {
            lo.compare(self).level() <= 0 && self.compare(hi).level() < 0
        } else {
            lo.compare(self).level() <= 0 || self.compare(hi).level() < 0
        }
    }

    /// Shift the bar by `off` and wrap it into `[0, len)`.
    pub fn repeat(&self, off: i32, len: i32) -> Time {
        let mut out = *self;
        if len > 0 {
            out.bar = (self.bar + off).rem_euclid(len);
        }
        out
    }
}

/// Split a beat count into (bar, beat) with `beat` in `[0, beats_per_bar)`.
fn normalize(beats: f64, beats_per_bar: f64) -> (i32, f64) {
    if !(beats_per_bar > 0.0) || !beats.is_finite() {
        return (0, 0.0);
    }

    let mut bar = (beats / beats_per_bar).floor();
    let mut beat = beats - bar * beats_per_bar;

    if beat < 0.0 {
        beat += beats_per_bar;
        bar -= 1.0;
    }
    if beat >= beats_per_bar {
        beat -= beats_per_bar;
        bar += 1.0;
    }
    // rounding can land exactly on the boundary after a borrow
    if !(beat >= 0.0 && beat < beats_per_bar) {
        beat = 0.0;
    }

    (bar as i32, beat)
}
