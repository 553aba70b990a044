#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::time::Time;

/// Capacity of a per-block event queue.
pub const QUEUE_CAPACITY: usize = 64;

/// A device/key/value controller message (key down/up, CC, pitch).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Event {
    pub dev: u16,
    pub key: u16,
    pub val: u16,
}

impl Event {
    pub const fn new(dev: u16, key: u16, val: u16) -> Self {
        Self { dev, key, val }
    }

    #[inline]
    pub fn matches(&self, dev: u16, key: u16) -> bool {
        self.dev == dev && self.key == key
    }

    /// Value scaled to `[0, 1]`.
    #[inline]
    pub fn velocity(&self) -> f64 {
        velocity(self.val)
    }
}

/// Scale a raw 16-bit value to `[0, 1]`.
#[inline]
pub fn velocity(val: u16) -> f64 {
    val as f64 / u16::MAX as f64
}

/// An event scheduled `delay` samples into the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Action {
    pub delay: u32,
    pub event: Event,
}

impl Action {
    pub const fn new(delay: u32, event: Event) -> Self {
        Self { delay, event }
    }
}

/// Per-voice note setup delivered through `Info::Note`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Note {
    /// True on a fresh attack, false when an existing voice is re-triggered or released.
    pub init: bool,
    pub delay: u32,
    pub key: u16,
    pub freq: f64,
    pub vel: f64,
}

/// Transport position exchanged with the clock on seek/start/stop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Seek {
    pub index: i64,
    pub time: Time,
}

impl Seek {
    pub fn to(bar: i32, beat: f64) -> Self {
        Self {
            index: 0,
            time: Time::at(bar, beat),
        }
    }
}

/*
Block Event Queue
=================

A fixed array of actions kept sorted by `delay`. It lives on the stack of the
audio callback, so it never allocates:

    delay:  [0] [0] [12] [12] [40] [ ]...[ ]
             └─────── len = 5 ──────┘   capacity 64

Insertion is a shift: the new action goes after every action with a delay
less than or equal to its own, so actions added with equal delays keep their
insertion order.

Consumers walk the queue once per block with an external cursor:

    let mut cursor = 0;
    for i in 0..len {
        while let Some(action) = queue.next_action(&mut cursor, i as u32) {
            // action.delay <= i
        }
        // render sample i
    }

A full queue drops the new action and `add` returns false. Dropping one
control message is better than blocking or allocating in the callback.
*/

#[derive(Clone)]
pub struct Queue {
    arr: [Action; QUEUE_CAPACITY],
    len: usize,
}

impl Queue {
    pub fn new() -> Self {
        Self {
            arr: [Action::default(); QUEUE_CAPACITY],
            len: 0,
        }
    }

    /// Overwrite this queue with the contents of `src`.
    pub fn copy_from(&mut self, src: &Queue) {
        self.arr[..src.len].copy_from_slice(&src.arr[..src.len]);
        self.len = src.len;
    }

    /// Insert an event keeping `delay` order. Returns false when full.
    pub fn add(&mut self, event: Event, delay: u32) -> bool {
        self.push(Action::new(delay, event))
    }

    /// Insert an action keeping `delay` order. Returns false when full.
    pub fn push(&mut self, action: Action) -> bool {
        if self.len == QUEUE_CAPACITY {
            return false;
        }

        let pos = self.arr[..self.len]
            .iter()
            .rposition(|a| a.delay <= action.delay)
            .map_or(0, |i| i + 1);

        self.arr.copy_within(pos..self.len, pos + 1);
        self.arr[pos] = action;
        self.len += 1;

        true
    }

    /// Next action at or before `upto`, advancing `cursor` past it.
    pub fn next_action(&self, cursor: &mut usize, upto: u32) -> Option<&Action> {
        let action = self.arr[..self.len].get(*cursor)?;
        if action.delay > upto {
            return None;
        }

        *cursor += 1;
        Some(action)
    }

    /// Remove the action at `idx`, shifting the tail down.
    pub fn remove(&mut self, idx: usize) -> Option<Action> {
        if idx >= self.len {
            return None;
        }

        let action = self.arr[idx];
        self.arr.copy_within(idx + 1..self.len, idx);
        self.len -= 1;

        Some(action)
    }

    /// A new queue holding only actions for `(dev, key)`.
    pub fn filter(&self, dev: u16, key: u16) -> Queue {
        let mut out = Queue::new();
        for action in self.iter().filter(|a| a.event.matches(dev, key)) {
            out.push(*action);
        }
        out
    }

    pub fn get(&self, idx: usize) -> Option<&Action> {
        self.arr[..self.len].get(idx)
    }

    /// Mutable access for value re-tagging. The delay is not exposed.
    pub fn event_mut(&mut self, idx: usize) -> Option<&mut Event> {
        self.arr[..self.len].get_mut(idx).map(|a| &mut a.event)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.arr[..self.len].iter()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == QUEUE_CAPACITY
    }

    /// Free slots left before `add` starts failing.
    pub fn remaining(&self) -> usize {
        QUEUE_CAPACITY - self.len
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
