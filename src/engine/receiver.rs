#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use std::collections::VecDeque;

use crate::core::Event;

/// Source of controller events drained at the top of every block.
///
/// Implementations used from the audio callback must not block or allocate.
pub trait EventReceiver {
    fn pop(&mut self) -> Option<Event>;
}

#[cfg(feature = "rtrb")]
impl EventReceiver for Consumer<Event> {
    fn pop(&mut self) -> Option<Event> {
        Consumer::pop(self).ok()
    }
}

/// Offline source, for rendering to a file or in tests.
impl EventReceiver for VecDeque<Event> {
    fn pop(&mut self) -> Option<Event> {
        self.pop_front()
    }
}

/// Lock-free controller ring. The producer goes to the MIDI/UI thread, the
/// consumer to [`Engine::set_receiver`](crate::engine::Engine::set_receiver).
#[cfg(feature = "rtrb")]
pub fn event_channel(capacity: usize) -> (Producer<Event>, Consumer<Event>) {
    RingBuffer::new(capacity)
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;

    #[test]
    fn ring_drops_when_full() {
        let (mut tx, mut rx) = event_channel(2);
        assert!(tx.push(Event::new(0, 1, 1)).is_ok());
        assert!(tx.push(Event::new(0, 2, 1)).is_ok());
        assert!(tx.push(Event::new(0, 3, 1)).is_err());

        assert_eq!(EventReceiver::pop(&mut rx).map(|e| e.key), Some(1));
        assert_eq!(EventReceiver::pop(&mut rx).map(|e| e.key), Some(2));
        assert_eq!(EventReceiver::pop(&mut rx), None);
    }
}
