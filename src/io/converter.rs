use crate::{core::Event, io::midi::MidiEvent};

/// First controller key; CC `n` arrives as key `CC_KEY_BASE + n`.
pub const CC_KEY_BASE: u16 = 0x100;

/// Map a MIDI message onto an engine event for device `dev`.
///
/// 7-bit values are shifted into the top of the 16-bit range. Pitch bend and
/// program change have no mapping.
pub fn midi_to_event(dev: u16, midi: MidiEvent) -> Option<Event> {
    match midi {
        MidiEvent::NoteOn { key, velocity, .. } => {
            Some(Event::new(dev, key as u16, (velocity as u16) << 9))
        }
        MidiEvent::NoteOff { key, .. } => Some(Event::new(dev, key as u16, 0)),
        MidiEvent::ControlChange {
            controller, value, ..
        } => Some(Event::new(
            dev,
            CC_KEY_BASE + controller as u16,
            (value as u16) << 9,
        )),
        MidiEvent::PitchBend { .. } | MidiEvent::ProgramChange { .. } => None,
    }
}
