/// A decoded channel-voice MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode raw MIDI bytes. A NoteOn with velocity 0 is a NoteOff.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        let channel = status & 0x0F;

        let event = match (status & 0xF0, data) {
            (0x90, &[key, velocity, ..]) if velocity > 0 => MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            },
            (0x90, &[key, _, ..]) => MidiEvent::NoteOff {
                channel,
                key,
                velocity: 0,
            },
            (0x80, &[key, velocity, ..]) => MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            },
            (0xB0, &[controller, value, ..]) => MidiEvent::ControlChange {
                channel,
                controller,
                value,
            },
            (0xC0, &[program, ..]) => MidiEvent::ProgramChange { channel, program },
            (0xE0, &[lsb, msb, ..]) => MidiEvent::PitchBend {
                channel,
                value: (((msb as i16) << 7) | lsb as i16) - 8192,
            },
            _ => return None,
        };

        Some(event)
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}
