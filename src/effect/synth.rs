use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{key_freq, velocity, Action, Info, Note, Queue, Time},
    node::{Effect, Module, NodeBox},
    MAX_BLOCK_SIZE,
};

/*
Polyphonic Synth
================

Each voice is an independent copy of one module. Key events on the synth's
device allocate voices:

    event(dev, key, val)
      │
      ├─ a sounding voice already holds `key` ──► re-trigger it (init = false)
      ├─ a free voice exists ──────────────────► start it       (init = true)
      └─ otherwise ────────────────────────────► dropped

The voice receives an `Info::Note` immediately and starts rendering `delay`
samples into the block, so its output lines up with the event. A voice goes
back to the free pool the first block its module reports no continuation.

A key-up (`val == 0`) for a key no voice holds is ignored.
*/

#[derive(Clone)]
struct Voice {
    module: Box<dyn Module>,
    note: Note,
    /// Samples into the current block before the voice sounds, `None` when free.
    delay: Option<u32>,
}

/// Polyphonic voice allocator over a module template.
#[derive(Clone)]
pub struct Synth {
    dev: u16,
    voices: Vec<Voice>,
    tmp: Vec<f64>,
}

impl Synth {
    /// `n` voices, each a copy of `module`.
    pub fn new(dev: u16, n: usize, module: Box<dyn Module>) -> Self {
        let voices = (0..n)
            .map(|_| Voice {
                module: module.clone(),
                note: Note::default(),
                delay: None,
            })
            .collect();

        Self {
            dev,
            voices,
            tmp: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn active(&self) -> usize {
        self.voices.iter().filter(|v| v.delay.is_some()).count()
    }

    fn trigger(&mut self, action: &Action) {
        let event = action.event;
        if event.dev != self.dev {
            return;
        }

        let held = self
            .voices
            .iter()
            .position(|v| v.delay.is_some() && v.note.key == event.key);

        let (idx, init) = match held {
            Some(idx) => (idx, false),
            None if event.val == 0 => return,
            None => match self.voices.iter().position(|v| v.delay.is_none()) {
                Some(idx) => (idx, true),
                None => return,
            },
        };

        let voice = &mut self.voices[idx];
        voice.delay = Some(action.delay);
        voice.note = Note {
            init,
            delay: action.delay,
            key: event.key,
            freq: key_freq(event.key as i32),
            vel: velocity(event.val),
        };

        let note = voice.note;
        voice.module.info(&mut Info::Note(&note));
    }
}

impl Effect for Synth {
    fn info(&mut self, info: &mut Info<'_>) {
        if let Info::Action(action) = info {
            let action = **action;
            self.trigger(&action);
            return;
        }

        for voice in &mut self.voices {
            voice.module.info(info);
        }
    }

    fn process(&mut self, buf: &mut [f64], time: &[Time], queue: &Queue) -> bool {
        let len = buf.len().min(self.tmp.len());
        buf.fill(0.0);

        let mut cont = false;
        for voice in &mut self.voices {
            let Some(delay) = voice.delay else {
                continue;
            };

            let delay = delay as usize;
            if delay >= len {
                voice.delay = Some((delay - len) as u32);
                cont = true;
                continue;
            }

            let tmp = &mut self.tmp[..len - delay];
            let alive = voice.module.process(tmp, &time[delay..], queue);
            for (o, s) in buf[delay..].iter_mut().zip(tmp.iter()) {
                *o += s;
            }

            voice.delay = alive.then_some(0);
            cont |= alive;
        }

        cont
    }
}

/// `Synth(dev, voices, module)`
pub fn make(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(d,d,M)")?;
    let dev = args.int()?;
    let n = args.int()?;
    let module = args.module()?;

    let dev = u16::try_from(dev).map_err(|_| BuildError::invalid("Invalid device ID."))?;
    let n = usize::try_from(n)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| BuildError::invalid("Synth needs at least one voice."))?;

    Ok(NodeBox::effect(Synth::new(dev, n, module)))
}
