//! cpal playback for an engine graph.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Producer;
use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};
use tracing::{info, warn};

use ampsynth::{
    build::{Env, Value},
    core::Event,
    engine::{event_channel, Engine, EngineConfig, Graph},
    io::{midi_to_event, MidiEvent, CC_KEY_BASE},
    MAX_BLOCK_SIZE,
};

/// MIDI channel-volume controller.
const VOLUME_CC: u8 = 7;

/// Engine address of the master volume knob: device 1, CC 7.
pub const VOLUME: (u16, u16) = (1, CC_KEY_BASE + VOLUME_CC as u16);

pub struct Amp {
    config: EngineConfig,
    bindings: Vec<(String, Value)>,
}

impl Amp {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            bindings: Vec::new(),
        }
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.config = self.config.bpm(bpm);
        self
    }

    /// Bind an unevaluated script value to an engine slot (`amp.seq`, ...).
    pub fn bind(mut self, name: &str, value: Value) -> Self {
        self.bindings.push((name.to_string(), value));
        self
    }

    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let mut engine = Engine::new(self.config.sample_rate(sample_rate));
        let cx = engine.context();
        let env = Env::core();

        let mut graph = Graph::new();
        for (name, value) in self.bindings {
            let value = env
                .eval(value, &cx)
                .wrap_err_with(|| format!("failed to build '{}'", name))?;
            graph.bind(&name, value).wrap_err("failed to bind graph")?;
        }
        engine.load(graph);

        let (producer, consumer) = event_channel(engine.config().event_capacity);
        engine.set_receiver(consumer);

        info!(
            sample_rate,
            channels,
            bpm = engine.config().bpm,
            "starting playback"
        );

        let engine = Arc::new(Mutex::new(engine));
        let engine_clone = engine.clone();
        let mut left = vec![0.0f64; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f64; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                // Never wait on the controller side; output silence instead.
                let Ok(mut engine) = engine_clone.try_lock() else {
                    data.fill(0.0);
                    return;
                };

                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let (l, r) = (&mut left[..frames], &mut right[..frames]);
                    l.fill(0.0);
                    r.fill(0.0);

                    engine.render(l, r);

                    let out_off = frames_written * channels;
                    for i in 0..frames {
                        let frame = &mut data[out_off + i * channels..out_off + (i + 1) * channels];
                        for (ch, out) in frame.iter_mut().enumerate() {
                            let s = if ch % 2 == 0 { l[i] } else { r[i] };
                            *out = s as f32;
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| warn!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        if let Ok(mut engine) = engine.lock() {
            engine.set_running(true);
        }

        info!("playing, press Ctrl+C to stop");
        sweep(producer);

        Ok(())
    }
}

impl Default for Amp {
    fn default() -> Self {
        Self::new()
    }
}

/// Slowly sweep the volume controller, forever, as raw MIDI CC messages.
fn sweep(mut producer: Producer<Event>) {
    let (dev, _) = VOLUME;
    let mut phase = 0.0f64;

    loop {
        thread::sleep(Duration::from_millis(50));
        phase = (phase + 0.01).rem_euclid(1.0);

        let level = 0.5 + 0.5 * (phase * std::f64::consts::TAU).sin();
        let bytes = [0xB0, VOLUME_CC, (level * 127.0) as u8];

        let Some(event) =
            MidiEvent::from_bytes(&bytes).and_then(|midi| midi_to_event(dev, midi))
        else {
            continue;
        };
        if producer.push(event).is_err() {
            warn!("controller ring full, dropping event");
        }
    }
}
