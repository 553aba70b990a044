//! The block-rendering loop tying clock, sequencer, instrument and effects together.

use tracing::{debug, info};

use crate::{
    build::BuildContext,
    clock::Basic,
    core::{Info, Queue, Seek, Time},
    node::{Clock, Effect, Instrument, Sequencer},
    MAX_BLOCK_SIZE,
};

pub mod config;
pub mod graph;
pub mod receiver;

pub use config::EngineConfig;
pub use graph::Graph;
#[cfg(feature = "rtrb")]
pub use receiver::event_channel;
pub use receiver::EventReceiver;

/*
Engine
======

One `render` call fills a stereo buffer pair, split into blocks of at most
MAX_BLOCK_SIZE samples. Every block runs the same fixed order:

  ┌──────────────┐  Start/Stop when the run flag flipped
  │ transport    │
  ├──────────────┤  ring → queue at delay 0, never more than the queue holds
  │ drain        │
  ├──────────────┤  time[0..=len]
  │ clock        │
  ├──────────────┤  may add, remove or rewrite queued actions
  │ sequencer    │
  ├──────────────┤  info(Action) for every queued action
  │ deliver      │
  ├──────────────┤  writes left/right (or left+right passthrough)
  │ instrument   │
  ├──────────────┤  effect[0] on left, effect[1] on right
  │ effects      │
  └──────────────┘

Everything on this path is preallocated: the time array is sized once, the
queue is a fixed array, and events that do not fit stay in the ring until the
next block.
*/

pub struct Engine {
    config: EngineConfig,
    clock: Box<dyn Clock>,
    seq: Option<Box<dyn Sequencer>>,
    instr: Option<Box<dyn Instrument>>,
    effect: [Option<Box<dyn Effect>>; 2],
    receiver: Option<Box<dyn EventReceiver + Send>>,
    time: Vec<Time>,
    queue: Queue,
    run: bool,
    running: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let clock = Basic::new(config.bpm, config.beats_per_bar, config.sample_rate);

        Self {
            config,
            clock: Box::new(clock),
            seq: None,
            instr: None,
            effect: [None, None],
            receiver: None,
            time: vec![Time::ZERO; MAX_BLOCK_SIZE + 1],
            queue: Queue::new(),
            run: false,
            running: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Construction context matching this engine's rate.
    pub fn context(&self) -> BuildContext {
        BuildContext::new(self.config.sample_rate)
    }

    pub fn set_receiver(&mut self, receiver: impl EventReceiver + Send + 'static) {
        self.receiver = Some(Box::new(receiver));
    }

    /// Swap in every slot the graph fills. Replaced nodes are dropped here.
    pub fn load(&mut self, graph: Graph) {
        let Graph {
            clock,
            seq,
            instr,
            effect,
            run,
        } = graph;

        info!(
            clock = clock.is_some(),
            seq = seq.is_some(),
            instr = instr.is_some(),
            effect = effect.iter().any(Option::is_some),
            "loading graph"
        );

        if let Some(clock) = clock {
            self.clock = clock;
            // A fresh clock starts stopped.
            self.running = false;
        }
        if seq.is_some() {
            self.seq = seq;
        }
        if instr.is_some() {
            self.instr = instr;
        }
        for (slot, effect) in self.effect.iter_mut().zip(effect) {
            if effect.is_some() {
                *slot = effect;
            }
        }
        if let Some(run) = run {
            self.run = run;
        }
    }

    /// Request the transport to start or stop at the next block.
    pub fn set_running(&mut self, run: bool) {
        self.run = run;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Move the transport to `bar`/`beat` and tell the rest of the graph.
    pub fn seek(&mut self, bar: i32, beat: f64) -> Seek {
        let mut seek = Seek::to(bar, beat);
        self.clock.info(&mut Info::Seek(&mut seek));

        if let Some(seq) = self.seq.as_mut() {
            seq.info(&mut Info::Seek(&mut seek));
        }
        if let Some(instr) = self.instr.as_mut() {
            instr.info(&mut Info::Seek(&mut seek));
        }
        for effect in self.effect.iter_mut().flatten() {
            effect.info(&mut Info::Seek(&mut seek));
        }

        debug!(bar, beat, index = seek.index, "seek");
        seek
    }

    /// Current transport position.
    pub fn tell(&mut self) -> Time {
        let mut time = Time::ZERO;
        self.clock.info(&mut Info::Tell(&mut time));
        time
    }

    /// Render `left`/`right` in place.
    ///
    /// On entry the buffers hold the input signal, used as a passthrough when
    /// no instrument is loaded. Returns true while any node reports activity.
    pub fn render(&mut self, left: &mut [f64], right: &mut [f64]) -> bool {
        let len = left.len().min(right.len());
        let mut active = false;

        for (l, r) in left[..len]
            .chunks_mut(MAX_BLOCK_SIZE)
            .zip(right[..len].chunks_mut(MAX_BLOCK_SIZE))
        {
            active |= self.render_block(l, r);
        }

        active
    }

    fn render_block(&mut self, left: &mut [f64], right: &mut [f64]) -> bool {
        let len = left.len();

        self.transport();
        self.drain();

        let time = &mut self.time[..=len];
        self.clock.process(time);
        let time = &self.time[..=len];

        if let Some(seq) = self.seq.as_mut() {
            seq.process(time, &mut self.queue);
        }

        for action in self.queue.iter() {
            if let Some(instr) = self.instr.as_mut() {
                instr.info(&mut Info::Action(action));
            }
            for effect in self.effect.iter_mut().flatten() {
                effect.info(&mut Info::Action(action));
            }
        }

        let mut active = match self.instr.as_mut() {
            Some(instr) => instr.process(&mut [&mut *left, &mut *right], time, &self.queue),
            None => {
                for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                    let sum = *l + *r;
                    *l = sum;
                    *r = sum;
                }
                false
            }
        };

        if let Some(effect) = self.effect[0].as_mut() {
            active |= effect.process(left, time, &self.queue);
        }
        if let Some(effect) = self.effect[1].as_mut() {
            active |= effect.process(right, time, &self.queue);
        }

        active
    }

    fn transport(&mut self) {
        if self.run == self.running {
            return;
        }

        let mut seek = Seek::default();
        if self.run {
            self.clock.info(&mut Info::Start(&mut seek));
        } else {
            self.clock.info(&mut Info::Stop(&mut seek));
        }
        self.running = self.run;
    }

    fn drain(&mut self) {
        self.queue.clear();

        let Some(receiver) = self.receiver.as_mut() else {
            return;
        };

        while self.queue.remaining() > 0 {
            match receiver.pop() {
                Some(event) => {
                    self.queue.add(event, 0);
                }
                None => break,
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("seq", &self.seq.is_some())
            .field("instr", &self.instr.is_some())
            .field("running", &self.running)
            .finish()
    }
}
