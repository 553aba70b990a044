use tracing::debug;

use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::{velocity, Queue, Time},
    io::Sample,
    node::{Module, NodeBox},
};

/*
Sample Player
=============

Velocity layers of round-robin sample files, played from the block queue:

    layers:  [ soft_1 soft_2 ]   vel in [0, 1/3)
             [ mid_1         ]   vel in [1/3, 2/3)
             [ hard_1 hard_2 ]   vel in [2/3, 1]
                  ^rr

A key-down picks the layer for its velocity, takes that layer's next file in
rotation and starts it in the next of `n` play slots. The slot played before
it starts fading: its volume is multiplied by `decay` now and on every
following sample. Key-ups are ignored; a sample always plays to its end.

Buffers are shared handles from the sample cache, so copies of the player
share memory and the last one dropped releases it.
*/

#[derive(Clone, Debug)]
struct Layer {
    files: Vec<Sample>,
    rr: usize,
}

#[derive(Clone, Debug, Default)]
struct Play {
    buf: Option<Sample>,
    vol: f64,
    idx: usize,
}

#[derive(Clone, Debug)]
pub struct Sampler {
    decay: f64,
    layers: Vec<Layer>,
    play: Vec<Play>,
    cur: usize,
}

impl Sampler {
    /// `layers` ordered soft to hard, none of them empty.
    pub fn new(n: usize, decay: f64, layers: Vec<Vec<Sample>>) -> Self {
        Self {
            decay,
            layers: layers
                .into_iter()
                .map(|files| Layer { files, rr: 0 })
                .collect(),
            play: vec![Play::default(); n.max(1)],
            cur: 0,
        }
    }

    fn trigger(&mut self, val: u16) {
        if val == 0 || self.layers.is_empty() {
            return;
        }

        let n = self.layers.len();
        let idx = ((velocity(val) * n as f64) as usize).min(n - 1);
        let layer = &mut self.layers[idx];
        if layer.files.is_empty() {
            return;
        }

        let file = layer.files[layer.rr].clone();
        layer.rr = (layer.rr + 1) % layer.files.len();

        let slots = self.play.len();
        self.play[self.cur] = Play {
            buf: Some(file),
            vol: 1.0,
            idx: 0,
        };
        self.play[(self.cur + slots - 1) % slots].vol *= self.decay;
        self.cur = (self.cur + 1) % slots;
    }
}

impl Module for Sampler {
    fn process(&mut self, buf: &mut [f64], _time: &[Time], queue: &Queue) -> bool {
        let mut cont = false;
        let mut cursor = 0;

        for (i, s) in buf.iter_mut().enumerate() {
            while let Some(action) = queue.next_action(&mut cursor, i as u32) {
                let val = action.event.val;
                self.trigger(val);
            }

            *s = 0.0;
            for play in &mut self.play {
                let Some(data) = play.buf.as_ref() else {
                    continue;
                };
                let Some(&x) = data.get(play.idx) else {
                    continue;
                };

                cont = true;
                *s += play.vol * x;
                play.idx += 1;
                if play.vol < 1.0 {
                    play.vol *= self.decay;
                }
            }
        }

        cont
    }
}

/// `Sample(voices, decay, [[path, ...], ...])`
pub fn make(value: Value, cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let mut args = unpack(value, "(d,f,[[s]])")?;
    let n = args.int()?;
    let decay = args.num()?;

    let n = usize::try_from(n)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| BuildError::invalid("Sample needs at least one voice."))?;

    let mut layers = Vec::new();
    for mut layer in args.list()? {
        let mut files = Vec::new();
        for mut path in layer.list()? {
            let path = path.string()?;
            files.push(cx.cache.open(&path, 0, cx.rate)?);
        }
        if files.is_empty() {
            return Err(BuildError::invalid("Velocity layer has no samples."));
        }
        layers.push(files);
    }

    if layers.is_empty() {
        return Err(BuildError::invalid("Sample needs at least one layer."));
    }

    debug!(voices = n, layers = layers.len(), "built sample player");
    Ok(NodeBox::module(Sampler::new(n, decay, layers)))
}
