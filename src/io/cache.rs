use std::{
    collections::HashMap,
    ops::Deref,
    path::Path,
    sync::{Arc, Mutex, Weak},
};

use tracing::{debug, info};

use crate::build::BuildError;

/// A decoded mono sample buffer at the engine rate.
#[derive(Debug)]
pub struct SampleBuf {
    pub path: String,
    pub chan: u16,
    pub data: Vec<f64>,
}

/// Shared handle to a cached buffer. Cloning bumps the refcount; the last
/// drop frees the samples.
#[derive(Debug, Clone)]
pub struct Sample(Arc<SampleBuf>);

impl Deref for Sample {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0.data
    }
}

impl Sample {
    pub fn path(&self) -> &str {
        &self.0.path
    }

    pub fn refs(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

type Key = (String, u16);

/// Refcounted cache of sample buffers keyed by path and channel.
///
/// The handle itself is cheap to clone; every clone sees the same entries.
/// Lookups lock a mutex, so `open` belongs to construction time, never to
/// the audio callback.
#[derive(Debug, Clone, Default)]
pub struct SampleCache {
    files: Arc<Mutex<HashMap<Key, Weak<SampleBuf>>>>,
}

impl SampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` (channel `chan`) resampled to `rate`, sharing an already-open buffer.
    pub fn open(&self, path: &str, chan: u16, rate: u32) -> Result<Sample, BuildError> {
        let key = (path.to_string(), chan);
        let mut files = self.lock()?;

        if let Some(buf) = files.get(&key).and_then(Weak::upgrade) {
            debug!(path, chan, "sample cache hit");
            return Ok(Sample(buf));
        }

        let data = load_wav(Path::new(path), chan, rate)?;
        info!(path, chan, frames = data.len(), "loaded sample");

        let buf = Arc::new(SampleBuf {
            path: path.to_string(),
            chan,
            data,
        });
        files.insert(key, Arc::downgrade(&buf));

        Ok(Sample(buf))
    }

    /// Register an in-memory buffer under `path`, replacing nothing that is still open.
    pub fn insert(&self, path: &str, chan: u16, data: Vec<f64>) -> Result<Sample, BuildError> {
        let key = (path.to_string(), chan);
        let mut files = self.lock()?;

        if let Some(buf) = files.get(&key).and_then(Weak::upgrade) {
            return Ok(Sample(buf));
        }

        let buf = Arc::new(SampleBuf {
            path: path.to_string(),
            chan,
            data,
        });
        files.insert(key, Arc::downgrade(&buf));

        Ok(Sample(buf))
    }

    /// Number of entries with at least one live handle. Dead entries are pruned.
    pub fn live(&self) -> usize {
        match self.files.lock() {
            Ok(mut files) => {
                files.retain(|_, buf| buf.strong_count() > 0);
                files.len()
            }
            Err(_) => 0,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Key, Weak<SampleBuf>>>, BuildError> {
        self.files.lock().map_err(|_| BuildError::Resource {
            path: String::new(),
            reason: "sample cache poisoned".into(),
        })
    }
}

fn load_wav(path: &Path, chan: u16, rate: u32) -> Result<Vec<f64>, BuildError> {
    let fail = |reason: String| BuildError::Resource {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = hound::WavReader::open(path).map_err(|e| fail(e.to_string()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    if chan as usize >= channels {
        return Err(fail(format!("no channel {} ({} available)", chan, channels)));
    }

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(|e| fail(e.to_string()))?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<Result<_, _>>()
                .map_err(|e| fail(e.to_string()))?
        }
    };

    let mono: Vec<f64> = interleaved
        .chunks(channels)
        .filter_map(|frame| frame.get(chan as usize).copied())
        .collect();

    Ok(resample(&mono, spec.sample_rate, rate))
}

/// Linear-interpolation resample from `from` Hz to `to` Hz.
pub fn resample(data: &[f64], from: u32, to: u32) -> Vec<f64> {
    if from == to || from == 0 || to == 0 || data.is_empty() {
        return data.to_vec();
    }

    let step = from as f64 / to as f64;
    let frames = ((data.len() as f64) / step).floor() as usize;

    (0..frames)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos as usize;
            let frac = pos - idx as f64;
            let a = data[idx.min(data.len() - 1)];
            let b = data[(idx + 1).min(data.len() - 1)];
            a + (b - a) * frac
        })
        .collect()
}
