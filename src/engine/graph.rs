//! The live voice graph
//!
//! Looping voice buffers, each behind a gain parameter, summed to one mono
//! output. The graph owns the clock: time only moves when samples are
//! pulled, whether by an audio device callback or a virtual clock.

use super::param::AudioParam;
use crate::profile::SoundKind;
use std::sync::{Arc, Mutex, MutexGuard};

/// Graph handle shared between the controller and the audio thread
pub type SharedGraph = Arc<Mutex<Graph>>;

/// Lock the graph, recovering the data if a holder panicked
pub fn lock(graph: &Mutex<Graph>) -> MutexGuard<'_, Graph> {
    graph.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One looping track
struct Voice {
    kind: SoundKind,
    buffer: Arc<[f32]>,
    position: usize,
    gain: AudioParam,
}

impl Voice {
    fn next(&mut self, t: f64) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sample = self.buffer[self.position] * self.gain.value_at(t);
        self.position = (self.position + 1) % self.buffer.len();
        sample
    }
}

/// Mono mixing graph
pub struct Graph {
    sample_rate: u32,
    frames: u64,
    voices: Vec<Voice>,
}

impl Graph {
    pub fn new(sample_rate: u32) -> Self {
        assert!(sample_rate > 0, "sample rate must be nonzero");
        Self {
            sample_rate,
            frames: 0,
            voices: Vec::new(),
        }
    }

    pub fn shared(sample_rate: u32) -> SharedGraph {
        Arc::new(Mutex::new(Self::new(sample_rate)))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Seconds of audio rendered so far
    pub fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn has_voice(&self, kind: SoundKind) -> bool {
        self.voices.iter().any(|v| v.kind == kind)
    }

    /// Start looping `buffer` for `kind` at silent gain
    ///
    /// Replaces nothing: a second voice for the same kind is ignored.
    pub fn add_voice(&mut self, kind: SoundKind, buffer: Vec<f32>) {
        if self.has_voice(kind) {
            return;
        }
        self.voices.push(Voice {
            kind,
            buffer: buffer.into(),
            position: 0,
            gain: AudioParam::new(0.0),
        });
    }

    /// Ramp the voice's gain to `target` starting now
    ///
    /// Returns false if there is no voice for `kind`.
    pub fn schedule_gain(&mut self, kind: SoundKind, target: f32, time_constant: f64) -> bool {
        let now = self.current_time();
        match self.voices.iter_mut().find(|v| v.kind == kind) {
            Some(voice) => {
                voice.gain.set_target_at_time(target, now, time_constant);
                true
            }
            None => false,
        }
    }

    /// Current gain of the voice for `kind`
    pub fn gain(&self, kind: SoundKind) -> Option<f32> {
        let now = self.current_time();
        self.voices
            .iter()
            .find(|v| v.kind == kind)
            .map(|v| v.gain.value_at(now))
    }

    /// Pull the next output sample and advance the clock
    ///
    /// Voices are summed without headroom; the mix is hard clipped to
    /// [-1, 1] before it reaches the device.
    pub fn next_sample(&mut self) -> f32 {
        let t = self.current_time();
        let sum: f32 = self.voices.iter_mut().map(|v| v.next(t)).sum();
        self.frames += 1;
        sum.clamp(-1.0, 1.0)
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Drop every voice
    pub fn stop_all(&mut self) {
        self.voices.clear();
    }
}
