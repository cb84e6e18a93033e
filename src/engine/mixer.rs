//! Live track mixer
//!
//! One looping voice per sound kind, created the first time the track is
//! turned up and kept until the mixer shuts down. Volume and mute changes
//! never touch samples directly: they schedule gain ramps on the graph,
//! stamped with the graph's own clock.
//!
//! Track lifecycle:
//! - Idle: no voice yet
//! - Active: voice playing, gain heading to `volume / 100`
//! - MutedActive: voice playing, gain heading to 0 because of global mute

use super::context::AudioContext;
use super::graph::{self, SharedGraph};
use crate::config::LiveConfig;
use crate::profile::SoundKind;
use crate::synth::{noise_rng, NoiseRng};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Highest track volume
pub const MAX_VOLUME: u8 = 100;

/// Where a track is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Idle,
    Active,
    MutedActive,
}

/// Live mixer over an injected audio context
pub struct Mixer<C: AudioContext> {
    context: C,
    graph: SharedGraph,
    config: LiveConfig,
    volumes: BTreeMap<SoundKind, u8>,
    muted: bool,
    rng: NoiseRng,
}

impl<C: AudioContext> Mixer<C> {
    /// Create a mixer; stored volumes and mute come from `config`
    ///
    /// Nothing is rendered and the context is left suspended until
    /// [`init`](Self::init).
    pub fn new(context: C, config: &LiveConfig) -> Self {
        Self::with_rng(context, config, noise_rng(None))
    }

    /// Create a mixer with an explicit random source
    pub fn with_rng(context: C, config: &LiveConfig, rng: NoiseRng) -> Self {
        let volumes = config
            .volumes
            .iter()
            .map(|(&kind, &volume)| (kind, volume.min(MAX_VOLUME)))
            .collect();

        Self {
            graph: context.graph(),
            context,
            config: config.clone(),
            volumes,
            muted: config.muted,
            rng,
        }
    }

    /// Start audio output
    ///
    /// Call from a user gesture. If the context refuses to start the mixer
    /// stays idle and returns false; volumes set meanwhile are kept and
    /// applied by the next successful call.
    pub fn init(&mut self) -> bool {
        if let Err(e) = self.context.resume() {
            warn!("audio output not started: {}", e);
            return false;
        }

        info!(
            "audio running at {} Hz with {} stored track(s)",
            self.context.sample_rate(),
            self.volumes.len()
        );
        let kinds: Vec<SoundKind> = self.volumes.keys().copied().collect();
        for kind in kinds {
            self.apply(kind);
        }
        true
    }

    /// Whether the context is producing audio
    pub fn is_ready(&self) -> bool {
        self.context.is_running()
    }

    /// Set a track's volume, 0-100 (higher values are clamped)
    pub fn set_volume(&mut self, kind: SoundKind, volume: u8) {
        self.volumes.insert(kind, volume.min(MAX_VOLUME));
        self.apply(kind);
    }

    /// Stored volume of a track (0 if never set)
    pub fn volume(&self, kind: SoundKind) -> u8 {
        self.volumes.get(&kind).copied().unwrap_or(0)
    }

    /// Flip global mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        debug!("mute {}", if muted { "on" } else { "off" });

        let kinds: Vec<SoundKind> = self.volumes.keys().copied().collect();
        let mut graph = graph::lock(&self.graph);
        for kind in kinds {
            let target = self.target_gain(kind);
            graph.schedule_gain(kind, target, self.config.ramp_time_constant);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn track_state(&self, kind: SoundKind) -> TrackState {
        if !graph::lock(&self.graph).has_voice(kind) {
            TrackState::Idle
        } else if self.muted {
            TrackState::MutedActive
        } else {
            TrackState::Active
        }
    }

    /// Current gain of a track's voice, `None` while idle
    pub fn gain(&self, kind: SoundKind) -> Option<f32> {
        graph::lock(&self.graph).gain(kind)
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the context, e.g. to advance a virtual clock
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Stop every voice and close the context
    pub fn shutdown(&mut self) {
        let voices = {
            let mut graph = graph::lock(&self.graph);
            let count = graph.voice_count();
            graph.stop_all();
            count
        };
        if voices > 0 {
            debug!("stopped {} voice(s)", voices);
        }
        self.context.close();
    }

    fn target_gain(&self, kind: SoundKind) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume(kind) as f32 / MAX_VOLUME as f32
        }
    }

    /// Bring a track's voice in line with its stored volume
    fn apply(&mut self, kind: SoundKind) {
        if !self.context.is_running() {
            return;
        }

        let volume = self.volume(kind);
        let needs_voice = volume > 0 && !graph::lock(&self.graph).has_voice(kind);
        if needs_voice {
            // Render outside the lock so the audio thread keeps running
            let buffer = kind.profile().render(
                self.context.sample_rate(),
                self.config.buffer_secs,
                self.config.crossfade_secs,
                &mut self.rng,
            );
            info!("starting {} voice ({} samples)", kind, buffer.len());
            graph::lock(&self.graph).add_voice(kind, buffer);
        }

        let target = self.target_gain(kind);
        graph::lock(&self.graph).schedule_gain(kind, target, self.config.ramp_time_constant);
    }
}

impl<C: AudioContext> Drop for Mixer<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::{ContextState, VirtualContext};
    use rand::SeedableRng;

    const SR: u32 = 8000;

    fn mixer(context: VirtualContext, config: &LiveConfig) -> Mixer<VirtualContext> {
        Mixer::with_rng(context, config, NoiseRng::seed_from_u64(42))
    }

    fn settle(mixer: &mut Mixer<VirtualContext>) {
        // ten time constants
        let secs = mixer.config.ramp_time_constant * 10.0;
        mixer.context_mut().advance(secs);
    }

    #[test]
    fn test_gain_follows_volume_changes() {
        let mut m = mixer(VirtualContext::new(SR), &LiveConfig::default());
        assert!(m.init());

        m.set_volume(SoundKind::Rain, 50);
        settle(&mut m);
        assert!((m.gain(SoundKind::Rain).unwrap() - 0.5).abs() < 1e-3);

        m.set_volume(SoundKind::Rain, 0);
        settle(&mut m);
        assert!(m.gain(SoundKind::Rain).unwrap().abs() < 1e-3);
        // turned down, not torn down
        assert_eq!(m.track_state(SoundKind::Rain), TrackState::Active);

        m.set_volume(SoundKind::Rain, 100);
        settle(&mut m);
        assert!((m.gain(SoundKind::Rain).unwrap() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_ramp_is_gradual() {
        let mut m = mixer(VirtualContext::new(SR), &LiveConfig::default());
        m.init();
        m.set_volume(SoundKind::Fire, 100);

        // one time constant in: 1 - 1/e of the way there
        m.context_mut().advance(0.1);
        let gain = m.gain(SoundKind::Fire).unwrap();
        assert!((gain - 0.632).abs() < 0.01, "gain {gain}");
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut m = mixer(VirtualContext::new(SR), &LiveConfig::default());
        m.set_volume(SoundKind::Cafe, 250);
        assert_eq!(m.volume(SoundKind::Cafe), 100);
        assert_eq!(m.volume(SoundKind::Wind), 0);
    }

    #[test]
    fn test_voices_are_lazy() {
        let mut m = mixer(VirtualContext::new(SR), &LiveConfig::default());
        m.init();
        m.set_volume(SoundKind::Stream, 0);
        assert_eq!(m.track_state(SoundKind::Stream), TrackState::Idle);
        assert_eq!(m.gain(SoundKind::Stream), None);

        m.set_volume(SoundKind::Stream, 10);
        assert_eq!(m.track_state(SoundKind::Stream), TrackState::Active);
    }

    #[test]
    fn test_mute_round_trip() {
        let mut m = mixer(VirtualContext::new(SR), &LiveConfig::default());
        m.init();
        m.set_volume(SoundKind::Rain, 80);
        settle(&mut m);

        assert!(m.toggle_mute());
        assert_eq!(m.track_state(SoundKind::Rain), TrackState::MutedActive);
        settle(&mut m);
        assert!(m.gain(SoundKind::Rain).unwrap().abs() < 1e-3);

        // changes while muted are remembered but stay silent
        m.set_volume(SoundKind::Rain, 40);
        settle(&mut m);
        assert!(m.gain(SoundKind::Rain).unwrap().abs() < 1e-3);

        assert!(!m.toggle_mute());
        assert_eq!(m.track_state(SoundKind::Rain), TrackState::Active);
        settle(&mut m);
        assert!((m.gain(SoundKind::Rain).unwrap() - 0.4).abs() < 1e-3);
    }

    #[test]
    fn test_blocked_start_keeps_volumes() {
        let mut m = mixer(VirtualContext::gesture_gated(SR), &LiveConfig::default());
        assert!(!m.init());
        assert!(!m.is_ready());

        m.set_volume(SoundKind::Thunder, 70);
        assert_eq!(m.track_state(SoundKind::Thunder), TrackState::Idle);

        m.context_mut().allow();
        assert!(m.init());
        assert_eq!(m.track_state(SoundKind::Thunder), TrackState::Active);
        settle(&mut m);
        assert!((m.gain(SoundKind::Thunder).unwrap() - 0.7).abs() < 1e-3);
    }

    #[test]
    fn test_config_volumes_applied_on_init() {
        let mut config = LiveConfig::default();
        config.volumes.insert(SoundKind::Night, 30);
        config.muted = true;

        let mut m = mixer(VirtualContext::new(SR), &config);
        assert!(m.is_muted());
        m.init();
        assert_eq!(m.track_state(SoundKind::Night), TrackState::MutedActive);

        m.set_muted(false);
        settle(&mut m);
        assert!((m.gain(SoundKind::Night).unwrap() - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_output_is_bounded() {
        let mut m = mixer(VirtualContext::new(SR), &LiveConfig::default());
        m.init();
        m.set_volume(SoundKind::Rain, 100);
        m.set_volume(SoundKind::Wind, 100);

        let out = m.context_mut().advance(3.0);
        assert!(out.iter().all(|s| s.is_finite()));
        assert!(out.iter().all(|s| s.abs() <= 1.0));
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_shutdown_stops_everything() {
        let mut m = mixer(VirtualContext::new(SR), &LiveConfig::default());
        m.init();
        m.set_volume(SoundKind::White, 60);
        m.shutdown();

        assert_eq!(m.context().state(), ContextState::Closed);
        assert_eq!(m.track_state(SoundKind::White), TrackState::Idle);
        // a closed context cannot be restarted
        assert!(!m.init());
    }
}
