//! End-to-end checks through the public API

use soundbed::assets::{self, TrimOutcome};
use soundbed::codec::wav;
use soundbed::config::{LiveConfig, RenderConfig};
use soundbed::engine::{AudioContext, Mixer, TrackState, VirtualContext};
use soundbed::synth::noise_rng;
use soundbed::SoundKind;
use tempfile::TempDir;

#[test]
fn test_render_then_trim() {
    let dir = TempDir::new().unwrap();
    let config = RenderConfig {
        output_dir: dir.path().join("sounds"),
        sample_rate: 8000,
        duration_secs: 2.0,
        crossfade_secs: 0.25,
        seed: Some(7),
    };

    let rendered = assets::render_all(&config).unwrap();
    assert_eq!(rendered.len(), 5);

    let rain = std::fs::read(config.output_dir.join("rain.wav")).unwrap();
    let (header, samples) = wav::decode(&rain).unwrap();
    assert_eq!(header.sample_rate, 8000);
    assert_eq!(header.channels, 1);
    assert_eq!(header.bits_per_sample, 16);
    assert_eq!(samples.len(), 16_000);
    assert!(samples.iter().all(|s| s.is_finite()));
    let peak = samples.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
    assert!((peak - 0.8).abs() < 1e-3, "peak {peak}");

    let results = assets::trim_dir(&config.output_dir, 1.0).unwrap();
    assert_eq!(results.len(), 5);
    assert!(results
        .iter()
        .all(|(_, outcome)| matches!(outcome, TrimOutcome::Trimmed { .. })));

    let trimmed = std::fs::read(config.output_dir.join("rain.wav")).unwrap();
    let (_, samples) = wav::decode(&trimmed).unwrap();
    assert_eq!(samples.len(), 8000);
}

#[test]
fn test_live_volume_sequence() {
    let context = VirtualContext::new(8000);
    let mut mixer = Mixer::with_rng(context, &LiveConfig::default(), noise_rng(Some(1)));
    assert!(mixer.init());

    for (volume, expected) in [(50, 0.5f32), (0, 0.0), (100, 1.0)] {
        mixer.set_volume(SoundKind::Rain, volume);
        mixer.context_mut().advance(1.0);
        let gain = mixer.gain(SoundKind::Rain).unwrap();
        assert!((gain - expected).abs() < 1e-3, "volume {volume}: gain {gain}");
    }

    assert_eq!(mixer.track_state(SoundKind::Rain), TrackState::Active);
    mixer.shutdown();
    assert!(!mixer.context().is_running());
}

#[test]
fn test_premium_tracks_play_live() {
    let context = VirtualContext::new(8000);
    let mut mixer = Mixer::with_rng(context, &LiveConfig::default(), noise_rng(Some(2)));
    assert!(mixer.init());

    for kind in SoundKind::ALL.into_iter().filter(|k| k.is_premium()) {
        mixer.set_volume(kind, 50);
        assert_eq!(mixer.track_state(kind), TrackState::Active);
    }
    let out = mixer.context_mut().advance(2.5);
    assert!(out.iter().all(|s| s.is_finite()));
    assert!(out.iter().any(|&s| s != 0.0));
}
