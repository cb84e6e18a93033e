//! The recipe table

use super::{Layer, SoundKind, SoundProfile};
use crate::synth::{FilterSpec, Modulation, NoiseKind, SineTerm, Timbre, TransientLayer};

pub(super) fn profile(kind: SoundKind) -> SoundProfile {
    match kind {
        SoundKind::Rain => rain(),
        SoundKind::Fire => fire(),
        SoundKind::Cafe => cafe(),
        SoundKind::Stream => stream(),
        SoundKind::White => white(),
        SoundKind::Thunder => thunder(),
        SoundKind::Wind => wind(),
        SoundKind::Night => night(),
    }
}

fn layer(noise: NoiseKind, filters: Vec<FilterSpec>) -> Layer {
    Layer {
        noise,
        pre_gain: 1.0,
        filters,
        modulation: None,
        level: 1.0,
    }
}

fn rain() -> SoundProfile {
    SoundProfile {
        kind: SoundKind::Rain,
        layers: vec![layer(
            NoiseKind::Pink,
            vec![
                FilterSpec::lowpass(700.0),
                FilterSpec::lowpass(1400.0),
                FilterSpec::highshelf(2000.0, -8.0),
            ],
        )],
        // drops
        transients: Some(TransientLayer {
            rate: 40.0,
            amplitude: (0.1, 0.4),
            decay: (0.002, 0.008),
            shape: 0.25,
            timbre: Timbre::Noise,
            filters: vec![FilterSpec::lowpass(3000.0)],
            level: 0.3,
        }),
        modulation: Some(Modulation::new(
            0.7,
            vec![
                SineTerm::new(0.1, 0.15, 0.0),
                SineTerm::new(0.23, 0.1, 1.3),
                SineTerm::new(0.07, 0.05, 2.1),
            ],
        )),
        target_peak: 0.8,
    }
}

fn fire() -> SoundProfile {
    SoundProfile {
        kind: SoundKind::Fire,
        layers: vec![Layer {
            pre_gain: 3.5,
            ..layer(
                NoiseKind::Brown { leak: 0.02 },
                vec![
                    FilterSpec::lowpass(200.0),
                    FilterSpec::lowpass(400.0),
                    FilterSpec::highshelf(500.0, -10.0),
                ],
            )
        }],
        // crackle
        transients: Some(TransientLayer {
            rate: 6.0,
            amplitude: (0.2, 0.8),
            decay: (0.001, 0.006),
            shape: 0.2,
            timbre: Timbre::Noise,
            filters: vec![FilterSpec::bandpass(2500.0, 1.5), FilterSpec::lowpass(5000.0)],
            level: 0.15,
        }),
        modulation: Some(Modulation::new(
            0.75,
            vec![SineTerm::new(0.13, 0.15, 0.0), SineTerm::new(0.31, 0.1, 0.7)],
        )),
        target_peak: 0.8,
    }
}

fn cafe() -> SoundProfile {
    let room = Layer {
        level: 0.6,
        ..layer(
            NoiseKind::Pink,
            vec![FilterSpec::bandpass(1000.0, 0.5), FilterSpec::lowpass(3000.0)],
        )
    };
    let murmur = Layer {
        modulation: Some(Modulation::new(
            0.5,
            vec![
                SineTerm::new(0.2, 0.2, 0.0),
                SineTerm::new(0.45, 0.15, 1.1),
                SineTerm::new(0.9, 0.1, 2.3),
            ],
        )),
        level: 0.5,
        ..layer(NoiseKind::Pink, vec![FilterSpec::bandpass(800.0, 1.0)])
    };

    SoundProfile {
        kind: SoundKind::Cafe,
        layers: vec![room, murmur],
        // cups and spoons
        transients: Some(TransientLayer {
            rate: 0.8,
            amplitude: (0.1, 0.3),
            decay: (0.05, 0.15),
            shape: 0.3,
            timbre: Timbre::Tone {
                min_hz: 2000.0,
                max_hz: 4500.0,
            },
            filters: vec![],
            level: 0.2,
        }),
        modulation: None,
        target_peak: 0.8,
    }
}

fn stream() -> SoundProfile {
    let flow = Layer {
        pre_gain: 3.5,
        modulation: Some(Modulation::new(
            0.8,
            vec![
                SineTerm::new(0.15, 0.1, 0.0),
                SineTerm::new(0.4, 0.06, 0.9),
                SineTerm::new(1.1, 0.04, 2.0),
            ],
        )),
        ..layer(
            NoiseKind::Brown { leak: 0.035 },
            vec![
                FilterSpec::lowpass(600.0),
                FilterSpec::lowpass(1200.0),
                FilterSpec::highshelf(1500.0, -6.0),
            ],
        )
    };
    let babble = Layer {
        modulation: Some(Modulation::new(
            0.5,
            vec![SineTerm::new(2.3, 0.3, 0.0), SineTerm::new(3.7, 0.2, 1.7)],
        )),
        level: 0.4,
        ..layer(NoiseKind::Pink, vec![FilterSpec::bandpass(600.0, 0.8)])
    };

    SoundProfile {
        kind: SoundKind::Stream,
        layers: vec![flow, babble],
        transients: None,
        modulation: None,
        target_peak: 0.8,
    }
}

fn white() -> SoundProfile {
    SoundProfile {
        kind: SoundKind::White,
        layers: vec![Layer {
            pre_gain: 0.5,
            ..layer(
                NoiseKind::White,
                vec![FilterSpec::lowpass(6000.0), FilterSpec::highshelf(4000.0, -4.0)],
            )
        }],
        transients: None,
        modulation: None,
        target_peak: 0.75,
    }
}

fn thunder() -> SoundProfile {
    SoundProfile {
        kind: SoundKind::Thunder,
        layers: vec![Layer {
            pre_gain: 3.5,
            ..layer(
                NoiseKind::brown(),
                vec![FilterSpec::lowpass(150.0), FilterSpec::lowpass(300.0)],
            )
        }],
        // distant rolls
        transients: Some(TransientLayer {
            rate: 0.15,
            amplitude: (0.5, 1.0),
            decay: (1.5, 3.0),
            shape: 0.35,
            timbre: Timbre::Noise,
            filters: vec![FilterSpec::lowpass(200.0)],
            level: 0.6,
        }),
        modulation: Some(Modulation::new(
            0.6,
            vec![SineTerm::new(0.05, 0.2, 0.0), SineTerm::new(0.11, 0.15, 1.9)],
        )),
        target_peak: 0.8,
    }
}

fn wind() -> SoundProfile {
    SoundProfile {
        kind: SoundKind::Wind,
        layers: vec![layer(
            NoiseKind::Pink,
            vec![FilterSpec::bandpass(500.0, 0.5), FilterSpec::lowpass(1500.0)],
        )],
        transients: None,
        // gusts
        modulation: Some(Modulation::new(
            0.55,
            vec![
                SineTerm::new(0.08, 0.25, 0.0),
                SineTerm::new(0.19, 0.12, 0.8),
                SineTerm::new(0.43, 0.06, 2.5),
            ],
        )),
        target_peak: 0.8,
    }
}

fn night() -> SoundProfile {
    SoundProfile {
        kind: SoundKind::Night,
        layers: vec![layer(
            NoiseKind::Pink,
            vec![FilterSpec::lowpass(400.0), FilterSpec::highshelf(1000.0, -12.0)],
        )],
        // crickets
        transients: Some(TransientLayer {
            rate: 3.0,
            amplitude: (0.1, 0.3),
            decay: (0.02, 0.06),
            shape: 0.4,
            timbre: Timbre::Tone {
                min_hz: 4000.0,
                max_hz: 5000.0,
            },
            filters: vec![FilterSpec::bandpass(4500.0, 2.0)],
            level: 0.25,
        }),
        modulation: Some(Modulation::new(0.8, vec![SineTerm::new(0.1, 0.1, 0.0)])),
        target_peak: 0.7,
    }
}
