//! Soundbed - procedural ambient sound beds

use anyhow::{bail, Result};
use clap::Parser;
use soundbed::assets::{self, TrimOutcome};
use soundbed::config::{self, SoundbedConfig};
use soundbed::engine::{self, AudioContext, CpalContext, Mixer, VirtualContext};
use soundbed::synth::noise_rng;
use soundbed::SoundKind;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config: config_path,
            output_dir,
            seed,
        } => {
            let mut cfg = config::load_or_default(&config_path)?;
            if let Some(dir) = output_dir {
                cfg.render.output_dir = dir;
            }
            if seed.is_some() {
                cfg.render.seed = seed;
            }

            println!(
                "Rendering {} sounds to {:?} ({:.0}s at {} Hz)...",
                SoundKind::OFFLINE.len(),
                cfg.render.output_dir,
                cfg.render.duration_secs,
                cfg.render.sample_rate
            );
            let rendered = assets::render_all(&cfg.render)?;
            for asset in &rendered {
                println!("  {:<8} {:?} ({} samples)", asset.kind.name(), asset.path, asset.samples);
            }
            println!("Done.");
        }

        Commands::Trim {
            config: config_path,
            dir,
            seconds,
        } => {
            let cfg = config::load_or_default(&config_path)?;
            let dir = dir.unwrap_or(cfg.render.output_dir);
            let seconds = seconds.unwrap_or(cfg.trim.target_secs);
            if !(seconds > 0.0) {
                bail!("Trim target must be positive");
            }

            println!("Trimming audio in {:?} to {:.1}s...", dir, seconds);
            let results = assets::trim_dir(&dir, seconds)?;
            if results.is_empty() {
                println!("No .wav or .mp3 files found.");
            }
            for (path, outcome) in results {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                match outcome {
                    TrimOutcome::Trimmed { from_bytes, to_bytes } => {
                        println!("  {}: {} -> {} bytes", name, from_bytes, to_bytes)
                    }
                    TrimOutcome::Unchanged => println!("  {}: already short enough", name),
                    TrimOutcome::Skipped(reason) => println!("  {}: skipped ({})", name, reason),
                }
            }
        }

        Commands::Play {
            config: config_path,
            volumes,
            duration,
        } => {
            let mut cfg = config::load_or_default(&config_path)?;
            cfg.live.volumes.extend(volumes);
            if cfg.live.volumes.values().all(|&v| v == 0) {
                bail!("Nothing to play: set a volume, e.g. --volume rain=60");
            }

            let context = CpalContext::new()?;
            println!(
                "Playing on {} at {} Hz",
                context.device_name().unwrap_or_else(|| "default device".to_string()),
                context.sample_rate()
            );
            let mut mixer = Mixer::new(context, &cfg.live);
            if !mixer.init() {
                bail!("Could not start audio output");
            }
            print_mix(&cfg);

            let (tx, rx) = mpsc::channel();
            ctrlc::set_handler(move || {
                let _ = tx.send(());
            })?;

            match duration {
                Some(secs) => {
                    println!("Playing for {:.0}s (Ctrl-C to stop early)...", secs);
                    let _ = rx.recv_timeout(Duration::from_secs_f64(secs.max(0.0)));
                }
                None => {
                    println!("Press Ctrl-C to stop.");
                    let _ = rx.recv();
                }
            }

            mixer.shutdown();
            println!("Stopped.");
        }

        Commands::Bounce {
            config: config_path,
            volumes,
            output,
            duration,
            seed,
        } => {
            let mut cfg = config::load_or_default(&config_path)?;
            cfg.live.volumes.extend(volumes);

            let context = VirtualContext::new(cfg.render.sample_rate);
            let seed = seed.or(cfg.render.seed);
            let mut mixer = Mixer::with_rng(context, &cfg.live, noise_rng(seed));
            if !mixer.init() {
                bail!("Could not start the virtual clock");
            }
            print_mix(&cfg);

            println!("Bouncing {:.1}s to {:?}...", duration, output);
            let written = engine::bounce(&mut mixer, &output, duration)?;
            mixer.shutdown();
            println!("Recorded {} samples to {:?}", written, output);
        }

        Commands::Tracks => {
            println!("Available sounds:\n");
            for kind in SoundKind::ALL {
                let mut tags = Vec::new();
                if SoundKind::OFFLINE.contains(&kind) {
                    tags.push("asset");
                }
                if kind.is_premium() {
                    tags.push("premium");
                }
                tags.push("live");
                println!("  {:<8} [{}]", kind.name(), tags.join(", "));
            }
        }

        Commands::Devices => {
            println!("Available audio devices:\n");

            if let Some(name) = engine::default_device_name() {
                println!("Default output: {}\n", name);
            }

            println!("Output devices:");
            let devices = engine::list_output_devices();
            if devices.is_empty() {
                println!("  (none found)");
            }
            for (name, config) in devices {
                println!("  - {} ({} Hz, {} ch)", name, config.sample_rate.0, config.channels);
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Output directory: {:?}", cfg.render.output_dir);
                    println!("  Sample rate: {} Hz", cfg.render.sample_rate);
                    println!(
                        "  Loop: {:.1}s with {:.2}s crossfade",
                        cfg.render.duration_secs, cfg.render.crossfade_secs
                    );
                    match cfg.render.seed {
                        Some(seed) => println!("  Seed: {}", seed),
                        None => println!("  Seed: random"),
                    }
                    println!("  Trim target: {:.1}s", cfg.trim.target_secs);
                    println!(
                        "  Live buffers: {:.1}s, ramp {:.2}s",
                        cfg.live.buffer_secs, cfg.live.ramp_time_constant
                    );
                    print_mix(&cfg);
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../soundbed.example.yaml");

            let path = Path::new("soundbed.yaml");
            if path.exists() {
                println!("soundbed.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created soundbed.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

fn print_mix(cfg: &SoundbedConfig) {
    println!("  Tracks:");
    for (kind, volume) in &cfg.live.volumes {
        println!("    - {:<8} {:>3}%", kind.name(), volume);
    }
    if cfg.live.muted {
        println!("  (muted)");
    }
}
