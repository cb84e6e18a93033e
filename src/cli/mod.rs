//! CLI interface for soundbed

use clap::{Parser, Subcommand};
use soundbed::SoundKind;
use std::path::PathBuf;

/// Procedural ambient sound beds
#[derive(Parser)]
#[command(name = "soundbed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the looping sound assets to WAV files
    Render {
        /// Configuration file path
        #[arg(short, long, default_value = "soundbed.yaml")]
        config: PathBuf,

        /// Output directory (overrides the config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// RNG seed for a reproducible render
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Trim WAV and MP3 files in place to a target duration
    Trim {
        /// Configuration file path
        #[arg(short, long, default_value = "soundbed.yaml")]
        config: PathBuf,

        /// Directory to trim (defaults to the render output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Target duration in seconds
        #[arg(short, long)]
        seconds: Option<f64>,
    },

    /// Play a live mix on the default output device
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "soundbed.yaml")]
        config: PathBuf,

        /// Track volume, e.g. rain=60 (repeatable)
        #[arg(short, long = "volume", value_parser = parse_volume)]
        volumes: Vec<(SoundKind, u8)>,

        /// Stop after this many seconds (default: until Ctrl-C)
        #[arg(short, long)]
        duration: Option<f64>,
    },

    /// Record a live mix to a float WAV without a device
    Bounce {
        /// Configuration file path
        #[arg(short, long, default_value = "soundbed.yaml")]
        config: PathBuf,

        /// Track volume, e.g. rain=60 (repeatable)
        #[arg(short, long = "volume", value_parser = parse_volume)]
        volumes: Vec<(SoundKind, u8)>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "30")]
        duration: f64,

        /// RNG seed for the voice buffers
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the available sounds
    Tracks,

    /// List available output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "soundbed.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

/// Parse `kind=volume`
fn parse_volume(s: &str) -> Result<(SoundKind, u8), String> {
    let (kind, volume) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <sound>=<volume>, got '{}'", s))?;
    let kind: SoundKind = kind.parse()?;
    let volume: u8 = volume
        .trim()
        .parse()
        .map_err(|_| format!("volume must be 0-100, got '{}'", volume))?;
    if volume > 100 {
        return Err(format!("volume must be 0-100, got {}", volume));
    }
    Ok((kind, volume))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_volume() {
        assert_eq!(parse_volume("rain=60"), Ok((SoundKind::Rain, 60)));
        assert_eq!(parse_volume("Thunder= 0"), Ok((SoundKind::Thunder, 0)));
        assert!(parse_volume("rain").is_err());
        assert!(parse_volume("rain=101").is_err());
        assert!(parse_volume("drums=5").is_err());
    }

    #[test]
    fn test_repeated_volume_flags() {
        let cli = Cli::try_parse_from([
            "soundbed", "play", "--volume", "rain=60", "-v", "fire=20", "--duration", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Play { volumes, duration, .. } => {
                assert_eq!(volumes, vec![(SoundKind::Rain, 60), (SoundKind::Fire, 20)]);
                assert_eq!(duration, Some(5.0));
            }
            _ => panic!("expected play"),
        }
    }
}
