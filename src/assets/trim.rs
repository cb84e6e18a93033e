//! In-place trimming
//!
//! Shortens rendered assets to a target duration without re-encoding: WAV
//! data is truncated and the two size fields patched, MP3 streams are cut
//! on a frame boundary.

use crate::codec::wav::{WavHeader, DATA_LEN_OFFSET, HEADER_LEN, RIFF_LEN_OFFSET};
use crate::codec::{cut_point, WavError};
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What happened to one file
#[derive(Debug, Clone, PartialEq)]
pub enum TrimOutcome {
    Trimmed { from_bytes: u64, to_bytes: u64 },
    /// Already at or under the target
    Unchanged,
    /// Not something we can safely trim
    Skipped(String),
}

/// Trim every `.wav` and `.mp3` directly inside `dir`
pub fn trim_dir(dir: &Path, target_secs: f64) -> Result<Vec<(PathBuf, TrimOutcome)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {:?}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && extension(path).is_some())
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let outcome = trim_file(&path, target_secs)?;
            Ok((path, outcome))
        })
        .collect()
}

/// Trim a single file to `target_secs`
pub fn trim_file(path: &Path, target_secs: f64) -> Result<TrimOutcome> {
    match extension(path) {
        Some(Format::Wav) => trim_wav(path, target_secs),
        Some(Format::Mp3) => trim_mp3(path, target_secs),
        None => Ok(TrimOutcome::Skipped("unsupported extension".to_string())),
    }
}

enum Format {
    Wav,
    Mp3,
}

fn extension(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "wav" => Some(Format::Wav),
        "mp3" => Some(Format::Mp3),
        _ => None,
    }
}

fn trim_wav(path: &Path, target_secs: f64) -> Result<TrimOutcome> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {:?}", path))?;
    let header = match WavHeader::parse(&bytes) {
        Ok(header) => header,
        Err(WavError::Io(e)) => {
            return Err(e).with_context(|| format!("failed to parse {:?}", path));
        }
        Err(e) => {
            warn!("skipping {:?}: {}", path, e);
            return Ok(TrimOutcome::Skipped(e.to_string()));
        }
    };

    let frames = (header.sample_rate as f64 * target_secs).round() as u64;
    let keep = frames * header.block_align() as u64;
    let present = (bytes.len() - HEADER_LEN) as u64;
    let data_len = present.min(header.data_len as u64);
    if data_len <= keep {
        return Ok(TrimOutcome::Unchanged);
    }

    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open {:?} for writing", path))?;
    let trimmed = WavHeader {
        data_len: keep as u32,
        ..header
    };
    file.set_len(HEADER_LEN as u64 + keep)?;
    file.seek(SeekFrom::Start(RIFF_LEN_OFFSET))?;
    file.write_all(&trimmed.riff_len().to_le_bytes())?;
    file.seek(SeekFrom::Start(DATA_LEN_OFFSET))?;
    file.write_all(&trimmed.data_len.to_le_bytes())?;
    file.flush()?;

    let to_bytes = HEADER_LEN as u64 + keep;
    info!("trimmed {:?} to {:.1}s ({} bytes)", path, target_secs, to_bytes);
    Ok(TrimOutcome::Trimmed {
        from_bytes: bytes.len() as u64,
        to_bytes,
    })
}

fn trim_mp3(path: &Path, target_secs: f64) -> Result<TrimOutcome> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {:?}", path))?;
    let Some(cut) = cut_point(&bytes, target_secs) else {
        return Ok(TrimOutcome::Unchanged);
    };

    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open {:?} for writing", path))?;
    file.set_len(cut as u64)?;

    info!("trimmed {:?} to {:.1}s ({} bytes)", path, target_secs, cut);
    Ok(TrimOutcome::Trimmed {
        from_bytes: bytes.len() as u64,
        to_bytes: cut as u64,
    })
}
