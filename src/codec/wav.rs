//! Canonical WAV
//!
//! Assets are 16-bit mono PCM written through `hound`, which lays them out
//! as the canonical 44-byte RIFF/WAVE header followed by the samples. The
//! header parser here only exists so trimming can patch sizes in place.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;
use thiserror::Error;

/// Size of a canonical header
pub const HEADER_LEN: usize = 44;

/// Byte offset of the RIFF chunk size
pub const RIFF_LEN_OFFSET: u64 = 4;
/// Byte offset of the `data` chunk size
pub const DATA_LEN_OFFSET: u64 = 40;

const PCM_FORMAT: u16 = 1;
const FLOAT_FORMAT: u16 = 3;

/// Errors reading or writing WAV data
#[derive(Debug, Error)]
pub enum WavError {
    #[error("file is {0} bytes, shorter than a WAV header")]
    TooShort(usize),

    #[error("missing RIFF/WAVE signature")]
    NotRiff,

    #[error("non-canonical layout: {0}")]
    NonCanonical(&'static str),

    #[error("unsupported encoding: format {format}, {bits} bits")]
    Unsupported { format: u16, bits: u16 },

    #[error(transparent)]
    Hound(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Fields of a canonical PCM header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Declared size of the `data` chunk in bytes
    pub data_len: u32,
}

impl WavHeader {
    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Value of the RIFF chunk size field
    pub fn riff_len(&self) -> u32 {
        36 + self.data_len
    }

    /// Declared duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.data_len as f64 / self.byte_rate() as f64
    }

    /// Parse a canonical header from the start of `bytes`
    ///
    /// Only the exact 44-byte layout is accepted: `fmt ` at 12 with a
    /// 16-byte body and `data` at 36. Anything else is rejected rather than
    /// guessed at, since callers patch these offsets in place.
    pub fn parse(bytes: &[u8]) -> Result<Self, WavError> {
        if bytes.len() < HEADER_LEN {
            return Err(WavError::TooShort(bytes.len()));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(WavError::NotRiff);
        }
        if &bytes[12..16] != b"fmt " || read_u32(bytes, 16) != 16 {
            return Err(WavError::NonCanonical("fmt chunk is not 16 bytes at offset 12"));
        }
        if &bytes[36..40] != b"data" {
            return Err(WavError::NonCanonical("data chunk does not follow fmt"));
        }

        let format = read_u16(bytes, 20);
        let bits_per_sample = read_u16(bytes, 34);
        if format != PCM_FORMAT || bits_per_sample == 0 || bits_per_sample % 8 != 0 {
            return Err(WavError::Unsupported {
                format,
                bits: bits_per_sample,
            });
        }

        let header = Self {
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            bits_per_sample,
            data_len: read_u32(bytes, 40),
        };
        if header.channels == 0 || header.sample_rate == 0 {
            return Err(WavError::NonCanonical("zero channels or sample rate"));
        }
        if read_u16(bytes, 32) != header.block_align() {
            return Err(WavError::NonCanonical("block align disagrees with format"));
        }
        Ok(header)
    }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Clamp to [-1, 1] and scale asymmetrically onto i16
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Inverse of [`sample_to_i16`]
pub fn i16_to_sample(value: i16) -> f32 {
    if value < 0 {
        value as f32 / 32768.0
    } else {
        value as f32 / 32767.0
    }
}

fn pcm16_mono(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn write_samples<W: io::Write + io::Seek>(
    mut writer: WavWriter<W>,
    samples: &[f32],
) -> Result<(), WavError> {
    for &sample in samples {
        writer.write_sample(sample_to_i16(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Encode mono samples as a complete 16-bit WAV file in memory
pub fn encode(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, WavError> {
    let mut cursor = Cursor::new(Vec::with_capacity(HEADER_LEN + samples.len() * 2));
    write_samples(WavWriter::new(&mut cursor, pcm16_mono(sample_rate))?, samples)?;
    Ok(cursor.into_inner())
}

/// Decode a 16-bit integer WAV into interleaved samples
///
/// A `data` size larger than the file (an interrupted write) is read up to
/// the end of the file.
pub fn decode(bytes: &[u8]) -> Result<(WavHeader, Vec<f32>), WavError> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        let format = match spec.sample_format {
            SampleFormat::Int => PCM_FORMAT,
            SampleFormat::Float => FLOAT_FORMAT,
        };
        return Err(WavError::Unsupported {
            format,
            bits: spec.bits_per_sample,
        });
    }

    let header = WavHeader {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        data_len: reader.len() * 2,
    };

    let mut samples = Vec::with_capacity(reader.len() as usize);
    for sample in reader.into_samples::<i16>() {
        match sample {
            Ok(value) => samples.push(i16_to_sample(value)),
            Err(hound::Error::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok((header, samples))
}

/// Encode and write a mono file
///
/// The samples go to a sibling temporary file first and are renamed into
/// place, so a failed write never leaves a truncated asset behind.
pub fn write_file(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), WavError> {
    let tmp = path.with_extension("wav.tmp");
    let written = WavWriter::create(&tmp, pcm16_mono(sample_rate))
        .map_err(WavError::from)
        .and_then(|writer| write_samples(writer, samples))
        .and_then(|()| fs::rename(&tmp, path).map_err(WavError::from));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}
