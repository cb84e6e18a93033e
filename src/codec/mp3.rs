//! MPEG audio frame walking
//!
//! Just enough header parsing to find frame boundaries and their durations.
//! Anything that does not parse as a frame header is stepped over one byte
//! at a time until sync is found again.

/// MPEG version from the header's version bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

/// Layer from the header's layer bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    I,
    II,
    III,
}

// kbps, indexed by the 4-bit bitrate field; 0 (free) and 15 are invalid
const MPEG1_L1: [u32; 15] = [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448];
const MPEG1_L2: [u32; 15] = [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384];
const MPEG1_L3: [u32; 15] = [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
const MPEG2_L1: [u32; 15] = [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256];
const MPEG2_L23: [u32; 15] = [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160];

/// A decoded 4-byte frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: Layer,
    pub bitrate_kbps: u32,
    pub sample_rate: u32,
    pub padding: bool,
}

impl FrameHeader {
    /// Parse a header, or `None` if the bytes are not a valid frame start
    pub fn parse(bytes: [u8; 4]) -> Option<Self> {
        if bytes[0] != 0xFF || bytes[1] & 0xE0 != 0xE0 {
            return None;
        }

        let version = match (bytes[1] >> 3) & 0x03 {
            0 => MpegVersion::Mpeg25,
            2 => MpegVersion::Mpeg2,
            3 => MpegVersion::Mpeg1,
            _ => return None,
        };
        let layer = match (bytes[1] >> 1) & 0x03 {
            1 => Layer::III,
            2 => Layer::II,
            3 => Layer::I,
            _ => return None,
        };

        let bitrate_index = (bytes[2] >> 4) as usize;
        if bitrate_index == 0 || bitrate_index == 15 {
            return None;
        }
        let table = match (version, layer) {
            (MpegVersion::Mpeg1, Layer::I) => &MPEG1_L1,
            (MpegVersion::Mpeg1, Layer::II) => &MPEG1_L2,
            (MpegVersion::Mpeg1, Layer::III) => &MPEG1_L3,
            (_, Layer::I) => &MPEG2_L1,
            (_, _) => &MPEG2_L23,
        };

        let base_rate = match (bytes[2] >> 2) & 0x03 {
            0 => 44_100,
            1 => 48_000,
            2 => 32_000,
            _ => return None,
        };
        let sample_rate = match version {
            MpegVersion::Mpeg1 => base_rate,
            MpegVersion::Mpeg2 => base_rate / 2,
            MpegVersion::Mpeg25 => base_rate / 4,
        };

        Some(Self {
            version,
            layer,
            bitrate_kbps: table[bitrate_index],
            sample_rate,
            padding: (bytes[2] >> 1) & 0x01 == 1,
        })
    }

    pub fn samples_per_frame(&self) -> u32 {
        match (self.layer, self.version) {
            (Layer::I, _) => 384,
            (Layer::II, _) => 1152,
            (Layer::III, MpegVersion::Mpeg1) => 1152,
            (Layer::III, _) => 576,
        }
    }

    /// Frame length in bytes, header included
    pub fn frame_len(&self) -> usize {
        let bitrate = self.bitrate_kbps as usize * 1000;
        let sample_rate = self.sample_rate as usize;
        let padding = self.padding as usize;
        match (self.layer, self.version) {
            (Layer::I, _) => (12 * bitrate / sample_rate + padding) * 4,
            (Layer::III, MpegVersion::Mpeg2 | MpegVersion::Mpeg25) => {
                72 * bitrate / sample_rate + padding
            }
            _ => 144 * bitrate / sample_rate + padding,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples_per_frame() as f64 / self.sample_rate as f64
    }
}

/// Length of a leading ID3v2 tag, or 0
pub fn id3v2_len(bytes: &[u8]) -> usize {
    if bytes.len() < 10 || &bytes[0..3] != b"ID3" {
        return 0;
    }
    // synchsafe: 7 bits per byte
    let size = bytes[6..10]
        .iter()
        .fold(0usize, |acc, &b| (acc << 7) | (b & 0x7F) as usize);
    let footer = if bytes[5] & 0x10 != 0 { 10 } else { 0 };
    (10 + size + footer).min(bytes.len())
}

/// Byte offset at which to cut the stream so it lasts `target_secs`
///
/// Returns the end of the first frame whose cumulative duration reaches the
/// target, or `None` when the stream is not longer than that.
pub fn cut_point(bytes: &[u8], target_secs: f64) -> Option<usize> {
    let mut pos = id3v2_len(bytes);
    let mut elapsed = 0.0;

    while pos + 4 <= bytes.len() {
        let header = [bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]];
        let frame = match FrameHeader::parse(header) {
            Some(frame) if frame.frame_len() >= 4 => frame,
            _ => {
                pos += 1;
                continue;
            }
        };

        pos += frame.frame_len();
        elapsed += frame.duration_secs();
        if elapsed >= target_secs {
            return (pos < bytes.len()).then_some(pos);
        }
    }

    None
}
