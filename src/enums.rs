//! Domain enums decoded from strings and integers reported by the engine.
//!
//! Unknown values are errors, never silently mapped to a default.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Video chroma (four character code) accepted by the rendering callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChromaType {
    I420,
    NV12,
    RGBA,
    RV15,
    RV16,
    RV24,
    RV32,
    UYVY,
    YUY2,
    YV12,
}

impl ChromaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChromaType::I420 => "I420",
            ChromaType::NV12 => "NV12",
            ChromaType::RGBA => "RGBA",
            ChromaType::RV15 => "RV15",
            ChromaType::RV16 => "RV16",
            ChromaType::RV24 => "RV24",
            ChromaType::RV32 => "RV32",
            ChromaType::UYVY => "UYVY",
            ChromaType::YUY2 => "YUY2",
            ChromaType::YV12 => "YV12",
        }
    }

    /// The four character code as passed over the C boundary.
    pub fn fourcc(&self) -> [u8; 4] {
        let mut code = [0u8; 4];
        code.copy_from_slice(self.as_str().as_bytes());
        code
    }

    /// Number of picture planes this chroma uses.
    pub fn plane_count(&self) -> usize {
        match self {
            ChromaType::I420 | ChromaType::YV12 => 3,
            ChromaType::NV12 => 2,
            _ => 1,
        }
    }

    /// Pitch (bytes per row) and line count of each plane for a picture of
    /// `width` x `height` pixels.
    pub fn plane_layout(&self, width: u32, height: u32) -> Vec<(u32, u32)> {
        let half_w = width.div_ceil(2);
        let half_h = height.div_ceil(2);
        match self {
            ChromaType::I420 | ChromaType::YV12 => {
                vec![(width, height), (half_w, half_h), (half_w, half_h)]
            }
            ChromaType::NV12 => vec![(width, height), (width, half_h)],
            ChromaType::RV15 | ChromaType::RV16 | ChromaType::UYVY | ChromaType::YUY2 => {
                vec![(width * 2, height)]
            }
            ChromaType::RV24 => vec![(width * 3, height)],
            ChromaType::RV32 | ChromaType::RGBA => vec![(width * 4, height)],
        }
    }
}

impl FromStr for ChromaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I420" => Ok(ChromaType::I420),
            "NV12" => Ok(ChromaType::NV12),
            "RGBA" => Ok(ChromaType::RGBA),
            "RV15" => Ok(ChromaType::RV15),
            "RV16" => Ok(ChromaType::RV16),
            "RV24" => Ok(ChromaType::RV24),
            "RV32" => Ok(ChromaType::RV32),
            "UYVY" => Ok(ChromaType::UYVY),
            "YUY2" => Ok(ChromaType::YUY2),
            "YV12" => Ok(ChromaType::YV12),
            other => Err(Error::unsupported("chroma type", other)),
        }
    }
}

impl fmt::Display for ChromaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio sample format accepted by the audio callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundType {
    /// Signed 16-bit, native endianness.
    S16N,
}

impl SoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundType::S16N => "S16N",
        }
    }

    pub fn fourcc(&self) -> [u8; 4] {
        let mut code = [0u8; 4];
        code.copy_from_slice(self.as_str().as_bytes());
        code
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SoundType::S16N => 2,
        }
    }
}

impl FromStr for SoundType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S16N" => Ok(SoundType::S16N),
            other => Err(Error::unsupported("sound type", other)),
        }
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playback state of a media item (`libvlc_state_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MediaState {
    NothingSpecial,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
}

impl TryFrom<i32> for MediaState {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Error> {
        match value {
            0 => Ok(MediaState::NothingSpecial),
            1 => Ok(MediaState::Opening),
            2 => Ok(MediaState::Buffering),
            3 => Ok(MediaState::Playing),
            4 => Ok(MediaState::Paused),
            5 => Ok(MediaState::Stopped),
            6 => Ok(MediaState::Ended),
            7 => Ok(MediaState::Error),
            other => Err(Error::unsupported("media state", other.to_string())),
        }
    }
}

/// Decode a four character code written by the engine into a string.
///
/// Stops at the first NUL so shorter codes round-trip.
pub(crate) fn fourcc_str(code: &[u8; 4]) -> String {
    let end = code.iter().position(|&b| b == 0).unwrap_or(code.len());
    String::from_utf8_lossy(&code[..end]).into_owned()
}
