//! Audio cue asset loading.
//!
//! The cue is a PCM-in-container file consumed as "header of N bytes,
//! then raw interleaved little-endian i16 samples". Container parsing
//! beyond stripping the header is deliberately out of scope; the header
//! size, sample rate, and channel count are configuration.
//!
//! The buffer is loaded once at startup and read-only afterwards, so the
//! playback path can borrow it concurrently without locking.

use std::fs;
use std::path::Path;

use crate::error::{ResourceError, Result};

/// Decoded cue samples plus frame accounting. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackBuffer {
    samples: Vec<i16>,
    channels: u16,
}

impl PlaybackBuffer {
    /// Read the asset, validate its length against the header size, strip
    /// the header, and decode the remainder as interleaved LE i16.
    ///
    /// Fails with `ResourceUnavailable` if the file cannot be opened or is
    /// not strictly longer than the header. An odd trailing byte is
    /// discarded.
    pub fn load(path: &Path, header_bytes: usize, channels: u16) -> Result<Self> {
        let raw = fs::read(path)
            .map_err(|_| ResourceError::NotFound(path.display().to_string()))?;

        if raw.len() <= header_bytes {
            return Err(ResourceError::Truncated {
                path: path.display().to_string(),
                len: raw.len(),
                min: header_bytes,
            }
            .into());
        }

        let body = &raw[header_bytes..];
        let samples: Vec<i16> = body
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self { samples, channels })
    }

    /// Build directly from samples (test and simulation use).
    pub fn from_samples(samples: Vec<i16>, channels: u16) -> Self {
        Self { samples, channels }
    }

    /// The interleaved sample data.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Total frames in the buffer (samples / channels).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Frames to write for one play, honoring an explicit configured cap.
    /// The cap is a tunable, not a hard-coded divisor.
    pub fn frames_to_play(&self, limit: Option<usize>) -> usize {
        match limit {
            Some(n) => n.min(self.frames()),
            None => self.frames(),
        }
    }

    /// The sample slice covering `frames_to_play(limit)` frames.
    pub fn play_slice(&self, limit: Option<usize>) -> &[i16] {
        let n = self.frames_to_play(limit) * self.channels as usize;
        &self.samples[..n]
    }
}
