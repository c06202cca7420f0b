//! Decoded audio structures shared by analysis, assembly and remux.

use serde::{Deserialize, Serialize};

/// Decoded audio: interleaved `f32` sample frames plus format metadata.
///
/// Tracks are immutable once produced - every operation derives a new
/// track rather than mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    /// Interleaved samples (frame-major, `channels` samples per frame).
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count (1 = mono, 2 = stereo, ...).
    pub channels: u16,
}

impl AudioTrack {
    /// Create a track from interleaved samples.
    ///
    /// A trailing partial frame (samples not divisible by the channel
    /// count) is dropped.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let ch = channels.max(1) as usize;
        samples.truncate((samples.len() / ch) * ch);
        Self {
            samples,
            sample_rate,
            channels: channels.max(1),
        }
    }

    /// Create an empty track with the given format.
    pub fn empty(sample_rate: u32, channels: u16) -> Self {
        Self::new(Vec::new(), sample_rate, channels)
    }

    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Check if the track holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Track duration in milliseconds (rounded).
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frames() as f64 * 1000.0 / self.sample_rate as f64).round() as u64
    }

    /// Whether another track has the same sample rate and channel layout.
    pub fn same_format(&self, other: &AudioTrack) -> bool {
        self.sample_rate == other.sample_rate && self.channels == other.channels
    }

    /// Mean of one interleaved frame (mono mixdown of frame `index`).
    pub fn frame_mean(&self, index: usize) -> f32 {
        let ch = self.channels as usize;
        let start = index * ch;
        let frame = &self.samples[start..start + ch];
        frame.iter().sum::<f32>() / ch as f32
    }

    /// Derive a new track covering `[start_ms, end_ms)`.
    ///
    /// Bounds are clamped to the track; a reversed range yields an
    /// empty track.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> AudioTrack {
        let start = self.ms_to_frame(start_ms).min(self.frames());
        let end = self.ms_to_frame(end_ms).min(self.frames());
        let ch = self.channels as usize;
        let samples = if start < end {
            self.samples[start * ch..end * ch].to_vec()
        } else {
            Vec::new()
        };
        AudioTrack::new(samples, self.sample_rate, self.channels)
    }

    fn ms_to_frame(&self, ms: u64) -> usize {
        (ms as f64 * self.sample_rate as f64 / 1000.0).round() as usize
    }
}

/// Time interval judged to contain spoken content, in the time base of
/// the track it was derived from.
///
/// Invariant: `0 <= start_ms <= end_ms <= track duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechWindow {
    /// Offset of the first detected non-silent run.
    pub start_ms: u64,
    /// End of the last detected non-silent run.
    pub end_ms: u64,
}

impl SpeechWindow {
    /// Create a window; `start_ms` must not exceed `end_ms`.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        debug_assert!(start_ms <= end_ms);
        Self { start_ms, end_ms }
    }

    /// Window length in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl std::fmt::Display for SpeechWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} ms, {} ms]", self.start_ms, self.end_ms)
    }
}
