//! Audio analysis: decoding via FFmpeg and silence-based speech
//! window detection.

mod ffmpeg;
mod silence;

pub use ffmpeg::{decode_audio, probe_audio, AudioProbe};
pub use silence::find_speech_window;

use thiserror::Error;

/// Errors from audio probing and decoding.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input file does not exist.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// FFmpeg/ffprobe could not be run or exited with an error.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// Decoding produced no usable samples.
    #[error("Audio extraction failed: {0}")]
    ExtractionError(String),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
