//! FFmpeg audio probing and decoding.
//!
//! Decodes the audio stream of a media file to raw interleaved f32
//! samples piped over stdout, preserving (or forcing) sample rate and
//! channel layout.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::models::AudioTrack;

use super::{AnalysisError, AnalysisResult};

/// Audio stream parameters reported by ffprobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioProbe {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Probe the first audio stream of a media file.
pub fn probe_audio(input_path: &Path) -> AnalysisResult<AudioProbe> {
    if !input_path.exists() {
        return Err(AnalysisError::SourceNotFound(
            input_path.display().to_string(),
        ));
    }

    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("a:0")
        .arg("-show_entries")
        .arg("stream=sample_rate,channels")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(input_path)
        .output()
        .map_err(|e| AnalysisError::FfmpegError(format!("Failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        return Err(AnalysisError::FfmpegError(format!(
            "ffprobe failed to probe audio stream of {}",
            input_path.display()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let mut lines = text.lines();
    let sample_rate = lines
        .next()
        .and_then(|l| l.trim().parse::<u32>().ok())
        .ok_or_else(|| {
            AnalysisError::FfmpegError(format!(
                "No audio stream found in {}",
                input_path.display()
            ))
        })?;
    let channels = lines
        .next()
        .and_then(|l| l.trim().parse::<u16>().ok())
        .unwrap_or(1);

    Ok(AudioProbe {
        sample_rate,
        channels: channels.max(1),
    })
}

/// Decode the audio stream of a media file to an in-memory track.
///
/// When `sample_rate`/`channels` are `None` the source stream's own
/// parameters (from ffprobe) are kept; passing targets resamples and
/// remixes, which is how synthesized speech is conformed to the
/// original track's format.
pub fn decode_audio(
    input_path: &Path,
    sample_rate: Option<u32>,
    channels: Option<u16>,
) -> AnalysisResult<AudioTrack> {
    if !input_path.exists() {
        return Err(AnalysisError::SourceNotFound(
            input_path.display().to_string(),
        ));
    }

    let (rate, ch) = match (sample_rate, channels) {
        (Some(r), Some(c)) => (r, c),
        _ => {
            let probe = probe_audio(input_path)?;
            (
                sample_rate.unwrap_or(probe.sample_rate),
                channels.unwrap_or(probe.channels),
            )
        }
    };

    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-i")
        .arg(input_path)
        .arg("-vn") // No video
        .arg("-ac")
        .arg(ch.to_string())
        .arg("-ar")
        .arg(rate.to_string())
        .arg("-f")
        .arg("f32le") // 32-bit float, little endian
        .arg("-acodec")
        .arg("pcm_f32le")
        .arg("pipe:1"); // Raw samples to stdout

    cmd.stderr(Stdio::null()).stdout(Stdio::piped());

    tracing::debug!("Running FFmpeg: {:?}", cmd);

    let mut child = cmd
        .spawn()
        .map_err(|e| AnalysisError::FfmpegError(format!("Failed to spawn FFmpeg: {}", e)))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| AnalysisError::FfmpegError("Failed to capture FFmpeg stdout".to_string()))?;

    let mut buffer = Vec::new();
    stdout
        .read_to_end(&mut buffer)
        .map_err(|e| AnalysisError::FfmpegError(format!("Failed to read FFmpeg output: {}", e)))?;

    let status = child
        .wait()
        .map_err(|e| AnalysisError::FfmpegError(format!("FFmpeg process error: {}", e)))?;

    if !status.success() {
        return Err(AnalysisError::FfmpegError(format!(
            "FFmpeg exited with code: {:?}",
            status.code()
        )));
    }

    let samples = bytes_to_f32_samples(&buffer);
    if samples.is_empty() {
        return Err(AnalysisError::ExtractionError(format!(
            "No audio samples decoded from {}",
            input_path.display()
        )));
    }

    let track = AudioTrack::new(samples, rate, ch);
    tracing::debug!(
        "Decoded {} frames ({} ms) from {}",
        track.frames(),
        track.duration_ms(),
        input_path.display()
    );

    Ok(track)
}

/// Convert raw little-endian bytes to f32 samples.
fn bytes_to_f32_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let arr: [u8; 4] = chunk.try_into().unwrap();
            f32::from_le_bytes(arr)
        })
        .collect()
}
