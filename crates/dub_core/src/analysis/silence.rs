//! Silence-based speech window detection.
//!
//! Finds the interval of a track that contains spoken content by
//! scanning short-time loudness against a threshold relative to the
//! track's overall level. Detection is deterministic and never fails:
//! a track with no detectable speech yields the whole-track window.

use crate::models::{AudioTrack, SpeechWindow};

/// Short-time analysis frame length.
const FRAME_MS: u64 = 10;

/// Loudness floor in dBFS for digital silence.
const SILENCE_FLOOR_DB: f64 = -120.0;

/// Locate the speech window of a track.
///
/// Loudness is measured as per-frame RMS (10 ms frames, mono mixdown)
/// in dBFS. A frame is non-silent when it is louder than the track's
/// overall dBFS minus `threshold_offset_db`. Silent gaps shorter than
/// `min_silence_ms` do not split a run of speech, and runs shorter
/// than `min_speech_run_ms` are treated as stray noise. The window
/// spans the start of the first qualifying run to the end of the last.
///
/// If no qualifying run exists the whole track is returned, so
/// segmentation can never fail a job.
pub fn find_speech_window(
    track: &AudioTrack,
    min_silence_ms: u64,
    min_speech_run_ms: u64,
    threshold_offset_db: f64,
) -> SpeechWindow {
    let duration = track.duration_ms();
    if track.is_empty() {
        return SpeechWindow::new(0, duration);
    }

    let frame_db = frame_loudness(track);
    let overall_db = dbfs(overall_rms(track));
    let threshold = overall_db - threshold_offset_db;

    let nonsilent: Vec<bool> = frame_db.iter().map(|&db| db > threshold).collect();
    let runs = merge_runs(&nonsilent, min_silence_ms / FRAME_MS);

    let min_run_frames = (min_speech_run_ms / FRAME_MS).max(1) as usize;
    let mut qualifying = runs
        .iter()
        .filter(|(start, end)| end - start >= min_run_frames);

    let first = qualifying.next();
    let last = qualifying.last().or(first);

    match (first, last) {
        (Some(&(first_start, _)), Some(&(_, last_end))) => {
            let start_ms = first_start as u64 * FRAME_MS;
            let end_ms = (last_end as u64 * FRAME_MS).min(duration);
            SpeechWindow::new(start_ms.min(end_ms), end_ms)
        }
        _ => SpeechWindow::new(0, duration),
    }
}

/// Per-frame RMS loudness in dBFS (mono mixdown).
fn frame_loudness(track: &AudioTrack) -> Vec<f64> {
    let frames_per_window = ((track.sample_rate as u64 * FRAME_MS) / 1000).max(1) as usize;
    let total = track.frames();
    let mut out = Vec::with_capacity(total / frames_per_window + 1);

    let mut index = 0;
    while index < total {
        let end = (index + frames_per_window).min(total);
        let mut sum_sq = 0.0f64;
        for frame in index..end {
            let v = track.frame_mean(frame) as f64;
            sum_sq += v * v;
        }
        let rms = (sum_sq / (end - index) as f64).sqrt();
        out.push(dbfs(rms));
        index = end;
    }
    out
}

/// RMS over the whole track's mono mixdown.
fn overall_rms(track: &AudioTrack) -> f64 {
    let total = track.frames();
    if total == 0 {
        return 0.0;
    }
    let mut sum_sq = 0.0f64;
    for frame in 0..total {
        let v = track.frame_mean(frame) as f64;
        sum_sq += v * v;
    }
    (sum_sq / total as f64).sqrt()
}

/// Convert an RMS amplitude to dBFS, with a floor for digital silence.
fn dbfs(rms: f64) -> f64 {
    if rms <= 0.0 {
        SILENCE_FLOOR_DB
    } else {
        (20.0 * rms.log10()).max(SILENCE_FLOOR_DB)
    }
}

/// Merge non-silent frames into runs, bridging silent gaps shorter
/// than `max_gap_frames`. Returns half-open frame ranges.
fn merge_runs(nonsilent: &[bool], max_gap_frames: u64) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();

    for (i, &active) in nonsilent.iter().enumerate() {
        if !active {
            continue;
        }
        match runs.last_mut() {
            Some((_, end)) if i.saturating_sub(*end) < max_gap_frames.max(1) as usize => {
                *end = i + 1;
            }
            _ => runs.push((i, i + 1)),
        }
    }
    runs
}
