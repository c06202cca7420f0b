//! Time-domain playback-rate stretching.

use crate::models::AudioTrack;

/// Apply a playback-rate change to a track.
///
/// A factor above 1.0 speeds playback up (shorter output), below 1.0
/// slows it down; output length is `frames / factor`. The transform is
/// a per-channel linear-interpolation resample, which shifts pitch
/// along with tempo - acceptable for the bounded factors the sync
/// configuration allows.
pub fn stretch(track: &AudioTrack, factor: f64) -> AudioTrack {
    if track.is_empty() || !factor.is_finite() || factor <= 0.0 {
        return track.clone();
    }
    if (factor - 1.0).abs() < 1e-9 {
        return track.clone();
    }

    let channels = track.channels as usize;
    let in_frames = track.frames();
    let out_frames = ((in_frames as f64) / factor).round().max(1.0) as usize;

    let mut samples = Vec::with_capacity(out_frames * channels);
    for out_idx in 0..out_frames {
        let pos = out_idx as f64 * factor;
        let base = (pos.floor() as usize).min(in_frames - 1);
        let next = (base + 1).min(in_frames - 1);
        let frac = (pos - base as f64) as f32;

        for ch in 0..channels {
            let a = track.samples[base * channels + ch];
            let b = track.samples[next * channels + ch];
            samples.push(a + (b - a) * frac);
        }
    }

    AudioTrack::new(samples, track.sample_rate, track.channels)
}
