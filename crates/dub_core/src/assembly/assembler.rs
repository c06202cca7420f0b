//! Reassembly of intro, stretched speech and outro into one track.

use thiserror::Error;

use crate::models::AudioTrack;

use super::stretch::stretch;

/// Errors from track assembly.
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// The translated speech segment is empty while the original had
    /// non-trivial intro/outro material around its speech window.
    #[error("Translated speech segment is empty")]
    EmptySpeech,

    /// Segments disagree on sample rate or channel layout.
    #[error("Segment format mismatch: {0}")]
    FormatMismatch(String),
}

/// Assemble the dubbed audio track.
///
/// The translated speech is stretched by `stretch_factor` (playback
/// rate), then the segments are concatenated as
/// `intro ++ stretched speech ++ outro`. A linear crossfade of
/// `crossfade_ms` is applied at both splice points to avoid clicks;
/// pass 0 to splice hard. The output format is the intro/outro format
/// (both derive from the same original track).
pub fn assemble(
    intro: &AudioTrack,
    speech: &AudioTrack,
    outro: &AudioTrack,
    stretch_factor: f64,
    crossfade_ms: u64,
) -> Result<AudioTrack, AssemblyError> {
    if speech.is_empty() && (!intro.is_empty() || !outro.is_empty()) {
        return Err(AssemblyError::EmptySpeech);
    }

    let reference = [intro, speech, outro]
        .into_iter()
        .find(|t| !t.is_empty());
    let Some(reference) = reference else {
        // Everything empty: nothing to assemble, but not an error.
        return Ok(AudioTrack::empty(intro.sample_rate.max(1), intro.channels));
    };

    for (name, segment) in [("intro", intro), ("speech", speech), ("outro", outro)] {
        if !segment.is_empty() && !segment.same_format(reference) {
            return Err(AssemblyError::FormatMismatch(format!(
                "{} is {} Hz/{} ch, expected {} Hz/{} ch",
                name,
                segment.sample_rate,
                segment.channels,
                reference.sample_rate,
                reference.channels
            )));
        }
    }

    let stretched = stretch(speech, stretch_factor);
    let crossfade_frames =
        (reference.sample_rate as u64 * crossfade_ms / 1000) as usize;

    let channels = reference.channels as usize;
    let mut samples = intro.samples.clone();
    append_with_crossfade(&mut samples, &stretched.samples, crossfade_frames, channels);
    append_with_crossfade(&mut samples, &outro.samples, crossfade_frames, channels);

    Ok(AudioTrack::new(
        samples,
        reference.sample_rate,
        reference.channels,
    ))
}

/// Append `next` to `out`, overlapping `crossfade_frames` frames with a
/// linear equal-gain ramp. The crossfade is capped at half of either
/// side so short segments still splice cleanly.
fn append_with_crossfade(
    out: &mut Vec<f32>,
    next: &[f32],
    crossfade_frames: usize,
    channels: usize,
) {
    if next.is_empty() {
        return;
    }
    if out.is_empty() || crossfade_frames == 0 {
        out.extend_from_slice(next);
        return;
    }

    let out_frames = out.len() / channels;
    let next_frames = next.len() / channels;
    let fade = crossfade_frames.min(out_frames / 2).min(next_frames / 2);
    if fade == 0 {
        out.extend_from_slice(next);
        return;
    }

    let overlap_start = (out_frames - fade) * channels;
    for k in 0..fade {
        let w = (k as f32 + 0.5) / fade as f32;
        for ch in 0..channels {
            let tail = &mut out[overlap_start + k * channels + ch];
            *tail = *tail * (1.0 - w) + next[k * channels + ch] * w;
        }
    }
    out.extend_from_slice(&next[fade * channels..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(amp: f32, frames: usize, rate: u32, channels: u16) -> AudioTrack {
        AudioTrack::new(vec![amp; frames * channels as usize], rate, channels)
    }

    #[test]
    fn hard_splice_duration_is_exact_sum() {
        let intro = tone(0.1, 1_000, 1_000, 1);
        let speech = tone(0.5, 4_000, 1_000, 1);
        let outro = tone(0.2, 500, 1_000, 1);

        let out = assemble(&intro, &speech, &outro, 1.0, 0).unwrap();
        assert_eq!(out.frames(), 1_000 + 4_000 + 500);
        assert_eq!(out.duration_ms(), 5_500);
    }

    #[test]
    fn stretch_factor_shortens_speech_portion() {
        let intro = tone(0.1, 1_000, 1_000, 1);
        let speech = tone(0.5, 4_000, 1_000, 1);
        let outro = tone(0.2, 1_000, 1_000, 1);

        // Factor 1.25: speech shrinks to 4000 / 1.25 = 3200 frames
        let out = assemble(&intro, &speech, &outro, 1.25, 0).unwrap();
        assert_eq!(out.frames(), 1_000 + 3_200 + 1_000);
    }

    #[test]
    fn crossfade_shortens_output_by_two_overlaps() {
        let intro = tone(0.1, 1_000, 1_000, 1);
        let speech = tone(0.5, 4_000, 1_000, 1);
        let outro = tone(0.2, 1_000, 1_000, 1);

        // 30 ms at 1 kHz = 30 frames per splice point
        let out = assemble(&intro, &speech, &outro, 1.0, 30).unwrap();
        assert_eq!(out.frames(), 6_000 - 2 * 30);
    }

    #[test]
    fn crossfade_ramps_between_levels() {
        let intro = tone(1.0, 100, 1_000, 1);
        let speech = tone(0.0, 100, 1_000, 1);
        let out = assemble(&intro, &speech, &AudioTrack::empty(1_000, 1), 1.0, 20).unwrap();

        // Inside the overlap the level must fall strictly between the
        // two segment levels.
        let mid = out.samples[100 - 10];
        assert!(mid > 0.0 && mid < 1.0, "mid-fade sample was {}", mid);
    }

    #[test]
    fn empty_intro_and_outro_passes_speech_through() {
        let speech = tone(0.5, 2_000, 1_000, 1);
        let empty = AudioTrack::empty(1_000, 1);
        let out = assemble(&empty, &speech, &empty, 1.0, 30).unwrap();
        assert_eq!(out.frames(), 2_000);
    }

    #[test]
    fn empty_speech_with_real_segments_is_an_error() {
        let intro = tone(0.1, 1_000, 1_000, 1);
        let outro = tone(0.2, 1_000, 1_000, 1);
        let speech = AudioTrack::empty(1_000, 1);
        let result = assemble(&intro, &speech, &outro, 1.0, 0);
        assert!(matches!(result, Err(AssemblyError::EmptySpeech)));
    }

    #[test]
    fn all_empty_segments_assemble_to_empty() {
        let empty = AudioTrack::empty(48_000, 2);
        let out = assemble(&empty, &empty, &empty, 1.0, 30).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn format_mismatch_is_rejected() {
        let intro = tone(0.1, 1_000, 48_000, 2);
        let speech = tone(0.5, 1_000, 44_100, 2);
        let outro = tone(0.2, 1_000, 48_000, 2);
        let result = assemble(&intro, &speech, &outro, 1.0, 0);
        assert!(matches!(result, Err(AssemblyError::FormatMismatch(_))));
    }

    #[test]
    fn stereo_assembly_keeps_interleaving() {
        let intro = tone(0.1, 500, 1_000, 2);
        let speech = tone(0.5, 1_000, 1_000, 2);
        let outro = tone(0.2, 500, 1_000, 2);
        let out = assemble(&intro, &speech, &outro, 1.0, 0).unwrap();
        assert_eq!(out.channels, 2);
        assert_eq!(out.frames(), 2_000);
        assert_eq!(out.samples.len(), 4_000);
    }
}
