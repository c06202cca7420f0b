//! Duration synchronization between original and translated speech.

/// Compute the playback-rate factor that fits translated speech into
/// the original speech window.
///
/// The raw ratio is `translated / original`; applying it as a playback
/// speed to the translated segment brings its length to roughly the
/// original's. The result is clamped to `[min_factor, max_factor]`,
/// trading perfect synchronization for bounded distortion. Either
/// duration being zero yields `1.0` (no stretch).
pub fn compute_stretch_factor(
    original_ms: u64,
    translated_ms: u64,
    min_factor: f64,
    max_factor: f64,
) -> f64 {
    if original_ms == 0 || translated_ms == 0 {
        return 1.0;
    }
    let (lo, hi) = if min_factor <= max_factor {
        (min_factor, max_factor)
    } else {
        (max_factor, min_factor)
    };
    let raw = translated_ms as f64 / original_ms as f64;
    raw.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_durations_need_no_stretch() {
        assert_eq!(compute_stretch_factor(5_000, 5_000, 0.9, 1.1), 1.0);
    }

    #[test]
    fn longer_translation_clamps_to_upper_bound() {
        // Raw 10000/8000 = 1.25, clamped to 1.1
        assert_eq!(compute_stretch_factor(8_000, 10_000, 0.9, 1.1), 1.1);
    }

    #[test]
    fn shorter_translation_clamps_to_lower_bound() {
        assert_eq!(compute_stretch_factor(10_000, 5_000, 0.9, 1.1), 0.9);
    }

    #[test]
    fn in_range_ratio_passes_through() {
        let factor = compute_stretch_factor(10_000, 10_500, 0.9, 1.1);
        assert!((factor - 1.05).abs() < 1e-9);
    }

    #[test]
    fn zero_durations_yield_identity() {
        assert_eq!(compute_stretch_factor(0, 10_000, 0.9, 1.1), 1.0);
        assert_eq!(compute_stretch_factor(10_000, 0, 0.9, 1.1), 1.0);
        assert_eq!(compute_stretch_factor(0, 0, 0.9, 1.1), 1.0);
    }

    #[test]
    fn reversed_bounds_are_normalized() {
        assert_eq!(compute_stretch_factor(8_000, 10_000, 1.1, 0.9), 1.1);
    }

    #[test]
    fn result_always_within_bounds() {
        for (orig, trans) in [(1, 100_000), (100_000, 1), (7_000, 7_001)] {
            let f = compute_stretch_factor(orig, trans, 0.8, 1.2);
            assert!((0.8..=1.2).contains(&f));
        }
    }
}
