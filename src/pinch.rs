// Pinch detection from the thumb-tip / index-tip distance.
// The distance is measured in normalized [0,1] image coordinates, so the same
// threshold works at any camera resolution.

/// Thumb and index tips closer than this (normalized units) count as a pinch.
pub const PINCH_THRESHOLD: f32 = 0.05;

/// Plain threshold test with no memory of the previous frame.
#[inline]
pub fn is_pinching(distance: f32) -> bool {
    distance <= PINCH_THRESHOLD
}

/// Threshold classifier with an optional hysteresis band.
///
/// A hand that is not pinching engages at `distance <= engage`; a hand that is
/// already pinching stays pinched while `distance <= release`. With
/// `engage == release` this is exactly [`is_pinching`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchClassifier {
    pub engage: f32,
    pub release: f32,
}

impl PinchClassifier {
    /// `release` is raised to `engage` if it was given below it.
    pub fn new(engage: f32, release: f32) -> Self {
        Self { engage, release: release.max(engage) }
    }

    pub fn classify(&self, distance: f32, was_pinching: bool) -> bool {
        if was_pinching {
            distance <= self.release
        } else {
            distance <= self.engage
        }
    }
}

impl Default for PinchClassifier {
    fn default() -> Self {
        Self::new(PINCH_THRESHOLD, PINCH_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_pinching(0.0));
        assert!(is_pinching(0.02));
        assert!(is_pinching(0.05));
        assert!(!is_pinching(0.050_001));
        assert!(!is_pinching(0.2));
    }

    #[test]
    fn test_default_classifier_matches_plain_threshold() {
        let c = PinchClassifier::default();
        for d in [0.0, 0.03, 0.05, 0.0500_1, 0.07, 0.5] {
            assert_eq!(c.classify(d, false), is_pinching(d), "d = {d}");
            assert_eq!(c.classify(d, true), is_pinching(d), "d = {d}");
        }
    }

    #[test]
    fn test_hysteresis_band() {
        let c = PinchClassifier::new(0.05, 0.08);
        // Not yet pinching: needs the tighter threshold.
        assert!(!c.classify(0.06, false));
        assert!(c.classify(0.05, false));
        // Already pinching: holds through the band, lets go above it.
        assert!(c.classify(0.06, true));
        assert!(c.classify(0.08, true));
        assert!(!c.classify(0.081, true));
    }

    #[test]
    fn test_release_below_engage_is_clamped() {
        let c = PinchClassifier::new(0.05, 0.01);
        assert_eq!(c.release, 0.05);
    }
}
