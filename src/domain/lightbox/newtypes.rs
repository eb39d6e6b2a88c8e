// SPDX-License-Identifier: MPL-2.0
//! Lightbox value objects.
//!
//! These types keep the gesture thresholds and zoom bounds in one place so
//! the navigator and its tests agree on the exact boundaries.

// =============================================================================
// Scale Bounds
// =============================================================================

/// Zoom scale bounds and thresholds (1.0 = image fitted to the view).
pub mod scale_bounds {
    /// Smallest scale a pinch or wheel can reach.
    pub const MIN: f32 = 0.5;
    /// Largest scale a pinch or wheel can reach.
    pub const MAX: f32 = 5.0;
    /// Neutral, fitted scale.
    pub const NEUTRAL: f32 = 1.0;
    /// Below this scale a transform is treated as a pinch-to-close gesture.
    pub const CLOSE_BELOW: f32 = 0.65;
    /// Above this scale the image counts as zoomed in.
    pub const ZOOMED_ABOVE: f32 = 1.01;
}

// =============================================================================
// Direction
// =============================================================================

/// Paging direction; drives the slide-in/slide-out animation vector only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    Backward,
    #[default]
    Still,
    Forward,
}

impl Direction {
    /// Signed step (-1, 0, +1).
    #[must_use]
    pub fn delta(self) -> i32 {
        match self {
            Direction::Backward => -1,
            Direction::Still => 0,
            Direction::Forward => 1,
        }
    }

    /// Horizontal sign of the entry offset (+1 enters from the right).
    #[must_use]
    pub fn sign(self) -> f32 {
        self.delta() as f32
    }

    /// Index reached by stepping `self` from `current` in a circular sequence.
    ///
    /// Returns `None` for an empty sequence.
    #[must_use]
    pub fn step(self, current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let current = current % len;
        Some(match self {
            Direction::Forward => (current + 1) % len,
            Direction::Backward if current == 0 => len - 1,
            Direction::Backward => current - 1,
            Direction::Still => current,
        })
    }
}

// =============================================================================
// ZoomScale
// =============================================================================

/// Zoom scale, guaranteed to be within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ZoomScale(f32);

impl ZoomScale {
    /// Creates a new scale, clamping to the valid range.
    #[must_use]
    pub fn new(scale: f32) -> Self {
        if scale.is_nan() {
            return Self::default();
        }
        Self(scale.clamp(scale_bounds::MIN, scale_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - scale_bounds::NEUTRAL).abs() < f32::EPSILON
    }

    /// Whether this scale reads as "zoomed in".
    #[must_use]
    pub fn is_zoomed(self) -> bool {
        self.0 > scale_bounds::ZOOMED_ABOVE
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self(scale_bounds::NEUTRAL)
    }
}

// =============================================================================
// SwipeThreshold
// =============================================================================

/// Swipe score a release must exceed to count as a decisive swipe.
///
/// The value is a UX tuning knob; the richest client variant used 2000, an
/// earlier one 10000.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThreshold(f32);

impl SwipeThreshold {
    pub const DEFAULT: f32 = 2000.0;

    /// Creates a threshold; negative values are taken by magnitude.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.abs())
        } else {
            Self(Self::DEFAULT)
        }
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for SwipeThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Swipe score: release distance times release velocity.
///
/// The sign follows the velocity, so a fast leftward flick scores negative.
#[must_use]
pub fn swipe_power(offset: f32, velocity: f32) -> f32 {
    offset.abs() * velocity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_wraps_to_first() {
        assert_eq!(Direction::Forward.step(2, 3), Some(0));
        assert_eq!(Direction::Forward.step(0, 3), Some(1));
    }

    #[test]
    fn backward_from_zero_wraps_to_last() {
        assert_eq!(Direction::Backward.step(0, 5), Some(4));
        assert_eq!(Direction::Backward.step(3, 5), Some(2));
    }

    #[test]
    fn step_on_empty_sequence_is_none() {
        assert_eq!(Direction::Forward.step(0, 0), None);
        assert_eq!(Direction::Backward.step(0, 0), None);
    }

    #[test]
    fn forward_n_times_returns_to_start() {
        for len in 1..8 {
            for start in 0..len {
                let mut index = start;
                for _ in 0..len {
                    index = Direction::Forward.step(index, len).unwrap();
                }
                assert_eq!(index, start, "len={len} start={start}");
            }
        }
    }

    #[test]
    fn direction_sign_matches_delta() {
        assert_eq!(Direction::Backward.sign(), -1.0);
        assert_eq!(Direction::Still.sign(), 0.0);
        assert_eq!(Direction::Forward.sign(), 1.0);
    }

    #[test]
    fn zoom_scale_clamps_and_classifies() {
        assert_eq!(ZoomScale::new(12.0).value(), scale_bounds::MAX);
        assert_eq!(ZoomScale::new(0.1).value(), scale_bounds::MIN);
        assert_eq!(ZoomScale::new(f32::NAN), ZoomScale::default());
        assert!(ZoomScale::new(1.5).is_zoomed());
        assert!(!ZoomScale::new(1.01).is_zoomed());
        assert!(ZoomScale::default().is_neutral());
    }

    #[test]
    fn swipe_power_sign_follows_velocity() {
        assert_eq!(swipe_power(-150.0, 20.0), 3000.0);
        assert_eq!(swipe_power(150.0, -20.0), -3000.0);
    }

    #[test]
    fn threshold_is_positive() {
        assert_eq!(SwipeThreshold::new(-500.0).value(), 500.0);
        assert_eq!(SwipeThreshold::new(f32::INFINITY).value(), SwipeThreshold::DEFAULT);
    }
}
