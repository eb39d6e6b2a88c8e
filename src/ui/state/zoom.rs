// SPDX-License-Identifier: MPL-2.0
//! Zoom state management
//!
//! Holds the lightbox's current scale and pan position. The scale is the
//! single source of truth for "is the image zoomed", read synchronously when
//! a drag ends.

use crate::domain::lightbox::ZoomScale;
use iced::widget::scrollable::RelativeOffset;

/// Pan position of the centered image.
pub const CENTERED: RelativeOffset = RelativeOffset { x: 0.5, y: 0.5 };

/// Manages zoom-related state for the lightbox image
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    /// Current scale (1.0 = fitted to the view).
    pub scale: ZoomScale,

    /// Whether the image is treated as zoomed in; disables swipe navigation.
    pub is_zoomed: bool,

    /// Scroll position inside the zoomed image.
    pub pan: RelativeOffset,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: ZoomScale::default(),
            is_zoomed: false,
            pan: CENTERED,
        }
    }
}

impl ZoomState {
    /// Applies a new scale without classifying it.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = ZoomScale::new(scale);
    }

    /// Returns to the fitted, centered, not-zoomed state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records the user's scroll position while zoomed.
    pub fn set_pan(&mut self, pan: RelativeOffset) {
        self.pan = RelativeOffset {
            x: pan.x.clamp(0.0, 1.0),
            y: pan.y.clamp(0.0, 1.0),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lightbox::scale_bounds;

    #[test]
    fn default_is_fitted_and_centered() {
        let state = ZoomState::default();
        assert!(state.scale.is_neutral());
        assert!(!state.is_zoomed);
        assert_eq!(state.pan, CENTERED);
    }

    #[test]
    fn scale_is_clamped_to_bounds() {
        let mut state = ZoomState::default();
        state.set_scale(40.0);
        assert_eq!(state.scale.value(), scale_bounds::MAX);
        state.set_scale(0.0);
        assert_eq!(state.scale.value(), scale_bounds::MIN);
    }

    #[test]
    fn reset_restores_default() {
        let mut state = ZoomState::default();
        state.set_scale(3.0);
        state.is_zoomed = true;
        state.set_pan(RelativeOffset { x: 0.1, y: 0.9 });
        state.reset();
        assert_eq!(state, ZoomState::default());
    }

    #[test]
    fn pan_is_clamped() {
        let mut state = ZoomState::default();
        state.set_pan(RelativeOffset { x: -1.0, y: 2.0 });
        assert_eq!(state.pan, RelativeOffset { x: 0.0, y: 1.0 });
    }
}
