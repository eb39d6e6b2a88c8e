// SPDX-License-Identifier: MPL-2.0
//! Gesture interpretation for the lightbox.
//!
//! A finished drag is scored per axis (`|offset| × velocity`) and mapped to
//! navigation or close. Two-finger touch input is reduced to a pinch scale
//! that feeds the same zoom notifications as the mouse wheel.

use crate::config::LightboxConfig;
use crate::domain::lightbox::{swipe_power, Direction, SwipeThreshold};
use crate::ui::state::DragRelease;
use iced::touch::Finger;
use iced::Point;
use std::collections::HashMap;

/// Thresholds used to score a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeSettings {
    pub threshold: SwipeThreshold,
    /// Downward distance that closes on its own.
    pub close_distance: f32,
    /// Downward distance that closes when the vertical score also passes the threshold.
    pub close_distance_with_velocity: f32,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self::from(&LightboxConfig::default())
    }
}

impl From<&LightboxConfig> for SwipeSettings {
    fn from(config: &LightboxConfig) -> Self {
        Self {
            threshold: config.swipe_threshold(),
            close_distance: config.close_distance(),
            close_distance_with_velocity: config.close_distance_with_velocity(),
        }
    }
}

/// What a finished drag asks the lightbox to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    None,
    Advance(Direction),
    Close,
}

/// Scores a released drag.
///
/// A swipe to the left (negative score) moves forward, a swipe to the right
/// moves backward. Horizontal intent wins over vertical.
#[must_use]
pub fn classify(release: DragRelease, settings: &SwipeSettings) -> SwipeAction {
    let threshold = settings.threshold.value();

    let horizontal = swipe_power(release.offset.x, release.velocity.x);
    if horizontal < -threshold {
        return SwipeAction::Advance(Direction::Forward);
    }
    if horizontal > threshold {
        return SwipeAction::Advance(Direction::Backward);
    }

    let dy = release.offset.y;
    let vertical = swipe_power(dy, release.velocity.y);
    if dy > settings.close_distance
        || (dy > settings.close_distance_with_velocity && vertical > threshold)
    {
        return SwipeAction::Close;
    }

    SwipeAction::None
}

// ============================================================================
// Pinch
// ============================================================================

/// Notification derived from touch input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinchEvent {
    /// A second finger touched down.
    Started,
    /// Fingers moved; carries the resulting scale.
    Transform(f32),
    /// A finger lifted and ended the pinch; carries the final scale.
    Stopped(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pinch {
    start_distance: f32,
    base_scale: f32,
    scale: f32,
}

/// Tracks active touch points and turns two of them into a pinch scale.
#[derive(Debug, Clone, Default)]
pub struct PinchState {
    fingers: HashMap<Finger, Point>,
    pinch: Option<Pinch>,
}

impl PinchState {
    /// Number of fingers currently down.
    #[must_use]
    pub fn finger_count(&self) -> usize {
        self.fingers.len()
    }

    /// Registers a finger; starting a pinch once two are down.
    pub fn press(&mut self, finger: Finger, position: Point, current_scale: f32) -> Option<PinchEvent> {
        self.fingers.insert(finger, position);
        if self.fingers.len() != 2 || self.pinch.is_some() {
            return None;
        }
        let start_distance = self.spread()?;
        if start_distance <= f32::EPSILON {
            return None;
        }
        self.pinch = Some(Pinch {
            start_distance,
            base_scale: current_scale,
            scale: current_scale,
        });
        Some(PinchEvent::Started)
    }

    pub fn moved(&mut self, finger: Finger, position: Point) -> Option<PinchEvent> {
        let slot = self.fingers.get_mut(&finger)?;
        *slot = position;
        let distance = self.spread()?;
        let pinch = self.pinch.as_mut()?;
        pinch.scale = pinch.base_scale * distance / pinch.start_distance;
        Some(PinchEvent::Transform(pinch.scale))
    }

    /// Removes a finger (lifted or lost); ends the pinch if one was active.
    pub fn lift(&mut self, finger: Finger) -> Option<PinchEvent> {
        self.fingers.remove(&finger);
        if self.fingers.len() >= 2 {
            return None;
        }
        self.pinch.take().map(|pinch| PinchEvent::Stopped(pinch.scale))
    }

    pub fn reset(&mut self) {
        self.fingers.clear();
        self.pinch = None;
    }

    fn spread(&self) -> Option<f32> {
        let mut points = self.fingers.values();
        let a = points.next()?;
        let b = points.next()?;
        Some(a.distance(*b))
    }
}
