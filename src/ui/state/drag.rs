// SPDX-License-Identifier: MPL-2.0
//! Drag state management
//!
//! Iced delivers raw cursor positions, so the lightbox derives gesture offset
//! and release velocity itself from timestamped samples. While zoomed, the
//! same drag pans the image instead.

use iced::widget::scrollable::AbsoluteOffset;
use iced::{Point, Vector};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Only samples this recent contribute to the release velocity.
pub const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// Upper bound on retained samples.
const MAX_SAMPLES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    at: Instant,
    position: Point,
}

/// Offset and velocity of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    /// Displacement from the press position (px).
    pub offset: Vector,
    /// Velocity at release (px/s).
    pub velocity: Vector,
}

/// Manages grab-and-drag state
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Whether a drag operation is currently active
    pub is_dragging: bool,

    /// Position where the drag started
    pub start_position: Option<Point>,

    /// Scroll offset when the drag started (used for panning while zoomed)
    pub start_offset: Option<AbsoluteOffset>,

    samples: VecDeque<Sample>,
}

impl DragState {
    /// Starts a drag operation
    pub fn start(&mut self, position: Point, offset: AbsoluteOffset, now: Instant) {
        self.is_dragging = true;
        self.start_position = Some(position);
        self.start_offset = Some(offset);
        self.samples.clear();
        self.samples.push_back(Sample { at: now, position });
    }

    /// Records a cursor position while dragging
    pub fn record(&mut self, position: Point, now: Instant) {
        if !self.is_dragging {
            return;
        }
        self.samples.push_back(Sample { at: now, position });
        while self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
    }

    /// Stops the drag operation without scoring it
    pub fn stop(&mut self) {
        self.is_dragging = false;
        self.start_position = None;
        self.start_offset = None;
        self.samples.clear();
    }

    /// Displacement of the cursor since the press
    #[must_use]
    pub fn current_offset(&self, current_position: Point) -> Option<Vector> {
        if !self.is_dragging {
            return None;
        }
        let start = self.start_position?;
        Some(current_position - start)
    }

    /// Calculates the new scroll offset based on cursor movement during drag
    #[must_use]
    pub fn calculate_offset(&self, current_position: Point) -> Option<AbsoluteOffset> {
        let delta = self.current_offset(current_position)?;
        let start_offset = self.start_offset?;

        // Moving the cursor right scrolls the content left
        Some(AbsoluteOffset {
            x: (start_offset.x - delta.x).max(0.0),
            y: (start_offset.y - delta.y).max(0.0),
        })
    }

    /// Velocity over the samples recorded in the last [`VELOCITY_WINDOW`] before `now`
    #[must_use]
    pub fn velocity(&self, now: Instant) -> Vector {
        let recent: Vec<&Sample> = self
            .samples
            .iter()
            .filter(|s| now.saturating_duration_since(s.at) <= VELOCITY_WINDOW)
            .collect();
        let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
            return Vector::ZERO;
        };
        let elapsed = last.at.saturating_duration_since(first.at).as_secs_f32();
        if elapsed <= f32::EPSILON {
            return Vector::ZERO;
        }
        (last.position - first.position) * (1.0 / elapsed)
    }

    /// Ends the drag at `position` and returns its offset and velocity
    pub fn finish(&mut self, position: Point, now: Instant) -> Option<DragRelease> {
        if !self.is_dragging {
            return None;
        }
        self.record(position, now);
        let release = self.current_offset(position).map(|offset| DragRelease {
            offset,
            velocity: self.velocity(now),
        });
        self.stop();
        release
    }
}
