// SPDX-License-Identifier: MPL-2.0
//! Slide-in transition played when the lightbox opens or pages.

use crate::domain::lightbox::Direction;
use std::time::{Duration, Instant};

pub const DURATION: Duration = Duration::from_millis(250);

/// Fraction of the viewport width the incoming photo starts from.
const TRAVEL: f32 = 0.35;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transition {
    started: Option<Instant>,
    direction: Direction,
}

impl Transition {
    pub fn start(&mut self, direction: Direction, now: Instant) {
        self.started = Some(now);
        self.direction = direction;
    }

    pub fn stop(&mut self) {
        self.started = None;
    }

    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|started| now.saturating_duration_since(started) < DURATION)
    }

    /// Eased progress in `[0, 1]`; finished transitions report 1.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return 1.0;
        };
        let t = now.saturating_duration_since(started).as_secs_f32() / DURATION.as_secs_f32();
        ease_out_cubic(t.clamp(0.0, 1.0))
    }

    /// Horizontal offset of the incoming photo. Its sign follows the paging direction.
    #[must_use]
    pub fn offset(&self, viewport_width: f32, now: Instant) -> f32 {
        self.direction.sign() * viewport_width * TRAVEL * (1.0 - self.progress(now))
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
