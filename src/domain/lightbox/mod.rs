// SPDX-License-Identifier: MPL-2.0
//! Lightbox domain types.

pub mod newtypes;

pub use newtypes::{scale_bounds, swipe_power, Direction, SwipeThreshold, ZoomScale};
