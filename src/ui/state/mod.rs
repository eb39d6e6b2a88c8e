// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! Gesture and zoom state kept apart from the components that render them.

pub mod drag;
pub mod zoom;

pub use drag::{DragRelease, DragState};
pub use zoom::ZoomState;
