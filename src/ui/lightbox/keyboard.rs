// SPDX-License-Identifier: MPL-2.0
//! Keyboard mirror of the lightbox gestures.

use crate::domain::lightbox::Direction;
use iced::keyboard::{key::Named, Key};

/// Lightbox action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Advance(Direction),
    Close,
}

/// Maps a pressed key to its lightbox action.
#[must_use]
pub fn action_for(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(Named::ArrowRight) => Some(KeyAction::Advance(Direction::Forward)),
        Key::Named(Named::ArrowLeft) => Some(KeyAction::Advance(Direction::Backward)),
        Key::Named(Named::Escape) => Some(KeyAction::Close),
        _ => None,
    }
}
