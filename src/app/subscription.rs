// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Window events feed the window id and size used for full-screen requests
//! and the lightbox's viewport checks. Input events are only listened to by
//! the lightbox, and only while it is open.

use super::Message;
use crate::ui::lightbox;
use iced::{event, time, window, Subscription};
use std::time::Duration;

/// Interval of the notification tick.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Forwards window open and resize events.
pub fn create_window_subscription() -> Subscription<Message> {
    event::listen_with(|event, _status, id| match event {
        event::Event::Window(
            window_event @ (window::Event::Opened { .. } | window::Event::Resized(_)),
        ) => Some(Message::Window {
            id,
            event: window_event,
        }),
        _ => None,
    })
}

/// Creates a periodic tick subscription for notification auto-dismiss.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(TICK_INTERVAL).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

/// Keyboard, pointer and animation events for the open lightbox.
pub fn create_lightbox_subscription(lightbox: &lightbox::State) -> Subscription<Message> {
    lightbox.subscription().map(Message::Lightbox)
}
