// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core gallery rules with no UI or transport dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! Apart from `chrono` timestamps on records, it depends only on `std` so it
//! stays trivially testable.
//!
//! # Modules
//!
//! - [`gallery`]: Records ([`Photo`](gallery::Photo), [`User`](gallery::User)),
//!   the [`ViewScope`](gallery::ViewScope) that decides whose photos are shown,
//!   and backend-neutral [`Filter`](gallery::Filter) expressions
//! - [`lightbox`]: Lightbox value objects ([`Direction`](lightbox::Direction),
//!   [`ZoomScale`](lightbox::ZoomScale), [`SwipeThreshold`](lightbox::SwipeThreshold))

pub mod gallery;
pub mod lightbox;
