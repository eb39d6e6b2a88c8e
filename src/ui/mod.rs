// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! owns a `State`, turns its `Message`s into an `Effect` plus a `Task`, and
//! leaves anything outside its reach to the application.
//!
//! # Screens
//!
//! - [`auth`] - Sign-in and sign-up forms
//! - [`gallery`] - Masonry grid with header, upload and delete flows
//! - [`lightbox`] - Full-window viewer with paging, swipe and zoom
//! - [`profile`] - Profile panel opened from the gallery header
//!
//! # Shared Infrastructure
//!
//! - [`state`] - Drag and zoom state shared by gesture handling
//! - [`widgets`] - Custom Iced widgets (wheel capture)
//! - [`styles`] - Centralized styling (buttons, containers, overlays)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode management
//! - [`notifications`] - Toast notification system for user feedback

pub mod auth;
pub mod design_tokens;
pub mod gallery;
pub mod lightbox;
pub mod notifications;
pub mod profile;
pub mod state;
pub mod styles;
pub mod theming;
pub mod widgets;
