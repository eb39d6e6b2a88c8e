// SPDX-License-Identifier: MPL-2.0
//! `iced_folio` is a photo gallery client built with the Iced GUI framework.
//!
//! It talks to a PocketBase server for accounts, photo records and files,
//! shows the photos in a masonry grid and opens them in a lightbox that pages
//! with arrows, keys and swipes and zooms with pinch or wheel.
//!
//! # Layers
//!
//! - [`domain`]: records, view scopes, filter expressions, lightbox values
//! - [`application`]: the backend port and the gallery use cases
//! - [`infrastructure`]: the PocketBase HTTP adapter
//! - [`ui`] and [`app`]: Iced components and the application shell

#![doc(html_root_url = "https://docs.rs/iced_folio/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod media;
pub mod ui;
