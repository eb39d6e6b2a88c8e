// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in `application::port`.
//!
//! # Available Adapters
//!
//! - [`pocketbase`]: Gallery backend over the PocketBase REST API (implements [`GalleryBackend`])
//!
//! [`GalleryBackend`]: crate::application::port::GalleryBackend

pub mod pocketbase;

pub use pocketbase::PocketBase;
