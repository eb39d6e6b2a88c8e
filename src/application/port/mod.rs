// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`backend`]: Remote account and photo storage
//!
//! # Design Notes
//!
//! - Traits use domain types only (no Iced handles, no `reqwest` types)
//! - Traits are `Send + Sync` so one instance can be shared behind an `Arc`
//! - Methods return boxed futures that the UI runs with `Task::perform`

pub mod backend;

pub use backend::{
    BackendError, BackendFuture, BackendResult, GalleryBackend, ListQuery, NewUser, Page,
    Session, Thumb, Upload, UserPatch, UPLOAD_EXTENSIONS,
};
