// SPDX-License-Identifier: MPL-2.0
//! Gallery domain types.

pub mod filter;
pub mod scope;
pub mod types;

pub use filter::{Filter, FilterValue};
pub use scope::{include_viewer, users_filter, GalleryTitle, ViewScope};
pub use types::{position_of, CollectionRef, FileOwner, Photo, RecordId, Subtitle, User};
