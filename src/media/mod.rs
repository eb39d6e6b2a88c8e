// SPDX-License-Identifier: MPL-2.0
//! Downloaded image handling: header decoding, the in-memory cache and the
//! tracker of downloads in flight.

pub mod cache;
pub mod image;
pub mod requests;

pub use cache::ImageCache;
pub use image::ImageData;
pub use requests::{ImageRequests, PREFETCH_NEIGHBOURS};
