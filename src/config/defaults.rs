// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Server**: Backend address
//! - **Swipe**: Swipe scoring and swipe-to-close distances
//! - **Zoom**: Pinch/wheel bounds and the close/zoomed scale thresholds
//! - **Fullscreen**: Viewport width under which the lightbox goes fullscreen
//! - **Grid**: Masonry layout and page sizes

use crate::domain::lightbox::scale_bounds;

// ==========================================================================
// Server Defaults
// ==========================================================================

/// Default PocketBase address (its `serve` default).
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8090";

// ==========================================================================
// Swipe Defaults
// ==========================================================================

/// Swipe score a release must exceed to page or close.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 2000.0;

/// Minimum swipe threshold accepted from the config file.
pub const MIN_SWIPE_THRESHOLD: f32 = 100.0;

/// Maximum swipe threshold accepted from the config file.
pub const MAX_SWIPE_THRESHOLD: f32 = 50_000.0;

/// Downward drag (px) that closes the lightbox on its own.
pub const DEFAULT_CLOSE_DISTANCE: f32 = 100.0;

/// Downward drag (px) that closes the lightbox when the flick is fast enough.
pub const DEFAULT_CLOSE_DISTANCE_WITH_VELOCITY: f32 = 50.0;

/// Delay before the selection is cleared after a close (ms).
pub const DEFAULT_CLOSE_DELAY_MS: u64 = 50;

// ==========================================================================
// Zoom Defaults
// ==========================================================================

/// Scale added or removed per mouse wheel notch.
pub const DEFAULT_WHEEL_STEP: f32 = 0.25;

/// Minimum wheel step.
pub const MIN_WHEEL_STEP: f32 = 0.05;

/// Maximum wheel step.
pub const MAX_WHEEL_STEP: f32 = 1.0;

pub const DEFAULT_CLOSE_SCALE: f32 = scale_bounds::CLOSE_BELOW;
pub const DEFAULT_ZOOMED_SCALE: f32 = scale_bounds::ZOOMED_ABOVE;

// ==========================================================================
// Fullscreen Defaults
// ==========================================================================

/// Widest viewport (logical px) that still requests fullscreen on open.
pub const DEFAULT_FULLSCREEN_MAX_WIDTH: f32 = 768.0;

// ==========================================================================
// Grid Defaults
// ==========================================================================

/// Thumbnail size requested from the file endpoint (`WxH`, 0 = keep ratio).
pub const DEFAULT_THUMB_WIDTH: u32 = 480;

/// Thumbnail width requested for avatars.
pub const AVATAR_THUMB_WIDTH: u32 = 100;

/// Narrowest masonry column before the grid drops a column (px).
pub const DEFAULT_MIN_COLUMN_WIDTH: f32 = 240.0;

/// Maximum number of masonry columns.
pub const MAX_COLUMNS: usize = 6;

/// Photos fetched per gallery load.
pub const DEFAULT_PHOTOS_PER_PAGE: u32 = 50;

/// Users fetched for the dropdown.
pub const DEFAULT_USERS_PER_PAGE: u32 = 100;

/// Decoded thumbnails kept in memory.
pub const DEFAULT_THUMBNAIL_CACHE_ENTRIES: usize = 256;

/// Encoded bytes kept in the image cache (256 MiB).
pub const DEFAULT_IMAGE_CACHE_BYTES: usize = 256 * 1024 * 1024;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_SWIPE_THRESHOLD > 0.0);
    assert!(DEFAULT_SWIPE_THRESHOLD >= MIN_SWIPE_THRESHOLD);
    assert!(DEFAULT_SWIPE_THRESHOLD <= MAX_SWIPE_THRESHOLD);

    assert!(DEFAULT_CLOSE_DISTANCE_WITH_VELOCITY < DEFAULT_CLOSE_DISTANCE);

    assert!(MIN_WHEEL_STEP > 0.0);
    assert!(DEFAULT_WHEEL_STEP >= MIN_WHEEL_STEP);
    assert!(DEFAULT_WHEEL_STEP <= MAX_WHEEL_STEP);

    assert!(DEFAULT_CLOSE_SCALE >= scale_bounds::MIN);
    assert!(DEFAULT_CLOSE_SCALE < scale_bounds::NEUTRAL);
    assert!(DEFAULT_ZOOMED_SCALE > scale_bounds::NEUTRAL);

    assert!(DEFAULT_PHOTOS_PER_PAGE > 0);
    assert!(DEFAULT_USERS_PER_PAGE > 0);
    assert!(MAX_COLUMNS > 0);
};
