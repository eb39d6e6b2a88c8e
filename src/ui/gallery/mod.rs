// SPDX-License-Identifier: MPL-2.0
//! Photo grid screen.
//!
//! ```text
//! component.rs (scope, loads, upload, delete, profile panel)
//!     ├── header        - scope dropdown, upload button, profile bubble
//!     ├── masonry       - column count and shortest-column packing
//!     └── delete_modal  - confirmation card
//! ```

pub mod component;
pub mod delete_modal;
pub mod header;
pub mod masonry;

pub use component::{Effect, Env, Message, State, ViewContext};
