// SPDX-License-Identifier: MPL-2.0
//! Full-window photo viewer layered over the gallery grid.
//!
//! ```text
//! component.rs (navigator: selection, direction, close generation, zoom)
//!     ├── gesture     - swipe scoring and two-finger pinch
//!     ├── keyboard    - arrow/escape mirror
//!     ├── transition  - slide-in offset
//!     └── view        - backdrop, photo stage, chrome
//! ```

pub mod component;
pub mod gesture;
pub mod keyboard;
pub mod transition;
mod view;

pub use component::{Effect, Env, Message, Settings, State};
pub use view::{view, ViewContext};
