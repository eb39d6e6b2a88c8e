// SPDX-License-Identifier: MPL-2.0
//! Translations backed by Fluent.
//!
//! The `.ftl` files under `assets/i18n/` are embedded at build time. The
//! active locale comes from `--lang`, then the config file, then the OS,
//! then `en-US`. Keys missing from the active locale fall back to `en-US`.

pub mod fluent;
