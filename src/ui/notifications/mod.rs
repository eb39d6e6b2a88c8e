// SPDX-License-Identifier: MPL-2.0
//! Toast notifications for action feedback.
//!
//! Failed user actions (upload, delete, profile edits, downloads) raise an
//! `Error` toast that stays until dismissed; confirmations fade after a few
//! seconds. Background list fetches never notify, they only log.
//!
//! ```ignore
//! manager.push(Notification::error("delete-failed"));
//! let overlay = Toast::view_overlay(&manager, &i18n).map(Message::Notification);
//! ```

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, Severity};
pub use toast::Toast;
