// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::application::port::{BackendResult, Session};
use crate::domain::gallery::RecordId;
use crate::error::Error;
use crate::media::ImageData;
use crate::ui::auth;
use crate::ui::gallery;
use crate::ui::lightbox;
use crate::ui::notifications;
use iced::window;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Auth(auth::Message),
    Gallery(gallery::Message),
    Lightbox(lightbox::Message),
    Notification(notifications::NotificationMessage),
    /// Answer to the startup check of the stored token.
    SessionRestored(BackendResult<Session>),
    /// A thumbnail, avatar or full-size photo finished downloading.
    ImageFetched {
        url: String,
        result: Result<ImageData, Error>,
    },
    /// Files chosen in the upload picker (empty when cancelled).
    PhotosPicked(Vec<PathBuf>),
    /// File chosen in the avatar picker.
    AvatarPicked(Option<PathBuf>),
    /// Destination chosen in the download dialog.
    DownloadTarget {
        photo: RecordId,
        path: Option<PathBuf>,
    },
    DownloadFinished(BackendResult<PathBuf>),
    /// Window events the application itself cares about (size, id).
    Window {
        id: window::Id,
        event: window::Event,
    },
    /// Periodic tick for notification auto-dismiss.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional backend URL, overriding `[server] url` from the config file.
    pub server: Option<String>,
    /// Optional data directory override (for `state.cbor`).
    /// Takes precedence over `ICED_FOLIO_DATA_DIR` environment variable.
    pub data_dir: Option<String>,
    /// Optional config directory override (for `settings.toml`).
    /// Takes precedence over `ICED_FOLIO_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
