// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Components answer with effects; the handlers here carry them out. That
//! covers file dialogs, window mode changes, image downloads and session
//! persistence.

use super::persisted_state::{AppState, StoredScope, StoredSession};
use super::{Message, Screen};
use crate::application::gallery as service;
use crate::application::port::{BackendError, BackendResult, GalleryBackend, Session, UPLOAD_EXTENSIONS};
use crate::config::Config;
use crate::domain::gallery::{Photo, RecordId, ViewScope};
use crate::error::Result;
use crate::media::{ImageCache, ImageData, ImageRequests, PREFETCH_NEIGHBOURS};
use crate::ui::notifications::{self, Notification};
use crate::ui::{auth, gallery, lightbox, profile};
use iced::{window, Size, Task};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Context for update operations containing mutable references to app state.
pub struct UpdateContext<'a> {
    pub backend: &'a Arc<dyn GalleryBackend>,
    pub config: &'a Config,
    pub screen: &'a mut Screen,
    pub auth: &'a mut auth::State,
    pub gallery: &'a mut Option<gallery::State>,
    pub lightbox: &'a mut lightbox::State,
    pub images: &'a mut ImageCache,
    pub image_requests: &'a mut ImageRequests,
    pub persisted: &'a mut AppState,
    pub notifications: &'a mut notifications::Manager,
    pub fullscreen: &'a mut bool,
    pub window_id: &'a mut Option<window::Id>,
    pub window_size: &'a mut Size,
}

impl UpdateContext<'_> {
    /// Writes `state.cbor`, surfacing a failure as a warning toast.
    fn persist(&mut self) {
        if let Some(key) = self.persisted.save() {
            self.notifications.push(Notification::warning(key));
        }
    }
}

/// Photos of the gallery screen, empty while signed out.
fn photos_of(gallery: Option<&gallery::State>) -> &[Photo] {
    gallery.map_or(&[], |state| state.photos())
}

// =============================================================================
// Session
// =============================================================================

/// Handles auth screen messages.
pub fn handle_auth_message(ctx: &mut UpdateContext<'_>, message: auth::Message) -> Task<Message> {
    let (effect, task) = ctx.auth.handle(message, ctx.backend);
    let task = task.map(Message::Auth);
    match effect {
        auth::Effect::None => task,
        auth::Effect::SignedIn(session) => Task::batch([task, enter_gallery(ctx, session)]),
    }
}

/// Handles the startup token check.
///
/// A rejected token is forgotten; a transport failure keeps it so the next
/// launch can try again. Either way the user lands on the auth screen.
pub fn handle_session_restored(
    ctx: &mut UpdateContext<'_>,
    result: BackendResult<Session>,
) -> Task<Message> {
    match result {
        Ok(session) => enter_gallery(ctx, session),
        Err(err) => {
            if matches!(err, BackendError::Unauthorized | BackendError::NotFound) {
                ctx.persisted.clear_session();
                ctx.persist();
            }
            *ctx.screen = Screen::Auth;
            Task::none()
        }
    }
}

/// Stores the session and shows the gallery in the last used scope.
fn enter_gallery(ctx: &mut UpdateContext<'_>, session: Session) -> Task<Message> {
    ctx.persisted.session = Some(StoredSession::new(&session.token, &session.user.id));
    ctx.persist();

    let scope = ctx
        .persisted
        .last_scope
        .clone()
        .map(ViewScope::from)
        .unwrap_or_else(|| ViewScope::own(&session.user));

    let mut state = gallery::State::new(session.user, scope);
    let env = gallery::Env {
        backend: ctx.backend,
        grid: &ctx.config.grid,
    };
    let task = state.load(&env).map(Message::Gallery);

    *ctx.gallery = Some(state);
    *ctx.screen = Screen::Gallery;
    *ctx.auth = auth::State::new();
    ctx.image_requests.reset();
    Task::batch([task, request_images(ctx)])
}

/// Drops the token and everything that belonged to the signed-in user.
fn logout(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    service::logout(ctx.backend.as_ref());
    ctx.persisted.clear_session();
    ctx.persist();

    *ctx.gallery = None;
    *ctx.lightbox = lightbox::State::new(*ctx.lightbox.settings());
    *ctx.auth = auth::State::new();
    *ctx.screen = Screen::Auth;
    ctx.images.clear();
    ctx.image_requests.reset();
    ctx.notifications.clear();
    set_fullscreen(ctx, false)
}

// =============================================================================
// Gallery
// =============================================================================

/// Handles gallery messages, then keeps the lightbox and the image cache in
/// step with the photo list.
pub fn handle_gallery_message(
    ctx: &mut UpdateContext<'_>,
    message: gallery::Message,
) -> Task<Message> {
    let Some(state) = ctx.gallery.as_mut() else {
        return Task::none();
    };
    let env = gallery::Env {
        backend: ctx.backend,
        grid: &ctx.config.grid,
    };
    let (effect, task) = state.handle(message, &env);

    let task = task.map(Message::Gallery);
    let effect_task = handle_gallery_effect(ctx, effect);
    if ctx.gallery.is_none() {
        // Logged out
        return Task::batch([task, effect_task]);
    }
    Task::batch([task, effect_task, sync_lightbox(ctx), request_images(ctx)])
}

fn handle_gallery_effect(ctx: &mut UpdateContext<'_>, effect: gallery::Effect) -> Task<Message> {
    match effect {
        gallery::Effect::None => Task::none(),
        gallery::Effect::OpenLightbox(id) => {
            let env = lightbox::Env {
                photos: photos_of(ctx.gallery.as_ref()),
                window_size: *ctx.window_size,
            };
            let (effect, task) = ctx.lightbox.handle(lightbox::Message::Open(id), env);
            Task::batch([task.map(Message::Lightbox), handle_lightbox_effect(ctx, effect)])
        }
        gallery::Effect::ScopeChanged(scope) => {
            ctx.persisted.last_scope = Some(StoredScope::from(&scope));
            ctx.persist();
            Task::none()
        }
        gallery::Effect::PickPhotos => pick_photos(ctx.persisted.last_open_directory.clone()),
        gallery::Effect::PickAvatar => pick_avatar(ctx.persisted.last_open_directory.clone()),
        gallery::Effect::Notify(notification) => {
            ctx.notifications.push(notification);
            Task::none()
        }
        gallery::Effect::LoggedOut => logout(ctx),
    }
}

/// Handles the upload picker result.
pub fn handle_photos_picked(ctx: &mut UpdateContext<'_>, files: Vec<PathBuf>) -> Task<Message> {
    if let Some(first) = files.first() {
        ctx.persisted.set_last_open_directory_from_file(first);
        ctx.persist();
    }
    handle_gallery_message(ctx, gallery::Message::FilesPicked(files))
}

/// Handles the avatar picker result.
pub fn handle_avatar_picked(ctx: &mut UpdateContext<'_>, path: Option<PathBuf>) -> Task<Message> {
    if let Some(path) = &path {
        ctx.persisted.set_last_open_directory_from_file(path);
        ctx.persist();
    }
    handle_gallery_message(
        ctx,
        gallery::Message::Profile(profile::Message::AvatarPicked(path)),
    )
}

fn pick_photos(last_directory: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new().add_filter("Images", UPLOAD_EXTENSIONS);

            if let Some(dir) = last_directory {
                if dir.exists() {
                    dialog = dialog.set_directory(&dir);
                }
            }

            dialog
                .pick_files()
                .await
                .map(|handles| handles.iter().map(|h| h.path().to_path_buf()).collect())
                .unwrap_or_default()
        },
        Message::PhotosPicked,
    )
}

fn pick_avatar(last_directory: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new().add_filter("Images", UPLOAD_EXTENSIONS);

            if let Some(dir) = last_directory {
                if dir.exists() {
                    dialog = dialog.set_directory(&dir);
                }
            }

            dialog.pick_file().await.map(|h| h.path().to_path_buf())
        },
        Message::AvatarPicked,
    )
}

// =============================================================================
// Lightbox
// =============================================================================

/// Handles lightbox component messages.
pub fn handle_lightbox_message(
    ctx: &mut UpdateContext<'_>,
    message: lightbox::Message,
) -> Task<Message> {
    let env = lightbox::Env {
        photos: photos_of(ctx.gallery.as_ref()),
        window_size: *ctx.window_size,
    };
    let (effect, task) = ctx.lightbox.handle(message, env);
    Task::batch([
        task.map(Message::Lightbox),
        handle_lightbox_effect(ctx, effect),
        request_images(ctx),
    ])
}

fn handle_lightbox_effect(ctx: &mut UpdateContext<'_>, effect: lightbox::Effect) -> Task<Message> {
    match effect {
        lightbox::Effect::None | lightbox::Effect::Moved(_) => Task::none(),
        lightbox::Effect::Opened {
            enter_fullscreen, ..
        } => {
            if enter_fullscreen {
                set_fullscreen(ctx, true)
            } else {
                Task::none()
            }
        }
        lightbox::Effect::Closing { exit_fullscreen } => {
            if exit_fullscreen {
                set_fullscreen(ctx, false)
            } else {
                Task::none()
            }
        }
        lightbox::Effect::Download(id) => {
            let Some(photo) = photos_of(ctx.gallery.as_ref()).iter().find(|photo| photo.id == id) else {
                return Task::none();
            };
            save_dialog(
                id,
                photo.image.clone(),
                ctx.persisted.last_save_directory.clone(),
            )
        }
    }
}

/// Closes the lightbox when the photo it shows left the list.
fn sync_lightbox(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let Some(state) = ctx.gallery.as_ref() else {
        return Task::none();
    };
    let (effect, task) = ctx.lightbox.sync(state.photos());
    Task::batch([task.map(Message::Lightbox), handle_lightbox_effect(ctx, effect)])
}

/// Requests or leaves full-screen presentation. Failures are ignored.
fn set_fullscreen(ctx: &mut UpdateContext<'_>, desired: bool) -> Task<Message> {
    if *ctx.fullscreen == desired {
        return Task::none();
    }

    let Some(window_id) = *ctx.window_id else {
        return Task::none();
    };

    *ctx.fullscreen = desired;
    let mode = if desired {
        window::Mode::Fullscreen
    } else {
        window::Mode::Windowed
    };
    window::set_mode(window_id, mode)
}

fn save_dialog(
    photo: RecordId,
    file_name: String,
    last_save_directory: Option<PathBuf>,
) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new().set_file_name(&file_name);

            if let Some(dir) = last_save_directory {
                if dir.exists() {
                    dialog = dialog.set_directory(&dir);
                }
            }

            dialog.save_file().await.map(|h| h.path().to_path_buf())
        },
        move |path| Message::DownloadTarget { photo, path },
    )
}

/// Starts writing the full-size file once a destination was chosen.
pub fn handle_download_target(
    ctx: &mut UpdateContext<'_>,
    photo: RecordId,
    path: Option<PathBuf>,
) -> Task<Message> {
    let Some(path) = path else {
        return Task::none();
    };
    let Some(photo) = photos_of(ctx.gallery.as_ref()).iter().find(|p| p.id == photo) else {
        return Task::none();
    };
    let url = service::original_url(ctx.backend.as_ref(), photo);

    ctx.persisted.set_last_save_directory_from_file(&path);
    ctx.persist();

    Task::perform(
        service::download(Arc::clone(ctx.backend), url, path),
        Message::DownloadFinished,
    )
}

pub fn handle_download_finished(
    ctx: &mut UpdateContext<'_>,
    result: BackendResult<PathBuf>,
) -> Task<Message> {
    match result {
        Ok(_) => ctx.notifications.push(Notification::success("download-saved")),
        Err(err) => {
            tracing::error!(%err, "download failed");
            ctx.notifications.push(Notification::error("download-failed"));
        }
    }
    Task::none()
}

// =============================================================================
// Images
// =============================================================================

/// Starts downloads for every image the current screens would draw: the
/// lightbox photo and its neighbours first, then thumbnails and the avatar.
pub fn request_images(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    let Some(state) = ctx.gallery.as_ref() else {
        return Task::none();
    };
    let backend = ctx.backend.as_ref();
    let photos = state.photos();

    let mut wanted = Vec::new();
    if let Some(index) = ctx.lightbox.current_index(photos) {
        wanted.extend(
            lightbox_order(index, photos.len(), PREFETCH_NEIGHBOURS)
                .into_iter()
                .map(|i| service::original_url(backend, &photos[i])),
        );
    }
    wanted.extend(state.wanted_images(backend));

    let urls = ctx.image_requests.begin(wanted, ctx.images);
    if urls.is_empty() {
        return Task::none();
    }
    tracing::debug!(count = urls.len(), "fetching images");
    Task::batch(urls.into_iter().map(|url| fetch_image(Arc::clone(ctx.backend), url)))
}

pub fn handle_image_fetched(
    ctx: &mut UpdateContext<'_>,
    url: String,
    result: Result<ImageData>,
) -> Task<Message> {
    match result {
        Ok(image) => {
            let cached = ctx.images.insert(url.clone(), image);
            if !cached {
                tracing::debug!(%url, "image too large to cache");
            }
            ctx.image_requests.finish(&url, cached);
        }
        Err(err) => {
            tracing::warn!(%url, %err, "image download failed");
            ctx.image_requests.finish(&url, false);
        }
    }
    Task::none()
}

fn fetch_image(backend: Arc<dyn GalleryBackend>, url: String) -> Task<Message> {
    Task::perform(download_image(backend, url.clone()), move |result| {
        Message::ImageFetched { url, result }
    })
}

async fn download_image(backend: Arc<dyn GalleryBackend>, url: String) -> Result<ImageData> {
    let bytes = service::fetch_image(backend, url).await?;
    ImageData::from_encoded(bytes)
}

/// Indices to fetch for the lightbox: `index`, then `neighbours` photos on
/// each side, wrapping like paging does.
fn lightbox_order(index: usize, len: usize, neighbours: usize) -> Vec<usize> {
    if len == 0 || index >= len {
        return Vec::new();
    }
    let mut order = vec![index];
    for step in 1..=neighbours.min(len / 2) {
        let next = (index + step) % len;
        let previous = (index + len - step) % len;
        for candidate in [next, previous] {
            if !order.contains(&candidate) {
                order.push(candidate);
            }
        }
    }
    order
}

// =============================================================================
// Window
// =============================================================================

pub fn handle_window_event(
    ctx: &mut UpdateContext<'_>,
    id: window::Id,
    event: window::Event,
) -> Task<Message> {
    *ctx.window_id = Some(id);
    match event {
        window::Event::Opened { size, .. } | window::Event::Resized(size) => {
            *ctx.window_size = size;
        }
        _ => {}
    }
    Task::none()
}

pub fn handle_tick(ctx: &mut UpdateContext<'_>, now: Instant) -> Task<Message> {
    ctx.notifications.tick(now);
    Task::none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lightbox_order_starts_with_selection_and_wraps() {
        assert_eq!(lightbox_order(0, 5, 1), vec![0, 1, 4]);
        assert_eq!(lightbox_order(4, 5, 2), vec![4, 0, 3, 1, 2]);
    }

    #[test]
    fn lightbox_order_handles_short_lists() {
        assert_eq!(lightbox_order(0, 1, 1), vec![0]);
        assert_eq!(lightbox_order(1, 2, 1), vec![1, 0]);
        assert!(lightbox_order(3, 2, 1).is_empty());
        assert!(lightbox_order(0, 0, 1).is_empty());
    }
}
