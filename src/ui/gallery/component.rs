// SPDX-License-Identifier: MPL-2.0
//! Gallery screen state: who is signed in, which scope is shown, the loaded
//! users and photos, and the upload/delete/profile flows around them.

use super::{delete_modal, header, masonry};
use crate::application::gallery::{self, UploadOutcome};
use crate::application::port::{BackendResult, GalleryBackend};
use crate::config::GridConfig;
use crate::domain::gallery::{position_of, Photo, RecordId, User, ViewScope};
use crate::i18n::fluent::I18n;
use crate::media::{ImageCache, ImageData};
use crate::ui::design_tokens::{opacity, palette::WHITE, sizing, spacing, typography};
use crate::ui::notifications::Notification;
use crate::ui::profile;
use crate::ui::styles;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{
    button, mouse_area, responsive, text, Column, Container, Image, Row, Scrollable, Space, Stack,
};
use iced::{mouse, ContentFit, Element, Length, Padding, Task};
use std::path::PathBuf;
use std::sync::Arc;

/// Gap between masonry columns and between tiles in a column.
const GRID_GAP: f32 = spacing::XS;

#[derive(Debug, Clone)]
pub enum Message {
    Header(header::Message),
    Profile(profile::Message),
    DeleteModal(delete_modal::Message),
    /// Click outside an open dropdown.
    DismissMenus,
    Reload,
    UsersLoaded {
        generation: u64,
        result: BackendResult<Vec<User>>,
    },
    PhotosLoaded {
        generation: u64,
        result: BackendResult<Vec<Photo>>,
    },
    FilesPicked(Vec<PathBuf>),
    UploadFinished(UploadOutcome),
    OpenPhoto(RecordId),
    RequestDelete(RecordId),
    DeleteFinished(BackendResult<RecordId>),
}

/// Requests the gallery cannot fulfil on its own.
#[derive(Debug, Clone)]
pub enum Effect {
    None,
    OpenLightbox(RecordId),
    /// Remember the scope for the next launch.
    ScopeChanged(ViewScope),
    /// Show a multi-file picker and answer with `FilesPicked`.
    PickPhotos,
    /// Show a single-file picker and answer with `Profile(AvatarPicked)`.
    PickAvatar,
    Notify(Notification),
    LoggedOut,
}

pub struct Env<'a> {
    pub backend: &'a Arc<dyn GalleryBackend>,
    pub grid: &'a GridConfig,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub backend: &'a dyn GalleryBackend,
    pub images: &'a ImageCache,
    pub min_column_width: f32,
}

#[derive(Debug)]
pub struct State {
    viewer: User,
    users: Vec<User>,
    photos: Vec<Photo>,
    scope: ViewScope,
    /// Bumped by every load; answers tagged with an older value are dropped.
    load_generation: u64,
    is_loading: bool,
    is_uploading: bool,
    menu_open: bool,
    profile_open: bool,
    pending_delete: Option<RecordId>,
    is_deleting: bool,
    profile: profile::State,
}

impl State {
    #[must_use]
    pub fn new(viewer: User, scope: ViewScope) -> Self {
        let profile = profile::State::new(&viewer);
        Self {
            users: vec![viewer.clone()],
            viewer,
            photos: Vec::new(),
            scope,
            load_generation: 0,
            is_loading: false,
            is_uploading: false,
            menu_open: false,
            profile_open: false,
            pending_delete: None,
            is_deleting: false,
            profile,
        }
    }

    #[must_use]
    pub fn viewer(&self) -> &User {
        &self.viewer
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    #[must_use]
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    /// Whether a dropdown or dialog sits over the grid.
    #[must_use]
    pub fn has_overlay(&self) -> bool {
        self.menu_open || self.profile_open || self.pending_delete.is_some()
    }

    /// Image URLs the screen would draw right now: grid thumbnails and the
    /// viewer's avatar.
    #[must_use]
    pub fn wanted_images(&self, backend: &dyn GalleryBackend) -> Vec<String> {
        let mut urls: Vec<String> = self
            .photos
            .iter()
            .map(|photo| gallery::thumbnail_url(backend, photo))
            .collect();
        urls.extend(gallery::avatar_url(backend, &self.viewer));
        urls
    }

    /// Starts a fresh fetch of users and photos for the current scope.
    pub fn load(&mut self, env: &Env<'_>) -> Task<Message> {
        self.load_generation += 1;
        self.is_loading = true;
        let generation = self.load_generation;
        tracing::debug!(generation, scope = ?self.scope, "loading gallery");

        let users = Task::perform(
            gallery::load_users(
                Arc::clone(env.backend),
                self.viewer.clone(),
                env.grid.users_per_page(),
            ),
            move |result| Message::UsersLoaded { generation, result },
        );
        let photos = Task::perform(
            gallery::load_photos(
                Arc::clone(env.backend),
                self.viewer.clone(),
                self.scope.clone(),
                env.grid.photos_per_page(),
            ),
            move |result| Message::PhotosLoaded { generation, result },
        );
        Task::batch([users, photos])
    }

    pub fn handle(&mut self, message: Message, env: &Env<'_>) -> (Effect, Task<Message>) {
        match message {
            Message::Header(message) => self.handle_header(message, env),
            Message::Profile(message) => self.handle_profile(message, env),
            Message::DeleteModal(message) => self.handle_delete_modal(message, env),
            Message::DismissMenus => {
                self.menu_open = false;
                self.profile_open = false;
                (Effect::None, Task::none())
            }
            Message::Reload => (Effect::None, self.load(env)),
            Message::UsersLoaded { generation, result } => {
                if generation == self.load_generation {
                    match result {
                        Ok(users) => self.users = users,
                        Err(err) => tracing::warn!(%err, "user list unavailable"),
                    }
                }
                (Effect::None, Task::none())
            }
            Message::PhotosLoaded { generation, result } => {
                self.apply_photos(generation, result);
                (Effect::None, Task::none())
            }
            Message::FilesPicked(files) => {
                if files.is_empty() || self.is_uploading {
                    return (Effect::None, Task::none());
                }
                self.is_uploading = true;
                let owner = self.scope.upload_owner(&self.viewer);
                tracing::debug!(count = files.len(), %owner, "uploading photos");
                let task = Task::perform(
                    gallery::upload_photos(Arc::clone(env.backend), owner, files),
                    Message::UploadFinished,
                );
                (Effect::None, task)
            }
            Message::UploadFinished(outcome) => (self.apply_upload(outcome), Task::none()),
            Message::OpenPhoto(id) => {
                self.menu_open = false;
                self.profile_open = false;
                if position_of(&self.photos, &id).is_some() {
                    (Effect::OpenLightbox(id), Task::none())
                } else {
                    (Effect::None, Task::none())
                }
            }
            Message::RequestDelete(id) => {
                let allowed = self
                    .photos
                    .iter()
                    .find(|photo| photo.id == id)
                    .is_some_and(|photo| self.viewer.can_delete(photo));
                if allowed && !self.is_deleting {
                    self.pending_delete = Some(id);
                }
                (Effect::None, Task::none())
            }
            Message::DeleteFinished(result) => (self.apply_delete(result), Task::none()),
        }
    }

    /// Replaces the grid with a load result unless a newer load superseded
    /// it. Failures keep the current grid.
    pub fn apply_photos(&mut self, generation: u64, result: BackendResult<Vec<Photo>>) -> bool {
        if generation != self.load_generation {
            tracing::debug!(generation, current = self.load_generation, "stale gallery load dropped");
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(photos) => {
                self.photos = photos;
                true
            }
            Err(err) => {
                tracing::warn!(%err, "photo list unavailable");
                false
            }
        }
    }

    /// Prepends the photos that belong in the current scope; any failed file
    /// raises an error toast.
    pub fn apply_upload(&mut self, outcome: UploadOutcome) -> Effect {
        self.is_uploading = false;
        let failed = outcome.failed;

        let visible: Vec<Photo> = outcome
            .uploaded
            .into_iter()
            .filter(|photo| match &self.scope {
                ViewScope::All => true,
                ViewScope::User(id) => *id == photo.owner,
            })
            .map(|mut photo| {
                if photo.owner_name.is_none() {
                    photo.owner_name = self
                        .users
                        .iter()
                        .find(|user| user.id == photo.owner)
                        .map(|user| user.display_name().to_string());
                }
                photo
            })
            .collect();
        self.photos.splice(0..0, visible);

        if failed > 0 {
            Effect::Notify(Notification::error("upload-failed").with_arg("count", failed))
        } else {
            Effect::None
        }
    }

    pub fn apply_delete(&mut self, result: BackendResult<RecordId>) -> Effect {
        self.is_deleting = false;
        self.pending_delete = None;
        match result {
            Ok(id) => {
                self.photos.retain(|photo| photo.id != id);
                Effect::None
            }
            Err(err) => {
                tracing::error!(%err, "delete failed");
                Effect::Notify(Notification::error("delete-failed"))
            }
        }
    }

    fn select_scope(&mut self, scope: ViewScope, env: &Env<'_>) -> (Effect, Task<Message>) {
        self.scope = scope.clone();
        (Effect::ScopeChanged(scope), self.load(env))
    }

    fn handle_header(&mut self, message: header::Message, env: &Env<'_>) -> (Effect, Task<Message>) {
        match header::update(message, &mut self.menu_open) {
            header::Event::None => {
                if self.menu_open {
                    self.profile_open = false;
                }
                (Effect::None, Task::none())
            }
            header::Event::ScopeSelected(scope) => self.select_scope(scope, env),
            header::Event::ProfileToggled => {
                self.profile_open = !self.profile_open;
                if self.profile_open {
                    self.profile.reset_draft(&self.viewer);
                }
                (Effect::None, Task::none())
            }
            header::Event::UploadRequested => {
                self.profile_open = false;
                if self.is_uploading {
                    (Effect::None, Task::none())
                } else {
                    (Effect::PickPhotos, Task::none())
                }
            }
        }
    }

    fn handle_profile(&mut self, message: profile::Message, env: &Env<'_>) -> (Effect, Task<Message>) {
        let (effect, task) = self.profile.handle(message, &mut self.viewer, env.backend);
        let task = task.map(Message::Profile);
        let effect = match effect {
            profile::Effect::None => Effect::None,
            profile::Effect::ViewerChanged => {
                self.sync_viewer_entry();
                Effect::None
            }
            profile::Effect::Notify(notification) => {
                // Rolled-back toggles also changed the viewer.
                self.sync_viewer_entry();
                Effect::Notify(notification)
            }
            profile::Effect::PickAvatar => Effect::PickAvatar,
            profile::Effect::Logout => Effect::LoggedOut,
            profile::Effect::Close => {
                self.profile_open = false;
                Effect::None
            }
        };
        (effect, task)
    }

    fn handle_delete_modal(
        &mut self,
        message: delete_modal::Message,
        env: &Env<'_>,
    ) -> (Effect, Task<Message>) {
        match message {
            delete_modal::Message::Ignore => (Effect::None, Task::none()),
            delete_modal::Message::Cancel => {
                if !self.is_deleting {
                    self.pending_delete = None;
                }
                (Effect::None, Task::none())
            }
            delete_modal::Message::Confirm => {
                let Some(id) = self.pending_delete.clone() else {
                    return (Effect::None, Task::none());
                };
                if self.is_deleting {
                    return (Effect::None, Task::none());
                }
                self.is_deleting = true;
                let task = Task::perform(
                    gallery::delete_photo(Arc::clone(env.backend), id),
                    Message::DeleteFinished,
                );
                (Effect::None, task)
            }
        }
    }

    /// Keeps the dropdown's copy of the viewer in step with profile edits.
    fn sync_viewer_entry(&mut self) {
        if let Some(entry) = self.users.iter_mut().find(|user| user.id == self.viewer.id) {
            *entry = self.viewer.clone();
        }
    }

    pub fn view<'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let viewer_avatar = gallery::avatar_url(ctx.backend, &self.viewer)
            .and_then(|url| ctx.images.peek(&url));
        let header_ctx = header::ViewContext {
            i18n: ctx.i18n,
            viewer: &self.viewer,
            users: &self.users,
            scope: &self.scope,
            menu_open: self.menu_open,
            is_uploading: self.is_uploading,
            viewer_avatar,
        };

        let body: Element<'a, Message> = if self.photos.is_empty() {
            let key = if self.is_loading {
                "gallery-loading"
            } else {
                "gallery-empty"
            };
            Container::new(text(ctx.i18n.tr(key)).size(typography::BODY_LG))
                .center(Length::Fill)
                .into()
        } else {
            let backend = ctx.backend;
            let images = ctx.images;
            let min_column_width = ctx.min_column_width;
            responsive(move |size| {
                Scrollable::new(self.grid(backend, images, size.width, min_column_width))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into()
            })
            .into()
        };

        let mut layers = Stack::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(
                Column::new()
                    .push(header::view(&header_ctx).map(Message::Header))
                    .push(body),
            );

        if self.menu_open || self.profile_open {
            layers = layers.push(
                mouse_area(Space::new().width(Length::Fill).height(Length::Fill))
                    .on_press(Message::DismissMenus)
                    .interaction(mouse::Interaction::Idle),
            );
        }
        if self.menu_open {
            layers = layers.push(
                Container::new(header::menu(&header_ctx).map(Message::Header)).padding(Padding {
                    top: sizing::HEADER_HEIGHT,
                    left: spacing::MD,
                    ..Padding::ZERO
                }),
            );
        }
        if self.profile_open {
            let panel = self
                .profile
                .view(profile::ViewContext {
                    i18n: ctx.i18n,
                    viewer: &self.viewer,
                    avatar: viewer_avatar,
                })
                .map(Message::Profile);
            layers = layers.push(
                Container::new(panel)
                    .width(Length::Fill)
                    .align_x(Horizontal::Right)
                    .padding(Padding {
                        top: sizing::HEADER_HEIGHT,
                        right: spacing::MD,
                        ..Padding::ZERO
                    }),
            );
        }
        if self.pending_delete.is_some() {
            layers = layers.push(
                delete_modal::view(ctx.i18n, self.is_deleting).map(Message::DeleteModal),
            );
        }

        layers.into()
    }

    fn grid<'a>(
        &'a self,
        backend: &'a dyn GalleryBackend,
        images: &'a ImageCache,
        width: f32,
        min_column_width: f32,
    ) -> Element<'a, Message> {
        let inner_width = (width - 2.0 * spacing::MD).max(0.0);
        let columns = masonry::column_count(inner_width, min_column_width);
        let column_width = masonry::column_width(inner_width, columns, GRID_GAP);

        let thumbnails: Vec<Option<&ImageData>> = self
            .photos
            .iter()
            .map(|photo| images.peek(&gallery::thumbnail_url(backend, photo)))
            .collect();
        let heights: Vec<f32> = thumbnails
            .iter()
            .map(|thumb| masonry::tile_height(thumb.map(ImageData::aspect_ratio), column_width))
            .collect();

        let mut row = Row::new().spacing(GRID_GAP).padding(spacing::MD);
        for lane in masonry::pack(&heights, columns) {
            let mut column = Column::new().spacing(GRID_GAP).width(Length::Fixed(column_width));
            for index in lane {
                let photo = &self.photos[index];
                column = column.push(tile(
                    photo,
                    thumbnails[index],
                    heights[index],
                    self.viewer.can_delete(photo),
                ));
            }
            row = row.push(column);
        }
        row.into()
    }
}

fn tile<'a>(
    photo: &'a Photo,
    thumbnail: Option<&'a ImageData>,
    height: f32,
    can_delete: bool,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match thumbnail {
        Some(data) => Image::new(data.handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Cover)
            .into(),
        None => Space::new()
            .width(Length::Fill)
            .height(Length::Fixed(height))
            .into(),
    };

    let mut layers = Stack::new().push(
        mouse_area(picture)
            .on_press(Message::OpenPhoto(photo.id.clone()))
            .interaction(mouse::Interaction::Pointer),
    );

    if can_delete {
        let delete = button(text("✕").size(typography::CAPTION))
            .padding([spacing::XXS, spacing::XS])
            .style(styles::button_overlay(WHITE, opacity::OVERLAY_MEDIUM, opacity::OVERLAY_STRONG))
            .on_press(Message::RequestDelete(photo.id.clone()));
        layers = layers.push(
            Container::new(delete)
                .width(Length::Fill)
                .align_x(Horizontal::Right)
                .padding(spacing::XS),
        );
    }

    if let Some(owner) = &photo.owner_name {
        layers = layers.push(
            Container::new(
                Container::new(text(owner.as_str()).size(typography::CAPTION))
                    .padding([spacing::XXS, spacing::XS])
                    .style(styles::overlay::indicator(spacing::XS)),
            )
            .width(Length::Fill)
            .height(Length::Fixed(height))
            .align_y(Vertical::Bottom)
            .padding(spacing::XS),
        );
    }

    Container::new(layers)
        .width(Length::Fill)
        .clip(true)
        .style(styles::container::tile)
        .into()
}
