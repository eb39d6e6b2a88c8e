// SPDX-License-Identifier: MPL-2.0
//! Profile panel: avatar, display name, gallery visibility and sign-out.
//!
//! Visibility is applied optimistically. The toggle flips `public` on the
//! viewer at once and remembers the previous value; if the update is
//! rejected that value is put back and an error toast is raised.

use crate::application::gallery;
use crate::application::port::{BackendResult, GalleryBackend};
use crate::domain::gallery::{Subtitle, User};
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::gallery::header::avatar_view;
use crate::ui::notifications::Notification;
use crate::ui::styles;
use iced::alignment::Vertical;
use iced::widget::{button, rule, text, text_input, toggler, Column, Container, Row};
use iced::{Element, Length, Task};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Message {
    NameChanged(String),
    SubmitName,
    NameSaved(BackendResult<User>),
    ToggleVisibility,
    VisibilitySaved(BackendResult<User>),
    ChangeAvatar,
    AvatarPicked(Option<PathBuf>),
    AvatarSaved(BackendResult<User>),
    Logout,
    Close,
}

#[derive(Debug, Clone)]
pub enum Effect {
    None,
    /// The viewer record changed (locally or from the server).
    ViewerChanged,
    Notify(Notification),
    /// Open a file dialog and answer with `AvatarPicked`.
    PickAvatar,
    Logout,
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    name_draft: String,
    /// Previous `public` value while a visibility change is in flight.
    visibility_rollback: Option<bool>,
    is_saving_name: bool,
    is_uploading_avatar: bool,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub viewer: &'a User,
    pub avatar: Option<&'a ImageData>,
}

impl State {
    #[must_use]
    pub fn new(viewer: &User) -> Self {
        Self {
            name_draft: viewer.name.clone(),
            ..Self::default()
        }
    }

    /// Discards an unsaved name edit, e.g. when the panel is reopened.
    pub fn reset_draft(&mut self, viewer: &User) {
        self.name_draft = viewer.name.clone();
    }

    #[must_use]
    pub fn name_draft(&self) -> &str {
        &self.name_draft
    }

    #[must_use]
    pub fn is_visibility_pending(&self) -> bool {
        self.visibility_rollback.is_some()
    }

    /// Flips `viewer.public` and returns the value to send, or `None` while
    /// an earlier toggle is still pending.
    pub fn begin_visibility_toggle(&mut self, viewer: &mut User) -> Option<bool> {
        if self.visibility_rollback.is_some() {
            return None;
        }
        self.visibility_rollback = Some(viewer.public);
        viewer.public = !viewer.public;
        Some(viewer.public)
    }

    /// Applies the server's answer, restoring the previous value on failure.
    pub fn finish_visibility_toggle(
        &mut self,
        viewer: &mut User,
        result: BackendResult<User>,
    ) -> Effect {
        let Some(previous) = self.visibility_rollback.take() else {
            return Effect::None;
        };
        match result {
            Ok(updated) => {
                tracing::info!(public = updated.public, "gallery visibility changed");
                merge_viewer(viewer, updated);
                Effect::ViewerChanged
            }
            Err(err) => {
                tracing::error!(%err, "visibility update failed");
                viewer.public = previous;
                Effect::Notify(Notification::error("profile-visibility-failed"))
            }
        }
    }

    pub fn handle(
        &mut self,
        message: Message,
        viewer: &mut User,
        backend: &Arc<dyn GalleryBackend>,
    ) -> (Effect, Task<Message>) {
        match message {
            Message::NameChanged(name) => {
                self.name_draft = name;
                (Effect::None, Task::none())
            }
            Message::SubmitName => {
                if self.is_saving_name {
                    return (Effect::None, Task::none());
                }
                let Some(patch) = gallery::rename_patch(viewer, &self.name_draft) else {
                    self.name_draft = viewer.name.clone();
                    return (Effect::None, Task::none());
                };
                self.is_saving_name = true;
                let task = Task::perform(
                    gallery::rename(Arc::clone(backend), viewer.id.clone(), patch),
                    Message::NameSaved,
                );
                (Effect::None, task)
            }
            Message::NameSaved(result) => {
                self.is_saving_name = false;
                match result {
                    Ok(updated) => {
                        tracing::info!(user = %updated.id, "display name changed");
                        merge_viewer(viewer, updated);
                        self.name_draft = viewer.name.clone();
                        (Effect::ViewerChanged, Task::none())
                    }
                    Err(err) => {
                        tracing::error!(%err, "rename failed");
                        (
                            Effect::Notify(Notification::error("profile-rename-failed")),
                            Task::none(),
                        )
                    }
                }
            }
            Message::ToggleVisibility => match self.begin_visibility_toggle(viewer) {
                Some(public) => {
                    let task = Task::perform(
                        gallery::set_visibility(Arc::clone(backend), viewer.id.clone(), public),
                        Message::VisibilitySaved,
                    );
                    (Effect::ViewerChanged, task)
                }
                None => (Effect::None, Task::none()),
            },
            Message::VisibilitySaved(result) => {
                let effect = self.finish_visibility_toggle(viewer, result);
                (effect, Task::none())
            }
            Message::ChangeAvatar => {
                if self.is_uploading_avatar {
                    (Effect::None, Task::none())
                } else {
                    (Effect::PickAvatar, Task::none())
                }
            }
            Message::AvatarPicked(None) => (Effect::None, Task::none()),
            Message::AvatarPicked(Some(path)) => {
                self.is_uploading_avatar = true;
                let task = Task::perform(
                    gallery::change_avatar(Arc::clone(backend), viewer.id.clone(), path),
                    Message::AvatarSaved,
                );
                (Effect::None, task)
            }
            Message::AvatarSaved(result) => {
                self.is_uploading_avatar = false;
                match result {
                    Ok(updated) => {
                        tracing::info!(user = %updated.id, "avatar changed");
                        merge_viewer(viewer, updated);
                        (Effect::ViewerChanged, Task::none())
                    }
                    Err(err) => {
                        tracing::error!(%err, "avatar upload failed");
                        (
                            Effect::Notify(Notification::error("profile-avatar-failed")),
                            Task::none(),
                        )
                    }
                }
            }
            Message::Logout => (Effect::Logout, Task::none()),
            Message::Close => (Effect::Close, Task::none()),
        }
    }

    pub fn view<'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let i18n = ctx.i18n;
        let viewer = ctx.viewer;

        let subtitle = match viewer.subtitle() {
            Subtitle::Admin => i18n.tr("profile-subtitle-admin"),
            Subtitle::Title(title) => title,
            Subtitle::Model => i18n.tr("profile-subtitle-model"),
        };

        let avatar_label = if self.is_uploading_avatar {
            i18n.tr("profile-avatar-uploading")
        } else {
            i18n.tr("profile-avatar-change")
        };
        let identity = Row::new()
            .spacing(spacing::MD)
            .align_y(Vertical::Center)
            .push(avatar_view(viewer, ctx.avatar, sizing::AVATAR_LG))
            .push(
                Column::new()
                    .spacing(spacing::XXS)
                    .push(text(viewer.display_name()).size(typography::TITLE_SM))
                    .push(text(subtitle).size(typography::CAPTION))
                    .push(
                        button(text(avatar_label).size(typography::CAPTION))
                            .padding([spacing::XXS, spacing::XS])
                            .style(styles::button::secondary)
                            .on_press_maybe(
                                (!self.is_uploading_avatar).then_some(Message::ChangeAvatar),
                            ),
                    ),
            );

        let name_input = text_input(&i18n.tr("profile-name-placeholder"), &self.name_draft)
            .on_input(Message::NameChanged)
            .on_submit(Message::SubmitName)
            .padding(spacing::XS)
            .size(typography::BODY);
        let save_name = button(text(i18n.tr("profile-name-save")).size(typography::BODY))
            .padding([spacing::XS, spacing::SM])
            .style(styles::button_primary)
            .on_press_maybe((!self.is_saving_name).then_some(Message::SubmitName));
        let name_row = Row::new()
            .spacing(spacing::XS)
            .align_y(Vertical::Center)
            .push(name_input)
            .push(save_name);

        let visibility = toggler(viewer.public)
            .label(i18n.tr("profile-public-gallery"))
            .text_size(typography::BODY)
            .on_toggle_maybe(
                (!self.is_visibility_pending()).then_some(|_| Message::ToggleVisibility),
            );

        let logout = button(text(i18n.tr("profile-logout")).size(typography::BODY))
            .width(Length::Fill)
            .padding([spacing::XS, spacing::SM])
            .style(styles::button::danger)
            .on_press(Message::Logout);

        let content = Column::new()
            .spacing(spacing::MD)
            .push(identity)
            .push(rule::horizontal(1))
            .push(text(i18n.tr("profile-name-label")).size(typography::CAPTION))
            .push(name_row)
            .push(visibility)
            .push(text(i18n.tr("profile-public-hint")).size(typography::CAPTION))
            .push(rule::horizontal(1))
            .push(logout);

        Container::new(content)
            .width(Length::Fixed(sizing::MENU_WIDTH + spacing::XXL))
            .padding(spacing::MD)
            .style(styles::container::panel)
            .into()
    }
}

/// Takes the server copy while keeping fields it does not echo back.
fn merge_viewer(viewer: &mut User, updated: User) {
    let collection = if updated.collection.path_segment().is_empty() {
        viewer.collection.clone()
    } else {
        updated.collection.clone()
    };
    *viewer = User {
        collection,
        ..updated
    };
}
