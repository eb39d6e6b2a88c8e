// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! This module handles the `view()` function that renders the current screen
//! based on application state, with the lightbox and toasts layered on top.

use super::{Message, Screen};
use crate::application::gallery as service;
use crate::application::port::GalleryBackend;
use crate::i18n::fluent::I18n;
use crate::media::ImageCache;
use crate::ui::auth;
use crate::ui::design_tokens::typography;
use crate::ui::gallery;
use crate::ui::lightbox;
use crate::ui::notifications::{self, Toast};
use iced::widget::{text, Container, Stack};
use iced::{Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: Screen,
    pub auth: &'a auth::State,
    pub gallery: Option<&'a gallery::State>,
    pub lightbox: &'a lightbox::State,
    pub backend: &'a dyn GalleryBackend,
    pub images: &'a ImageCache,
    pub min_column_width: f32,
    pub notifications: &'a notifications::Manager,
}

/// Renders the current application view based on the active screen.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let current_view: Element<'_, Message> = match (ctx.screen, ctx.gallery) {
        (Screen::Restoring, _) => {
            Container::new(text(ctx.i18n.tr("auth-restoring")).size(typography::BODY))
                .center(Length::Fill)
                .into()
        }
        (Screen::Gallery, Some(gallery)) => view_gallery(&ctx, gallery),
        (Screen::Auth | Screen::Gallery, _) => ctx.auth.view(ctx.i18n).map(Message::Auth),
    };

    Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(current_view)
        .push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification))
        .into()
}

fn view_gallery<'a>(ctx: &ViewContext<'a>, gallery: &'a gallery::State) -> Element<'a, Message> {
    let grid = gallery
        .view(gallery::ViewContext {
            i18n: ctx.i18n,
            backend: ctx.backend,
            images: ctx.images,
            min_column_width: ctx.min_column_width,
        })
        .map(Message::Gallery);

    let photos = gallery.photos();
    let Some(position) = ctx.lightbox.current_index(photos) else {
        return grid;
    };
    let photo = &photos[position];

    let original = ctx.images.peek(&service::original_url(ctx.backend, photo));
    let image = original.or_else(|| ctx.images.peek(&service::thumbnail_url(ctx.backend, photo)));

    let viewer = lightbox::view(
        ctx.lightbox,
        lightbox::ViewContext {
            i18n: ctx.i18n,
            photo,
            position,
            count: photos.len(),
            image,
            is_full_resolution: original.is_some(),
        },
    )
    .map(Message::Lightbox);

    Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(grid)
        .push(viewer)
        .into()
}
