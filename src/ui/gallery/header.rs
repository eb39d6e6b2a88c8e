// SPDX-License-Identifier: MPL-2.0
//! Gallery header: scope dropdown, upload button and profile bubble.

use crate::domain::gallery::{GalleryTitle, User, ViewScope};
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::alignment::Vertical;
use iced::widget::{button, image, text, Column, Container, Row, Space};
use iced::{ContentFit, Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub viewer: &'a User,
    pub users: &'a [User],
    pub scope: &'a ViewScope,
    pub menu_open: bool,
    pub is_uploading: bool,
    pub viewer_avatar: Option<&'a ImageData>,
}

#[derive(Debug, Clone)]
pub enum Message {
    ToggleMenu,
    SelectScope(ViewScope),
    ToggleProfile,
    Upload,
}

/// Events propagated to the gallery.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    ScopeSelected(ViewScope),
    ProfileToggled,
    UploadRequested,
}

/// Process a header message and return the corresponding event.
pub fn update(message: Message, menu_open: &mut bool) -> Event {
    match message {
        Message::ToggleMenu => {
            *menu_open = !*menu_open;
            Event::None
        }
        Message::SelectScope(scope) => {
            *menu_open = false;
            Event::ScopeSelected(scope)
        }
        Message::ToggleProfile => {
            *menu_open = false;
            Event::ProfileToggled
        }
        Message::Upload => {
            *menu_open = false;
            Event::UploadRequested
        }
    }
}

/// Dropdown label for the scope being viewed.
pub fn title_text(i18n: &I18n, title: &GalleryTitle) -> String {
    match title {
        GalleryTitle::Mine => i18n.tr("gallery-title-mine"),
        GalleryTitle::All => i18n.tr("gallery-title-all"),
        GalleryTitle::User(name) => name.clone(),
        GalleryTitle::Unnamed => i18n.tr("gallery-title-unnamed"),
        GalleryTitle::Unknown => i18n.tr("gallery-title-unknown"),
    }
}

pub fn view<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let title = title_text(ctx.i18n, &ctx.scope.title(ctx.viewer, ctx.users));
    let caret = if ctx.menu_open { "▴" } else { "▾" };
    let scope_button = button(
        Row::new()
            .spacing(spacing::XS)
            .align_y(Vertical::Center)
            .push(text(title).size(typography::TITLE_SM))
            .push(text(caret).size(typography::BODY)),
    )
    .padding([spacing::XS, spacing::SM])
    .style(styles::button::secondary)
    .on_press(Message::ToggleMenu);

    let upload_label = if ctx.is_uploading {
        ctx.i18n.tr("gallery-uploading")
    } else {
        ctx.i18n.tr("gallery-upload")
    };
    let upload_button = button(text(upload_label).size(typography::BODY))
        .padding([spacing::XS, spacing::MD])
        .style(styles::button_primary)
        .on_press_maybe((!ctx.is_uploading).then_some(Message::Upload));

    let bar = Row::new()
        .spacing(spacing::SM)
        .padding([spacing::XS, spacing::MD])
        .align_y(Vertical::Center)
        .push(scope_button)
        .push(Space::new().width(Length::Fill))
        .push(upload_button)
        .push(profile_bubble(ctx.viewer, ctx.viewer_avatar));

    Container::new(bar)
        .width(Length::Fill)
        .height(Length::Fixed(sizing::HEADER_HEIGHT))
        .align_y(Vertical::Center)
        .style(styles::container::header)
        .into()
}

/// Scope choices: everything, then one entry per user with the viewer first.
pub fn menu<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let mut items = Column::new().spacing(spacing::XXS).push(menu_item(
        ctx.i18n.tr("gallery-title-all"),
        ViewScope::All,
        *ctx.scope == ViewScope::All,
    ));

    for user in ctx.users {
        let label = if user.id == ctx.viewer.id {
            ctx.i18n.tr("gallery-title-mine")
        } else {
            user.display_name().to_string()
        };
        let scope = ViewScope::User(user.id.clone());
        let selected = *ctx.scope == scope;
        items = items.push(menu_item(label, scope, selected));
    }

    Container::new(items)
        .width(Length::Fixed(sizing::MENU_WIDTH))
        .padding(spacing::XS)
        .style(styles::container::panel)
        .into()
}

fn menu_item<'a>(label: String, scope: ViewScope, selected: bool) -> Element<'a, Message> {
    let marker = if selected { "•" } else { " " };
    button(
        Row::new()
            .spacing(spacing::XS)
            .push(text(marker).size(typography::BODY))
            .push(text(label).size(typography::BODY)),
    )
    .width(Length::Fill)
    .padding([spacing::XS, spacing::SM])
    .style(styles::button::menu_item)
    .on_press(Message::SelectScope(scope))
    .into()
}

fn profile_bubble<'a>(viewer: &User, avatar: Option<&'a ImageData>) -> Element<'a, Message> {
    button(avatar_view(viewer, avatar, sizing::AVATAR_SM))
        .padding(0.0)
        .style(styles::button::bare)
        .on_press(Message::ToggleProfile)
        .into()
}

/// Round avatar, or the first letter of the user's name when there is no picture.
pub fn avatar_view<'a, M: 'a>(user: &User, avatar: Option<&'a ImageData>, size: f32) -> Element<'a, M> {
    let inner: Element<'a, M> = match avatar {
        Some(data) => image(data.handle.clone())
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .content_fit(ContentFit::Cover)
            .into(),
        None => text(initial(user)).size(size * 0.45).into(),
    };

    Container::new(inner)
        .center(Length::Fixed(size))
        .clip(true)
        .style(styles::container::avatar)
        .into()
}

fn initial(user: &User) -> String {
    user.display_name()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gallery::types::fixtures::user;
    use crate::domain::gallery::RecordId;

    #[test]
    fn toggling_menu_flips_flag() {
        let mut open = false;
        assert_eq!(update(Message::ToggleMenu, &mut open), Event::None);
        assert!(open);
        assert_eq!(update(Message::ToggleMenu, &mut open), Event::None);
        assert!(!open);
    }

    #[test]
    fn selecting_scope_closes_menu() {
        let mut open = true;
        let scope = ViewScope::User(RecordId::new("bob"));
        assert_eq!(
            update(Message::SelectScope(scope.clone()), &mut open),
            Event::ScopeSelected(scope)
        );
        assert!(!open);
    }

    #[test]
    fn upload_and_profile_close_menu() {
        let mut open = true;
        assert_eq!(update(Message::Upload, &mut open), Event::UploadRequested);
        assert!(!open);
        open = true;
        assert_eq!(update(Message::ToggleProfile, &mut open), Event::ProfileToggled);
        assert!(!open);
    }

    #[test]
    fn title_text_resolves_every_variant() {
        let i18n = I18n::new(Some("en-US".to_string()), &crate::config::Config::default());
        assert_eq!(title_text(&i18n, &GalleryTitle::Mine), "My Gallery");
        assert_eq!(title_text(&i18n, &GalleryTitle::All), "All Photos");
        assert_eq!(title_text(&i18n, &GalleryTitle::User("Bob".into())), "Bob");
        assert_eq!(title_text(&i18n, &GalleryTitle::Unnamed), "User");
        assert_eq!(title_text(&i18n, &GalleryTitle::Unknown), "Gallery");
    }

    #[test]
    fn initial_uses_display_name() {
        let mut u = user("ana");
        u.name = "émile".to_string();
        assert_eq!(initial(&u), "É");
        u.name = String::new();
        assert_eq!(initial(&u), "A");
    }
}
