// SPDX-License-Identifier: MPL-2.0
//! Lightbox rendering: backdrop, photo stage and chrome.

use super::component::{Message, State, SCROLLABLE_ID};
use crate::domain::gallery::Photo;
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::ui::design_tokens::{opacity, palette::WHITE, radius, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::wheel_zoom;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::scrollable::{Direction, Scrollbar, Viewport};
use iced::widget::{
    button, mouse_area, responsive, text, Container, Id, Image, Row, Scrollable, Space, Stack,
};
use iced::{mouse, ContentFit, Element, Length, Padding, Size, Vector};
use std::time::Instant;

/// Downward drag distance at which the backdrop is at its faintest.
const BACKDROP_FADE_DISTANCE: f32 = 400.0;

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub photo: &'a Photo,
    /// Zero-based position of `photo` in the sequence.
    pub position: usize,
    pub count: usize,
    /// Best image available so far: the full file, else the grid thumbnail.
    pub image: Option<&'a ImageData>,
    pub is_full_resolution: bool,
}

pub fn view<'a>(state: &'a State, ctx: ViewContext<'a>) -> Element<'a, Message> {
    let stage: Element<'a, Message> = match ctx.image {
        Some(image) => responsive(move |available| stage(state, image, available)).into(),
        None => Container::new(text(ctx.i18n.tr("lightbox-loading")).size(typography::BODY))
            .center(Length::Fill)
            .into(),
    };

    let interaction = if state.is_dragging() {
        mouse::Interaction::Grabbing
    } else if state.zoom().is_zoomed {
        mouse::Interaction::Grab
    } else {
        mouse::Interaction::default()
    };

    let surface = mouse_area(wheel_zoom(stage, Message::Wheel)).interaction(interaction);
    let backdrop = Container::new(surface)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(styles::overlay::backdrop(backdrop_alpha(state.drag_offset())));

    Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(backdrop)
        .push(chrome(&ctx))
        .into()
}

/// Photo at the current zoom. At fitted scale the photo follows the finger and
/// slides in; once scaled it sits in a scrollable that pans.
fn stage<'a>(state: &'a State, image: &'a ImageData, available: Size) -> Element<'a, Message> {
    let scale = state.zoom().scale.value();

    if state.zoom().scale.is_neutral() {
        let offset = Vector::new(
            state.transition_offset(available.width, Instant::now()) + state.drag_offset().x,
            state.drag_offset().y,
        );
        let picture = Image::new(image.handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill);
        return Container::new(picture)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(translation_padding(offset))
            .clip(true)
            .into();
    }

    let fitted = image.fit_size(available);
    let scaled = Size::new(fitted.width * scale, fitted.height * scale);
    let picture = Image::new(image.handle.clone())
        .width(Length::Fixed(scaled.width))
        .height(Length::Fixed(scaled.height));

    Scrollable::new(Container::new(picture).padding(centering_padding(scaled, available)))
        .id(Id::new(SCROLLABLE_ID))
        .width(Length::Fill)
        .height(Length::Fill)
        .direction(Direction::Both {
            vertical: Scrollbar::hidden(),
            horizontal: Scrollbar::hidden(),
        })
        .on_scroll(|viewport: Viewport| Message::ViewportChanged {
            bounds: viewport.bounds(),
            content_bounds: viewport.content_bounds(),
            offset: viewport.absolute_offset(),
        })
        .into()
}

fn chrome<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let counter = Container::new(
        text(format!("{} / {}", ctx.position + 1, ctx.count)).size(typography::CAPTION),
    )
    .padding([spacing::XXS, spacing::XS])
    .style(styles::overlay::indicator(radius::FULL));

    let mut top_bar = Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .push(counter);

    if let Some(owner) = &ctx.photo.owner_name {
        top_bar = top_bar.push(text(owner.clone()).size(typography::BODY_SM));
    }
    if !ctx.is_full_resolution {
        top_bar = top_bar.push(text(ctx.i18n.tr("lightbox-loading")).size(typography::CAPTION));
    }

    top_bar = top_bar
        .push(Space::new().width(Length::Fill))
        .push(chrome_button(ctx.i18n.tr("lightbox-download"), Message::Download))
        .push(chrome_button("✕".to_string(), Message::Close));

    let mut layers = Stack::new().width(Length::Fill).height(Length::Fill).push(
        Container::new(top_bar)
            .width(Length::Fill)
            .padding(spacing::MD)
            .align_y(Vertical::Top),
    );

    if ctx.count > 1 {
        layers = layers
            .push(side_arrow("◀", Message::Previous, Horizontal::Left))
            .push(side_arrow("▶", Message::Next, Horizontal::Right));
    }

    // Transparent layer that only carries the white text color
    Container::new(layers)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(styles::overlay::backdrop(opacity::TRANSPARENT))
        .into()
}

fn chrome_button<'a>(label: String, message: Message) -> Element<'a, Message> {
    button(text(label).size(typography::BODY))
        .padding([spacing::XS, spacing::SM])
        .style(styles::button_overlay(WHITE, opacity::OVERLAY_MEDIUM, opacity::OVERLAY_HOVER))
        .on_press(message)
        .into()
}

fn side_arrow<'a>(glyph: &'a str, message: Message, side: Horizontal) -> Element<'a, Message> {
    let arrow = button(text(glyph).size(typography::TITLE_MD))
        .padding(spacing::SM)
        .style(styles::button_overlay(WHITE, opacity::OVERLAY_SUBTLE, opacity::OVERLAY_STRONG))
        .on_press(message);

    Container::new(arrow)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing::MD)
        .align_x(side)
        .align_y(Vertical::Center)
        .into()
}

/// Padding that shifts centered content by `offset` without resizing its frame.
fn translation_padding(offset: Vector) -> Padding {
    Padding {
        top: offset.y.abs() + offset.y,
        bottom: offset.y.abs() - offset.y,
        left: offset.x.abs() + offset.x,
        right: offset.x.abs() - offset.x,
    }
}

/// Calculate padding to center media within available space.
fn centering_padding(content: Size, available: Size) -> Padding {
    let horizontal = ((available.width - content.width) / 2.0).max(0.0);
    let vertical = ((available.height - content.height) / 2.0).max(0.0);

    Padding {
        top: vertical,
        right: horizontal,
        bottom: vertical,
        left: horizontal,
    }
}

/// Backdrop opacity; fades while the photo is pulled down toward closing.
fn backdrop_alpha(drag_offset: Vector) -> f32 {
    let pulled = (drag_offset.y.max(0.0) / BACKDROP_FADE_DISTANCE).min(1.0);
    opacity::BACKDROP * (1.0 - pulled * opacity::OVERLAY_MEDIUM)
}
