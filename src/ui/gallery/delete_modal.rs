// SPDX-License-Identifier: MPL-2.0
//! Confirmation dialog shown before a photo is deleted.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, mouse_area, text, Column, Container, Row, Space};
use iced::{mouse, Element, Length};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Cancel,
    Confirm,
    /// Input that landed on the scrim.
    Ignore,
}

/// Card centered over a scrim. Both buttons are disabled while the request
/// is in flight.
pub fn view(i18n: &I18n, is_deleting: bool) -> Element<'_, Message> {
    let cancel = button(text(i18n.tr("delete-modal-cancel")).size(typography::BODY))
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::secondary)
        .on_press_maybe((!is_deleting).then_some(Message::Cancel));

    let confirm_label = if is_deleting {
        i18n.tr("delete-modal-deleting")
    } else {
        i18n.tr("delete-modal-confirm")
    };
    let confirm = button(text(confirm_label).size(typography::BODY))
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::danger)
        .on_press_maybe((!is_deleting).then_some(Message::Confirm));

    let card = Column::new()
        .spacing(spacing::MD)
        .push(text(i18n.tr("delete-modal-title")).size(typography::TITLE_SM))
        .push(text(i18n.tr("delete-modal-body")).size(typography::BODY))
        .push(
            Row::new()
                .spacing(spacing::SM)
                .push(Space::new().width(Length::Fill))
                .push(cancel)
                .push(confirm),
        );

    let card = Container::new(card)
        .width(Length::Fixed(sizing::MODAL_WIDTH))
        .padding(spacing::LG)
        .style(styles::container::panel);

    // Opaque to the pointer so the grid below cannot be clicked.
    mouse_area(
        Container::new(card)
            .center(Length::Fill)
            .style(styles::container::scrim),
    )
    .on_press(Message::Ignore)
    .interaction(mouse::Interaction::Idle)
    .into()
}
