// SPDX-License-Identifier: MPL-2.0
//! Light/dark theme selection.
//!
//! The gallery follows the system appearance unless the config pins a mode.

use crate::ui::design_tokens::palette;
use iced::theme::Palette;
use iced::Theme;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    /// Returns true if the effective theme is dark.
    /// For System mode, detects the actual system theme.
    #[must_use]
    pub fn is_dark(self) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            // Default to dark on detection error
            ThemeMode::System => !matches!(dark_light::detect(), Ok(dark_light::Mode::Light)),
        }
    }

    /// Iced theme carrying the gallery's brand colors.
    #[must_use]
    pub fn theme(self) -> Theme {
        let palette = if self.is_dark() {
            Palette {
                background: palette::GRAY_900,
                text: palette::GRAY_100,
                primary: palette::PRIMARY_400,
                success: palette::SUCCESS_500,
                warning: palette::WARNING_500,
                danger: palette::ERROR_500,
            }
        } else {
            Palette {
                background: palette::WHITE,
                text: palette::GRAY_900,
                primary: palette::PRIMARY_500,
                success: palette::SUCCESS_500,
                warning: palette::WARNING_500,
                danger: palette::ERROR_600,
            }
        };
        let name = if self.is_dark() { "Folio Dark" } else { "Folio Light" };
        Theme::custom(name.to_string(), palette)
    }
}
