// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[server]` - Backend address
//! - `[lightbox]` - Swipe, zoom and fullscreen tuning
//! - `[grid]` - Masonry layout and page sizes
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. `--config-dir` CLI flag or `ICED_FOLIO_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_folio::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.server.url = Some("https://photos.example.com".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::lightbox::SwipeThreshold;
use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the PocketBase instance.
    #[serde(default = "default_server_url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

impl ServerConfig {
    /// Effective backend URL, trailing slashes removed.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_SERVER_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Lightbox gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LightboxConfig {
    /// Swipe score (`|offset| × velocity`) needed to page or close.
    #[serde(
        default = "default_swipe_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub swipe_threshold: Option<f32>,

    /// Downward drag that closes regardless of velocity (px).
    #[serde(
        default = "default_close_distance",
        skip_serializing_if = "Option::is_none"
    )]
    pub close_distance: Option<f32>,

    /// Downward drag that closes when combined with a decisive flick (px).
    #[serde(
        default = "default_close_distance_with_velocity",
        skip_serializing_if = "Option::is_none"
    )]
    pub close_distance_with_velocity: Option<f32>,

    /// Delay before the selection is cleared after closing (ms).
    #[serde(
        default = "default_close_delay_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub close_delay_ms: Option<u64>,

    /// Scale change per mouse wheel notch.
    #[serde(default = "default_wheel_step", skip_serializing_if = "Option::is_none")]
    pub wheel_step: Option<f32>,

    /// Widest window (logical px) that goes fullscreen on open.
    #[serde(
        default = "default_fullscreen_max_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub fullscreen_max_width: Option<f32>,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: default_swipe_threshold(),
            close_distance: default_close_distance(),
            close_distance_with_velocity: default_close_distance_with_velocity(),
            close_delay_ms: default_close_delay_ms(),
            wheel_step: default_wheel_step(),
            fullscreen_max_width: default_fullscreen_max_width(),
        }
    }
}

impl LightboxConfig {
    #[must_use]
    pub fn swipe_threshold(&self) -> SwipeThreshold {
        SwipeThreshold::new(
            self.swipe_threshold
                .unwrap_or(DEFAULT_SWIPE_THRESHOLD)
                .clamp(MIN_SWIPE_THRESHOLD, MAX_SWIPE_THRESHOLD),
        )
    }

    #[must_use]
    pub fn close_distance(&self) -> f32 {
        self.close_distance.unwrap_or(DEFAULT_CLOSE_DISTANCE).max(0.0)
    }

    #[must_use]
    pub fn close_distance_with_velocity(&self) -> f32 {
        self.close_distance_with_velocity
            .unwrap_or(DEFAULT_CLOSE_DISTANCE_WITH_VELOCITY)
            .max(0.0)
    }

    #[must_use]
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms.unwrap_or(DEFAULT_CLOSE_DELAY_MS))
    }

    #[must_use]
    pub fn wheel_step(&self) -> f32 {
        self.wheel_step
            .unwrap_or(DEFAULT_WHEEL_STEP)
            .clamp(MIN_WHEEL_STEP, MAX_WHEEL_STEP)
    }

    #[must_use]
    pub fn fullscreen_max_width(&self) -> f32 {
        self.fullscreen_max_width
            .unwrap_or(DEFAULT_FULLSCREEN_MAX_WIDTH)
    }
}

/// Gallery grid settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    /// Narrowest masonry column (px).
    #[serde(
        default = "default_min_column_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_column_width: Option<f32>,

    /// Photos fetched per gallery load.
    #[serde(
        default = "default_photos_per_page",
        skip_serializing_if = "Option::is_none"
    )]
    pub photos_per_page: Option<u32>,

    /// Users fetched for the dropdown.
    #[serde(
        default = "default_users_per_page",
        skip_serializing_if = "Option::is_none"
    )]
    pub users_per_page: Option<u32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_column_width: default_min_column_width(),
            photos_per_page: default_photos_per_page(),
            users_per_page: default_users_per_page(),
        }
    }
}

impl GridConfig {
    #[must_use]
    pub fn min_column_width(&self) -> f32 {
        self.min_column_width
            .unwrap_or(DEFAULT_MIN_COLUMN_WIDTH)
            .max(1.0)
    }

    #[must_use]
    pub fn photos_per_page(&self) -> u32 {
        self.photos_per_page.unwrap_or(DEFAULT_PHOTOS_PER_PAGE).max(1)
    }

    #[must_use]
    pub fn users_per_page(&self) -> u32 {
        self.users_per_page.unwrap_or(DEFAULT_USERS_PER_PAGE).max(1)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub lightbox: LightboxConfig,

    #[serde(default)]
    pub grid: GridConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_server_url() -> Option<String> {
    Some(DEFAULT_SERVER_URL.to_string())
}

fn default_swipe_threshold() -> Option<f32> {
    Some(DEFAULT_SWIPE_THRESHOLD)
}

fn default_close_distance() -> Option<f32> {
    Some(DEFAULT_CLOSE_DISTANCE)
}

fn default_close_distance_with_velocity() -> Option<f32> {
    Some(DEFAULT_CLOSE_DISTANCE_WITH_VELOCITY)
}

fn default_close_delay_ms() -> Option<u64> {
    Some(DEFAULT_CLOSE_DELAY_MS)
}

fn default_wheel_step() -> Option<f32> {
    Some(DEFAULT_WHEEL_STEP)
}

fn default_fullscreen_max_width() -> Option<f32> {
    Some(DEFAULT_FULLSCREEN_MAX_WIDTH)
}

fn default_min_column_width() -> Option<f32> {
    Some(DEFAULT_MIN_COLUMN_WIDTH)
}

fn default_photos_per_page() -> Option<u32> {
    Some(DEFAULT_PHOTOS_PER_PAGE)
}

fn default_users_per_page() -> Option<u32> {
    Some(DEFAULT_USERS_PER_PAGE)
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning to show.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "falling back to default settings");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
