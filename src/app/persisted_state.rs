// SPDX-License-Identifier: MPL-2.0
//! Application state persistence using CBOR format.
//!
//! This module handles state that should survive a restart but is not
//! user-configurable (unlike preferences in `settings.toml`): the signed-in
//! session, the last gallery scope and the last directories used by the
//! file dialogs.
//!
//! # Path Resolution
//!
//! 1. Use `load_from()`/`save_to()` with explicit path override
//! 2. `--data-dir` CLI flag or `ICED_FOLIO_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use super::paths;
use crate::domain::gallery::{RecordId, ViewScope};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

/// Auth token and account id of the last signed-in user.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user_id: String,
}

impl StoredSession {
    #[must_use]
    pub fn new(token: &SecretString, user_id: &RecordId) -> Self {
        Self {
            token: token.expose_secret().to_string(),
            user_id: user_id.as_str().to_string(),
        }
    }

    #[must_use]
    pub fn token(&self) -> SecretString {
        SecretString::from(self.token.clone())
    }

    #[must_use]
    pub fn user_id(&self) -> RecordId {
        RecordId::new(self.user_id.clone())
    }
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Serializable form of [`ViewScope`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StoredScope {
    All,
    User(String),
}

impl From<&ViewScope> for StoredScope {
    fn from(scope: &ViewScope) -> Self {
        match scope {
            ViewScope::All => StoredScope::All,
            ViewScope::User(id) => StoredScope::User(id.as_str().to_string()),
        }
    }
}

impl From<StoredScope> for ViewScope {
    fn from(scope: StoredScope) -> Self {
        match scope {
            StoredScope::All => ViewScope::All,
            StoredScope::User(id) => ViewScope::User(RecordId::new(id)),
        }
    }
}

/// Application state that persists across sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    /// Session restored on startup; cleared on logout.
    #[serde(default)]
    pub session: Option<StoredSession>,

    /// Gallery scope that was active when the app was closed.
    #[serde(default)]
    pub last_scope: Option<StoredScope>,

    /// Initial directory of the upload / avatar pickers.
    #[serde(default)]
    pub last_open_directory: Option<PathBuf>,

    /// Initial directory of the download save dialog.
    #[serde(default)]
    pub last_save_directory: Option<PathBuf>,
}

impl AppState {
    /// Loads application state from the default location.
    ///
    /// Returns a tuple of (state, optional_warning). If loading fails, returns
    /// default state with the i18n key of a warning to show.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads application state from a custom directory.
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return (Self::default(), None);
        };

        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => {
                let reader = BufReader::new(file);
                match ciborium::from_reader(reader) {
                    Ok(state) => (state, None),
                    Err(err) => {
                        tracing::warn!(%err, "discarding unreadable state file");
                        (
                            Self::default(),
                            Some("notification-state-parse-error".to_string()),
                        )
                    }
                }
            }
            Err(err) => {
                tracing::warn!(%err, "cannot open state file");
                (
                    Self::default(),
                    Some("notification-state-read-error".to_string()),
                )
            }
        }
    }

    /// Saves application state to the default location.
    ///
    /// Returns the i18n key of a warning if the save failed.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves application state to a custom directory.
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return Some("notification-state-path-error".to_string());
        };

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-state-dir-error".to_string());
            }
        }

        match fs::File::create(&path) {
            Ok(file) => {
                let writer = BufWriter::new(file);
                if let Err(err) = ciborium::into_writer(self, writer) {
                    tracing::warn!(%err, "cannot write state file");
                    return Some("notification-state-write-error".to_string());
                }
                None
            }
            Err(_) => Some("notification-state-create-error".to_string()),
        }
    }

    fn state_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(STATE_FILE);
            path
        })
    }

    /// Forgets the session and the scope that belonged to it.
    pub fn clear_session(&mut self) {
        self.session = None;
        self.last_scope = None;
    }

    /// Remembers the directory containing `file_path` for the next picker.
    pub fn set_last_open_directory_from_file(&mut self, file_path: &Path) {
        if let Some(parent) = file_path.parent() {
            self.last_open_directory = Some(parent.to_path_buf());
        }
    }

    /// Remembers the directory containing `file_path` for the next save dialog.
    pub fn set_last_save_directory_from_file(&mut self, file_path: &Path) {
        if let Some(parent) = file_path.parent() {
            self.last_save_directory = Some(parent.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn signed_in() -> AppState {
        AppState {
            session: Some(StoredSession {
                token: "tok-123".to_string(),
                user_id: "ana".to_string(),
            }),
            last_scope: Some(StoredScope::All),
            last_open_directory: Some(PathBuf::from("/home/ana/pictures")),
            last_save_directory: None,
        }
    }

    #[test]
    fn default_state_has_no_session() {
        let state = AppState::default();
        assert!(state.session.is_none());
        assert!(state.last_scope.is_none());
    }

    #[test]
    fn save_to_and_load_from_custom_directory() {
        let temp_dir = tempdir().expect("create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        let original = signed_in();

        assert!(original.save_to(Some(base_dir.clone())).is_none());
        assert!(base_dir.join(STATE_FILE).exists());

        let (loaded, warning) = AppState::load_from(Some(base_dir));
        assert!(warning.is_none());
        assert_eq!(original, loaded);
    }

    #[test]
    fn load_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("create temp dir");
        let (state, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none());
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn load_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        fs::write(base_dir.join(STATE_FILE), "not valid cbor data").expect("write file");

        let (state, warning) = AppState::load_from(Some(base_dir));
        assert_eq!(warning.as_deref(), Some("notification-state-parse-error"));
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp_dir = tempdir().expect("create temp dir");
        let nested_dir = temp_dir.path().join("nested").join("deeply");

        assert!(signed_in().save_to(Some(nested_dir.clone())).is_none());
        assert!(nested_dir.join(STATE_FILE).exists());
    }

    #[test]
    fn clear_session_drops_scope_too() {
        let mut state = signed_in();
        state.clear_session();
        assert!(state.session.is_none());
        assert!(state.last_scope.is_none());
        assert!(state.last_open_directory.is_some());
    }

    #[test]
    fn stored_scope_converts_both_ways() {
        let scope = ViewScope::User(RecordId::new("bob"));
        let stored = StoredScope::from(&scope);
        assert_eq!(stored, StoredScope::User("bob".to_string()));
        assert_eq!(ViewScope::from(stored), scope);
        assert_eq!(ViewScope::from(StoredScope::All), ViewScope::All);
    }

    #[test]
    fn stored_session_debug_hides_token() {
        let session = StoredSession::new(&SecretString::from("s3cret"), &RecordId::new("ana"));
        let printed = format!("{session:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("ana"));
        assert_eq!(session.token().expose_secret(), "s3cret");
    }

    #[test]
    fn set_last_open_directory_extracts_parent() {
        let mut state = AppState::default();
        state.set_last_open_directory_from_file(Path::new("/home/ana/photos/beach.jpg"));
        assert_eq!(
            state.last_open_directory,
            Some(PathBuf::from("/home/ana/photos"))
        );
    }

    #[test]
    fn set_last_save_directory_ignores_root() {
        let mut state = AppState::default();
        state.set_last_save_directory_from_file(Path::new("/"));
        assert!(state.last_save_directory.is_none());
    }
}
