// SPDX-License-Identifier: MPL-2.0
//! Gallery backend port.
//!
//! The backend owns accounts, photos and their files. Adapters (see
//! `infrastructure::pocketbase`) speak its wire protocol; the rest of the
//! application only sees domain records.
//!
//! Methods return boxed `'static` futures so callers can hand them straight
//! to `Task::perform` without borrowing the backend.

use crate::domain::gallery::{FileOwner, Filter, Photo, RecordId, User};
use futures_util::future::BoxFuture;
use secrecy::SecretString;
use std::fmt;
use std::path::Path;

// =============================================================================
// BackendError
// =============================================================================

/// Errors returned by a gallery backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    Transport(String),

    /// Missing, expired or rejected credentials (HTTP 401/403).
    Unauthorized,

    /// The record does not exist or is not visible to the caller (HTTP 404).
    NotFound,

    /// Any other non-success status, with the server's message if it sent one.
    Status { code: u16, message: String },

    /// The response body did not match the expected shape.
    Decode(String),

    /// A local file could not be read for upload.
    File(String),
}

impl BackendError {
    /// Maps an HTTP status and server message to an error variant.
    #[must_use]
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => BackendError::Unauthorized,
            404 => BackendError::NotFound,
            _ => BackendError::Status {
                code,
                message: message.into(),
            },
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(msg) => write!(f, "Request failed: {msg}"),
            BackendError::Unauthorized => write!(f, "Not authorized"),
            BackendError::NotFound => write!(f, "Record not found"),
            BackendError::Status { code, message } if message.is_empty() => {
                write!(f, "Server returned {code}")
            }
            BackendError::Status { code, message } => {
                write!(f, "Server returned {code}: {message}")
            }
            BackendError::Decode(msg) => write!(f, "Unexpected response: {msg}"),
            BackendError::File(msg) => write!(f, "Cannot read file: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Boxed future returned by every port method.
pub type BackendFuture<T> = BoxFuture<'static, BackendResult<T>>;

// =============================================================================
// Requests
// =============================================================================

/// Paging, sorting, filtering and relation expansion for list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    /// Sort expression, `-field` for descending.
    pub sort: Option<String>,
    pub filter: Option<Filter>,
    /// Relation fields to expand inline.
    pub expand: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn first_page(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            sort: None,
            filter: None,
            expand: None,
        }
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }
}

/// One page of a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u32,
}

/// Signup payload.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    /// Display name; omitted from the request when empty.
    pub name: Option<String>,
    pub password: SecretString,
    pub password_confirm: SecretString,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub public: Option<bool>,
}

/// Extensions offered by the photo and avatar pickers.
pub const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// A file to upload as multipart form data.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a local file for upload.
    pub async fn read(path: &Path) -> BackendResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| BackendError::File(format!("{}: {err}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { file_name, bytes })
    }

    /// MIME type guessed from the file extension.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("tif" | "tiff") => "image/tiff",
            Some("svg") => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Server-side thumbnail size (`0` keeps the aspect ratio on that axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumb {
    pub width: u32,
    pub height: u32,
}

impl Thumb {
    #[must_use]
    pub fn width(width: u32) -> Self {
        Self { width, height: 0 }
    }
}

impl fmt::Display for Thumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated user and the token that proves it.
#[derive(Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user.id)
            .finish()
    }
}

// =============================================================================
// GalleryBackend
// =============================================================================

/// Remote store for accounts and photos.
///
/// Implementations hold the current auth token; once `authenticate` succeeds
/// (or `set_token` is called) every request carries it.
pub trait GalleryBackend: Send + Sync {
    /// Signs in with email and password and remembers the returned token.
    fn authenticate(&self, email: &str, password: &SecretString) -> BackendFuture<Session>;

    /// Installs (or clears) the token used by later requests.
    fn set_token(&self, token: Option<SecretString>);

    /// Creates an account. Does not sign in.
    fn create_user(&self, new_user: NewUser) -> BackendFuture<User>;

    fn get_user(&self, id: &RecordId) -> BackendFuture<User>;

    fn list_users(&self, query: ListQuery) -> BackendFuture<Page<User>>;

    fn list_photos(&self, query: ListQuery) -> BackendFuture<Page<Photo>>;

    /// Uploads an image file as a new photo owned by `owner`.
    fn create_photo(&self, owner: &RecordId, upload: Upload) -> BackendFuture<Photo>;

    fn delete_photo(&self, id: &RecordId) -> BackendFuture<()>;

    fn update_user(&self, id: &RecordId, patch: UserPatch) -> BackendFuture<User>;

    /// Replaces the user's avatar file.
    fn upload_avatar(&self, id: &RecordId, upload: Upload) -> BackendFuture<User>;

    /// Public URL of a file attached to `owner`, optionally as a thumbnail.
    fn file_url(&self, owner: &dyn FileOwner, filename: &str, thumb: Option<Thumb>) -> String;

    /// Downloads the bytes behind a URL produced by [`GalleryBackend::file_url`].
    fn fetch_file(&self, url: &str) -> BackendFuture<Vec<u8>>;
}
