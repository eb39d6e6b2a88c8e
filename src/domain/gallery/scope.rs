// SPDX-License-Identifier: MPL-2.0
//! Whose photos the grid shows, and the visibility rules that follow.

use super::filter::Filter;
use super::types::{RecordId, User};

/// Selection made in the gallery's user dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewScope {
    /// Photos of one user (the viewer themself included).
    User(RecordId),
    /// Every photo the viewer is allowed to see.
    All,
}

/// Heading shown on the user dropdown button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryTitle {
    Mine,
    All,
    /// Another user's gallery, by display name.
    User(String),
    /// Another user's gallery, but the user never set a name.
    Unnamed,
    /// The viewed user is not in the loaded user list.
    Unknown,
}

impl ViewScope {
    /// The scope a freshly signed-in viewer starts in.
    #[must_use]
    pub fn own(viewer: &User) -> Self {
        Self::User(viewer.id.clone())
    }

    #[must_use]
    pub fn is_own(&self, viewer: &User) -> bool {
        matches!(self, Self::User(id) if *id == viewer.id)
    }

    /// Photo filter for this scope.
    ///
    /// Returns `None` when no restriction applies (an administrator viewing
    /// everything).
    #[must_use]
    pub fn photo_filter(&self, viewer: &User) -> Option<Filter> {
        match self {
            Self::User(id) => Some(Filter::eq_text("owner", id.as_str())),
            Self::All if viewer.is_admin() => None,
            Self::All => Some(
                Filter::eq_bool("owner.public", true)
                    .or(Filter::eq_text("owner", viewer.id.as_str())),
            ),
        }
    }

    /// Owner assigned to uploads made while this scope is active.
    ///
    /// Administrators upload on behalf of the user they are viewing; everyone
    /// else always uploads to their own gallery.
    #[must_use]
    pub fn upload_owner(&self, viewer: &User) -> RecordId {
        match self {
            Self::User(id) if viewer.is_admin() => id.clone(),
            _ => viewer.id.clone(),
        }
    }

    #[must_use]
    pub fn title(&self, viewer: &User, users: &[User]) -> GalleryTitle {
        match self {
            Self::User(id) if *id == viewer.id => GalleryTitle::Mine,
            Self::All => GalleryTitle::All,
            Self::User(id) => match users.iter().find(|u| u.id == *id) {
                Some(user) if user.name.trim().is_empty() => GalleryTitle::Unnamed,
                Some(user) => GalleryTitle::User(user.name.clone()),
                None => GalleryTitle::Unknown,
            },
        }
    }
}

/// Filter applied to the user list: non-administrators only see public profiles.
#[must_use]
pub fn users_filter(viewer: &User) -> Option<Filter> {
    if viewer.is_admin() {
        None
    } else {
        Some(Filter::eq_bool("public", true))
    }
}

/// Ensures the viewer appears in the dropdown even when their own profile
/// is private (and therefore filtered out of the listing).
#[must_use]
pub fn include_viewer(mut users: Vec<User>, viewer: &User) -> Vec<User> {
    if !users.iter().any(|u| u.id == viewer.id) {
        users.insert(0, viewer.clone());
    }
    users
}
