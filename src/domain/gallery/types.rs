// SPDX-License-Identifier: MPL-2.0
//! Gallery records as the client sees them.
//!
//! Records are owned by the backend. The client only ever holds snapshots
//! returned by list/get/create/update calls.

use chrono::{DateTime, Utc};
use std::fmt;

// =============================================================================
// RecordId
// =============================================================================

/// Opaque backend record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// Collection
// =============================================================================

/// The collection a record belongs to, needed to build file URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionRef {
    pub id: String,
    pub name: String,
}

impl CollectionRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Path segment used by the file endpoint: the id when known, else the name.
    #[must_use]
    pub fn path_segment(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// A record that can own files on the backend.
pub trait FileOwner {
    fn record_id(&self) -> &RecordId;
    fn collection(&self) -> &CollectionRef;
}

// =============================================================================
// User
// =============================================================================

/// Account record from the `users` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: RecordId,
    pub collection: CollectionRef,
    pub email: String,
    pub name: String,
    /// Avatar file name, if one was uploaded.
    pub avatar: Option<String>,
    /// Verified accounts act as gallery administrators.
    pub verified: bool,
    /// Whether the profile (and its photos) is visible to other users.
    pub public: bool,
    /// Free-form subtitle shown under the name.
    pub title: Option<String>,
}

/// What to show under a user's name in the profile bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtitle {
    Admin,
    Title(String),
    Model,
}

impl User {
    /// Whether this account has administrator rights.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.verified
    }

    /// Name for menus: the display name, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    #[must_use]
    pub fn subtitle(&self) -> Subtitle {
        if self.verified {
            return Subtitle::Admin;
        }
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => Subtitle::Title(title.to_string()),
            _ => Subtitle::Model,
        }
    }

    /// Whether this user may delete the given photo.
    #[must_use]
    pub fn can_delete(&self, photo: &Photo) -> bool {
        self.verified || photo.owner == self.id
    }
}

impl FileOwner for User {
    fn record_id(&self) -> &RecordId {
        &self.id
    }

    fn collection(&self) -> &CollectionRef {
        &self.collection
    }
}

// =============================================================================
// Photo
// =============================================================================

/// Record from the `photos` collection.
///
/// Immutable from the client's point of view: created by upload, destroyed
/// by delete, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: RecordId,
    pub collection: CollectionRef,
    /// Image file name on the backend.
    pub image: String,
    pub owner: RecordId,
    /// Owner display name when the owner relation was expanded.
    pub owner_name: Option<String>,
    pub created: DateTime<Utc>,
}

impl FileOwner for Photo {
    fn record_id(&self) -> &RecordId {
        &self.id
    }

    fn collection(&self) -> &CollectionRef {
        &self.collection
    }
}

/// Returns the position of the photo with the given id.
#[must_use]
pub fn position_of(photos: &[Photo], id: &RecordId) -> Option<usize> {
    photos.iter().position(|photo| &photo.id == id)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn user(id: &str) -> User {
        User {
            id: RecordId::new(id),
            collection: CollectionRef::new("_pb_users_auth_", "users"),
            email: format!("{id}@example.com"),
            name: id.to_uppercase(),
            avatar: None,
            verified: false,
            public: false,
            title: None,
        }
    }

    pub fn admin(id: &str) -> User {
        User {
            verified: true,
            ..user(id)
        }
    }

    pub fn photo(id: &str, owner: &str) -> Photo {
        Photo {
            id: RecordId::new(id),
            collection: CollectionRef::new("pbc_photos", "photos"),
            image: format!("{id}.jpg"),
            owner: RecordId::new(owner),
            owner_name: None,
            created: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn photos(ids: &[&str]) -> Vec<Photo> {
        ids.iter().map(|id| photo(id, "owner")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let mut u = user("ana");
        u.name = "  ".to_string();
        assert_eq!(u.display_name(), "ana@example.com");
    }

    #[test]
    fn subtitle_prefers_admin_over_title() {
        let mut u = admin("root");
        u.title = Some("Photographer".to_string());
        assert_eq!(u.subtitle(), Subtitle::Admin);

        let mut u = user("ana");
        assert_eq!(u.subtitle(), Subtitle::Model);
        u.title = Some("Photographer".to_string());
        assert_eq!(u.subtitle(), Subtitle::Title("Photographer".to_string()));
    }

    #[test]
    fn owners_and_admins_can_delete() {
        let p = photo("p1", "ana");
        assert!(user("ana").can_delete(&p));
        assert!(!user("bob").can_delete(&p));
        assert!(admin("root").can_delete(&p));
    }

    #[test]
    fn collection_path_segment_prefers_id() {
        assert_eq!(CollectionRef::new("abc", "photos").path_segment(), "abc");
        assert_eq!(CollectionRef::new("", "photos").path_segment(), "photos");
    }

    #[test]
    fn position_of_finds_by_id() {
        let list = photos(&["a", "b", "c"]);
        assert_eq!(position_of(&list, &RecordId::new("c")), Some(2));
        assert_eq!(position_of(&list, &RecordId::new("z")), None);
    }
}
