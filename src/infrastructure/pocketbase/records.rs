// SPDX-License-Identifier: MPL-2.0
//! Wire shapes of PocketBase responses and their mapping to domain records.

use crate::application::port::Page;
use crate::domain::gallery::{CollectionRef, Photo, RecordId, User};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET .../records` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_items: u32,
    pub items: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn into_page<U>(self, map: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(map).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
        }
    }
}

/// `auth-with-password` response body.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub record: UserRecord,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub collection_name: String,
    /// Empty when the owner hid their email.
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: RecordId::new(record.id),
            collection: CollectionRef::new(record.collection_id, record.collection_name),
            email: record.email,
            name: record.name,
            avatar: (!record.avatar.is_empty()).then_some(record.avatar),
            verified: record.verified,
            public: record.public,
            title: record.title.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PhotoExpand {
    #[serde(default)]
    pub owner: Option<UserRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub collection_name: String,
    pub image: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub expand: Option<PhotoExpand>,
}

impl From<PhotoRecord> for Photo {
    fn from(record: PhotoRecord) -> Self {
        let created = parse_timestamp(&record.created).unwrap_or_else(|| {
            tracing::debug!(photo = %record.id, raw = %record.created, "unparsable created date");
            DateTime::<Utc>::UNIX_EPOCH
        });
        let owner_name = record
            .expand
            .and_then(|expand| expand.owner)
            .map(|owner| owner.name)
            .filter(|name| !name.trim().is_empty());
        Photo {
            id: RecordId::new(record.id),
            collection: CollectionRef::new(record.collection_id, record.collection_name),
            image: record.image,
            owner: RecordId::new(record.owner),
            owner_name,
            created,
        }
    }
}

/// Parses PocketBase's `2024-05-01 10:20:30.123Z` format, or RFC 3339.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.fZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `PATCH` body for profile edits.
#[derive(Debug, Serialize)]
pub struct UserPatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const PHOTO_LIST: &str = r#"{
        "page": 1,
        "perPage": 50,
        "totalItems": 2,
        "totalPages": 1,
        "items": [
            {
                "id": "p1",
                "collectionId": "pbc_123",
                "collectionName": "photos",
                "image": "beach_a1b2.jpg",
                "owner": "u1",
                "created": "2024-05-01 10:20:30.123Z",
                "updated": "2024-05-01 10:20:30.123Z",
                "expand": {
                    "owner": {
                        "id": "u1",
                        "collectionId": "_pb_users_auth_",
                        "collectionName": "users",
                        "name": "Ana",
                        "avatar": "",
                        "public": true,
                        "verified": false
                    }
                }
            },
            {
                "id": "p2",
                "collectionId": "pbc_123",
                "collectionName": "photos",
                "image": "hills.png",
                "owner": "u2",
                "created": "not a date"
            }
        ]
    }"#;

    #[test]
    fn decodes_photo_list_with_expanded_owner() {
        let response: ListResponse<PhotoRecord> =
            serde_json::from_str(PHOTO_LIST).expect("valid list");
        let page = response.into_page(Photo::from);

        assert_eq!(page.total_items, 2);
        assert_eq!(page.per_page, 50);
        let first = &page.items[0];
        assert_eq!(first.id, RecordId::new("p1"));
        assert_eq!(first.collection.path_segment(), "pbc_123");
        assert_eq!(first.owner_name.as_deref(), Some("Ana"));
        assert_eq!(first.created.year(), 2024);
        assert_eq!(first.created.second(), 30);

        let second = &page.items[1];
        assert_eq!(second.owner_name, None);
        assert_eq!(second.created, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn decodes_auth_response() {
        let body = r#"{
            "token": "eyJhbGciOi",
            "record": {
                "id": "u1",
                "collectionId": "_pb_users_auth_",
                "collectionName": "users",
                "email": "ana@example.com",
                "name": "Ana",
                "avatar": "me_x1.png",
                "verified": true,
                "public": false,
                "title": "  "
            }
        }"#;
        let auth: AuthResponse = serde_json::from_str(body).expect("valid auth");
        let user = User::from(auth.record);
        assert_eq!(auth.token, "eyJhbGciOi");
        assert!(user.is_admin());
        assert_eq!(user.avatar.as_deref(), Some("me_x1.png"));
        assert_eq!(user.title, None);
    }

    #[test]
    fn missing_optional_user_fields_default() {
        let user: UserRecord = serde_json::from_str(r#"{"id": "u9"}"#).expect("minimal user");
        let user = User::from(user);
        assert_eq!(user.email, "");
        assert_eq!(user.avatar, None);
        assert!(!user.public);
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let parsed = parse_timestamp("2024-05-01T10:20:30Z").expect("rfc3339");
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn patch_body_omits_unset_fields() {
        let body = UserPatchBody {
            name: None,
            public: Some(true),
        };
        assert_eq!(
            serde_json::to_string(&body).expect("serialize"),
            r#"{"public":true}"#
        );
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"code": 400}"#).expect("error body");
        assert_eq!(body.message, "");
    }
}
