// SPDX-License-Identifier: MPL-2.0
//! PocketBase adapter for the [`GalleryBackend`] port.
//!
//! Speaks the PocketBase REST API over `reqwest`:
//!
//! - `POST   /api/collections/users/auth-with-password`
//! - `GET    /api/collections/{c}/records?page=&perPage=&sort=&filter=&expand=`
//! - `GET    /api/collections/{c}/records/{id}`
//! - `POST   /api/collections/{c}/records` (JSON or multipart)
//! - `PATCH  /api/collections/{c}/records/{id}`
//! - `DELETE /api/collections/{c}/records/{id}`
//! - files at `/api/files/{collectionId}/{recordId}/{filename}?thumb=WxH`
//!
//! Once authenticated, every request carries `Authorization: <token>`.

pub mod filter;
pub mod records;

use crate::application::port::{
    BackendError, BackendFuture, BackendResult, GalleryBackend, ListQuery, NewUser, Page,
    Session, Thumb, Upload, UserPatch,
};
use crate::domain::gallery::{FileOwner, Photo, RecordId, User};
use futures_util::FutureExt;
use records::{ApiErrorBody, AuthResponse, ListResponse, PhotoRecord, UserPatchBody, UserRecord};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub const USERS: &str = "users";
pub const PHOTOS: &str = "photos";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// PocketBase HTTP client.
///
/// Constructed once and shared behind an `Arc`; it holds the auth token of
/// the signed-in user.
pub struct PocketBase {
    base: Url,
    http: Client,
    token: Arc<RwLock<Option<SecretString>>>,
}

impl PocketBase {
    /// Creates a client for the instance at `base_url`.
    pub fn new(base_url: &str) -> BackendResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|err| BackendError::Transport(format!("invalid server URL {base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::Transport(format!(
                "invalid server URL {base_url}"
            )));
        }
        let http = Client::builder()
            .user_agent(concat!("IcedFolio/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Ok(Self {
            base,
            http,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Base URL with `segments` appended to its path.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn records_url(&self, collection: &str, id: Option<&RecordId>) -> Url {
        match id {
            Some(id) => self.endpoint(&["api", "collections", collection, "records", id.as_str()]),
            None => self.endpoint(&["api", "collections", collection, "records"]),
        }
    }

    /// Records URL with the list query encoded as query parameters.
    fn list_url(&self, collection: &str, query: &ListQuery) -> Url {
        let mut url = self.records_url(collection, None);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("perPage", &query.per_page.to_string());
            if let Some(sort) = &query.sort {
                pairs.append_pair("sort", sort);
            }
            if let Some(filter) = &query.filter {
                pairs.append_pair("filter", &filter::render(filter));
            }
            if let Some(expand) = &query.expand {
                pairs.append_pair("expand", expand);
            }
        }
        url
    }

    fn current_token(&self) -> Option<SecretString> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Request builder carrying the auth header when signed in.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.current_token() {
            Some(token) => builder.header(AUTHORIZATION, token.expose_secret()),
            None => builder,
        }
    }

    fn image_part(upload: Upload) -> BackendResult<Part> {
        let mime = upload.mime_type();
        Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(mime)
            .map_err(|err| BackendError::File(err.to_string()))
    }
}

fn store_token(slot: &RwLock<Option<SecretString>>, token: Option<SecretString>) {
    match slot.write() {
        Ok(mut guard) => *guard = token,
        Err(poisoned) => *poisoned.into_inner() = token,
    }
}

// =============================================================================
// Response handling
// =============================================================================

async fn send(request: RequestBuilder) -> BackendResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|err| BackendError::Transport(err.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ApiErrorBody>(&body)
        .unwrap_or_default()
        .message;
    tracing::warn!(status = status.as_u16(), %message, "backend request rejected");
    Err(BackendError::from_status(status.as_u16(), message))
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> BackendResult<T> {
    let response = send(request).await?;
    let body = response
        .bytes()
        .await
        .map_err(|err| BackendError::Transport(err.to_string()))?;
    serde_json::from_slice(&body).map_err(|err| BackendError::Decode(err.to_string()))
}

// =============================================================================
// Port implementation
// =============================================================================

impl GalleryBackend for PocketBase {
    fn authenticate(&self, email: &str, password: &SecretString) -> BackendFuture<Session> {
        let url = self.endpoint(&["api", "collections", USERS, "auth-with-password"]);
        let body = serde_json::json!({
            "identity": email,
            "password": password.expose_secret(),
        });
        // Sign in anonymously even if a stale token is still around.
        let request = self.http.post(url).json(&body);
        let slot = Arc::clone(&self.token);
        async move {
            let auth: AuthResponse = send_json(request).await?;
            let token = SecretString::from(auth.token);
            store_token(&slot, Some(token.clone()));
            Ok(Session {
                token,
                user: User::from(auth.record),
            })
        }
        .boxed()
    }

    fn set_token(&self, token: Option<SecretString>) {
        store_token(&self.token, token);
    }

    fn create_user(&self, new_user: NewUser) -> BackendFuture<User> {
        let mut body = serde_json::json!({
            "email": new_user.email,
            "password": new_user.password.expose_secret(),
            "passwordConfirm": new_user.password_confirm.expose_secret(),
        });
        if let Some(name) = new_user.name {
            body["name"] = serde_json::Value::String(name);
        }
        let request = self
            .request(Method::POST, self.records_url(USERS, None))
            .json(&body);
        async move {
            let record: UserRecord = send_json(request).await?;
            Ok(User::from(record))
        }
        .boxed()
    }

    fn get_user(&self, id: &RecordId) -> BackendFuture<User> {
        let request = self.request(Method::GET, self.records_url(USERS, Some(id)));
        async move {
            let record: UserRecord = send_json(request).await?;
            Ok(User::from(record))
        }
        .boxed()
    }

    fn list_users(&self, query: ListQuery) -> BackendFuture<Page<User>> {
        let request = self.request(Method::GET, self.list_url(USERS, &query));
        async move {
            let list: ListResponse<UserRecord> = send_json(request).await?;
            Ok(list.into_page(User::from))
        }
        .boxed()
    }

    fn list_photos(&self, query: ListQuery) -> BackendFuture<Page<Photo>> {
        let request = self.request(Method::GET, self.list_url(PHOTOS, &query));
        async move {
            let list: ListResponse<PhotoRecord> = send_json(request).await?;
            Ok(list.into_page(Photo::from))
        }
        .boxed()
    }

    fn create_photo(&self, owner: &RecordId, upload: Upload) -> BackendFuture<Photo> {
        let part = match Self::image_part(upload) {
            Ok(part) => part,
            Err(err) => return async move { Err(err) }.boxed(),
        };
        let form = Form::new()
            .text("owner", owner.as_str().to_string())
            .part("image", part);
        let request = self
            .request(Method::POST, self.records_url(PHOTOS, None))
            .multipart(form);
        async move {
            let record: PhotoRecord = send_json(request).await?;
            Ok(Photo::from(record))
        }
        .boxed()
    }

    fn delete_photo(&self, id: &RecordId) -> BackendFuture<()> {
        let request = self.request(Method::DELETE, self.records_url(PHOTOS, Some(id)));
        async move {
            send(request).await?;
            Ok(())
        }
        .boxed()
    }

    fn update_user(&self, id: &RecordId, patch: UserPatch) -> BackendFuture<User> {
        let body = UserPatchBody {
            name: patch.name.as_deref(),
            public: patch.public,
        };
        let request = self
            .request(Method::PATCH, self.records_url(USERS, Some(id)))
            .json(&body);
        async move {
            let record: UserRecord = send_json(request).await?;
            Ok(User::from(record))
        }
        .boxed()
    }

    fn upload_avatar(&self, id: &RecordId, upload: Upload) -> BackendFuture<User> {
        let part = match Self::image_part(upload) {
            Ok(part) => part,
            Err(err) => return async move { Err(err) }.boxed(),
        };
        let request = self
            .request(Method::PATCH, self.records_url(USERS, Some(id)))
            .multipart(Form::new().part("avatar", part));
        async move {
            let record: UserRecord = send_json(request).await?;
            Ok(User::from(record))
        }
        .boxed()
    }

    fn file_url(&self, owner: &dyn FileOwner, filename: &str, thumb: Option<Thumb>) -> String {
        let mut url = self.endpoint(&[
            "api",
            "files",
            owner.collection().path_segment(),
            owner.record_id().as_str(),
            filename,
        ]);
        if let Some(thumb) = thumb {
            url.query_pairs_mut()
                .append_pair("thumb", &thumb.to_string());
        }
        url.to_string()
    }

    fn fetch_file(&self, url: &str) -> BackendFuture<Vec<u8>> {
        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(err) => {
                let err = BackendError::Transport(format!("invalid file URL: {err}"));
                return async move { Err(err) }.boxed();
            }
        };
        let request = self.request(Method::GET, url);
        async move {
            let response = send(request).await?;
            let bytes = response
                .bytes()
                .await
                .map_err(|err| BackendError::Transport(err.to_string()))?;
            Ok(bytes.to_vec())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gallery::types::fixtures::{photo, user};
    use crate::domain::gallery::Filter;

    fn client() -> PocketBase {
        PocketBase::new("http://127.0.0.1:8090").expect("valid base url")
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(PocketBase::new("not a url").is_err());
        assert!(PocketBase::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn record_urls() {
        let pb = client();
        assert_eq!(
            pb.records_url(PHOTOS, None).as_str(),
            "http://127.0.0.1:8090/api/collections/photos/records"
        );
        assert_eq!(
            pb.records_url(USERS, Some(&RecordId::new("u1"))).as_str(),
            "http://127.0.0.1:8090/api/collections/users/records/u1"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let pb = PocketBase::new("https://example.com/pb/").expect("valid base url");
        assert_eq!(
            pb.records_url(PHOTOS, None).as_str(),
            "https://example.com/pb/api/collections/photos/records"
        );
    }

    #[test]
    fn list_url_encodes_query() {
        let pb = client();
        let query = ListQuery::first_page(50)
            .sort("-created")
            .expand("owner")
            .filter(Some(Filter::eq_text("owner", "u1")));
        let url = pb.list_url(PHOTOS, &query);
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "1".to_string()),
                ("perPage".to_string(), "50".to_string()),
                ("sort".to_string(), "-created".to_string()),
                ("filter".to_string(), r#"owner = "u1""#.to_string()),
                ("expand".to_string(), "owner".to_string()),
            ]
        );
    }

    #[test]
    fn list_url_without_filter_omits_param() {
        let url = client().list_url(USERS, &ListQuery::first_page(100));
        assert_eq!(url.query(), Some("page=1&perPage=100"));
    }

    #[test]
    fn file_url_with_and_without_thumb() {
        let pb = client();
        let p = photo("p1", "u1");
        assert_eq!(
            pb.file_url(&p, &p.image, None),
            "http://127.0.0.1:8090/api/files/pbc_photos/p1/p1.jpg"
        );
        assert_eq!(
            pb.file_url(&p, &p.image, Some(Thumb::width(480))),
            "http://127.0.0.1:8090/api/files/pbc_photos/p1/p1.jpg?thumb=480x0"
        );
    }

    #[test]
    fn avatar_url_uses_user_collection() {
        let pb = client();
        let u = user("u1");
        assert_eq!(
            pb.file_url(&u, "me.png", Some(Thumb { width: 100, height: 100 })),
            "http://127.0.0.1:8090/api/files/_pb_users_auth_/u1/me.png?thumb=100x100"
        );
    }

    #[test]
    fn token_is_stored_and_cleared() {
        let pb = client();
        assert!(pb.current_token().is_none());
        pb.set_token(Some(SecretString::from("abc")));
        assert_eq!(
            pb.current_token().map(|t| t.expose_secret().to_string()),
            Some("abc".to_string())
        );
        pb.set_token(None);
        assert!(pb.current_token().is_none());
    }

    #[test]
    fn requests_carry_auth_header_once_signed_in() {
        let pb = client();
        let anonymous = pb
            .request(Method::GET, pb.records_url(USERS, None))
            .build()
            .expect("request");
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());

        pb.set_token(Some(SecretString::from("tok")));
        let signed = pb
            .request(Method::GET, pb.records_url(USERS, None))
            .build()
            .expect("request");
        assert_eq!(
            signed.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("tok")
        );
    }
}
