// SPDX-License-Identifier: MPL-2.0
//! Gallery use cases.
//!
//! Each function takes the shared backend by `Arc` and returns an owned
//! future, so the UI can run it with `Task::perform` and map the result to a
//! message. None of them retry.

use crate::application::port::{
    BackendError, BackendResult, GalleryBackend, ListQuery, NewUser, Session, Thumb, Upload,
    UserPatch,
};
use crate::config::{AVATAR_THUMB_WIDTH, DEFAULT_THUMB_WIDTH};
use crate::domain::gallery::{include_viewer, users_filter, Photo, RecordId, User, ViewScope};
use futures_util::future::join_all;
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

/// Newest photos first.
pub const PHOTO_SORT: &str = "-created";

/// Relation expanded on photo listings so the owner's name is available.
pub const PHOTO_EXPAND: &str = "owner";

// =============================================================================
// Session
// =============================================================================

/// Signs in with email and password.
pub async fn login(
    backend: Arc<dyn GalleryBackend>,
    email: String,
    password: SecretString,
) -> BackendResult<Session> {
    let session = backend.authenticate(email.trim(), &password).await?;
    tracing::info!(user = %session.user.id, "signed in");
    Ok(session)
}

/// Signup form contents.
#[derive(Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
}

/// Creates an account, then signs in with it.
pub async fn signup(backend: Arc<dyn GalleryBackend>, form: SignupForm) -> BackendResult<Session> {
    let name = form.name.trim();
    let email = form.email.trim().to_string();
    let new_user = NewUser {
        email: email.clone(),
        name: (!name.is_empty()).then(|| name.to_string()),
        password: form.password.clone(),
        password_confirm: form.password_confirm,
    };

    let created = backend.create_user(new_user).await?;
    tracing::info!(user = %created.id, "account created");
    backend.authenticate(&email, &form.password).await
}

/// Re-validates a stored token by fetching the user it belongs to.
///
/// On failure the token is dropped from the backend so later requests go out
/// anonymous.
pub async fn restore_session(
    backend: Arc<dyn GalleryBackend>,
    token: SecretString,
    user_id: RecordId,
) -> BackendResult<Session> {
    backend.set_token(Some(token.clone()));
    match backend.get_user(&user_id).await {
        Ok(user) => {
            tracing::info!(user = %user.id, "session restored");
            Ok(Session { token, user })
        }
        Err(err) => {
            tracing::warn!(%err, "stored session rejected");
            backend.set_token(None);
            Err(err)
        }
    }
}

/// Forgets the token held by the backend.
pub fn logout(backend: &dyn GalleryBackend) {
    backend.set_token(None);
    tracing::info!("signed out");
}

// =============================================================================
// Listing
// =============================================================================

/// Users for the dropdown, the viewer always included.
pub async fn load_users(
    backend: Arc<dyn GalleryBackend>,
    viewer: User,
    per_page: u32,
) -> BackendResult<Vec<User>> {
    let query = ListQuery::first_page(per_page).filter(users_filter(&viewer));
    let page = backend.list_users(query).await?;
    tracing::debug!(count = page.items.len(), "users loaded");
    Ok(include_viewer(page.items, &viewer))
}

/// Photos visible in `scope`, newest first.
pub async fn load_photos(
    backend: Arc<dyn GalleryBackend>,
    viewer: User,
    scope: ViewScope,
    per_page: u32,
) -> BackendResult<Vec<Photo>> {
    let query = ListQuery::first_page(per_page)
        .sort(PHOTO_SORT)
        .expand(PHOTO_EXPAND)
        .filter(scope.photo_filter(&viewer));
    let page = backend.list_photos(query).await?;
    tracing::debug!(count = page.items.len(), ?scope, "photos loaded");
    Ok(page.items)
}

// =============================================================================
// Uploads and deletion
// =============================================================================

/// Result of a batch upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOutcome {
    /// Created photos, in the order the files were picked.
    pub uploaded: Vec<Photo>,
    /// Files that could not be read or were rejected.
    pub failed: usize,
}

impl UploadOutcome {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Uploads every file concurrently as a photo owned by `owner`.
pub async fn upload_photos(
    backend: Arc<dyn GalleryBackend>,
    owner: RecordId,
    files: Vec<PathBuf>,
) -> UploadOutcome {
    let uploads = files.into_iter().map(|path| {
        let backend = Arc::clone(&backend);
        let owner = owner.clone();
        async move {
            let upload = Upload::read(&path).await?;
            backend.create_photo(&owner, upload).await
        }
    });

    let mut outcome = UploadOutcome::default();
    for result in join_all(uploads).await {
        match result {
            Ok(photo) => outcome.uploaded.push(photo),
            Err(err) => {
                tracing::error!(%err, "upload failed");
                outcome.failed += 1;
            }
        }
    }
    tracing::info!(
        uploaded = outcome.uploaded.len(),
        failed = outcome.failed,
        %owner,
        "upload batch finished"
    );
    outcome
}

/// Deletes a photo and returns its id.
pub async fn delete_photo(
    backend: Arc<dyn GalleryBackend>,
    id: RecordId,
) -> BackendResult<RecordId> {
    backend.delete_photo(&id).await?;
    tracing::info!(photo = %id, "photo deleted");
    Ok(id)
}

// =============================================================================
// Profile
// =============================================================================

/// Sends the new visibility flag.
pub async fn set_visibility(
    backend: Arc<dyn GalleryBackend>,
    id: RecordId,
    public: bool,
) -> BackendResult<User> {
    let patch = UserPatch {
        public: Some(public),
        ..UserPatch::default()
    };
    backend.update_user(&id, patch).await
}

/// Builds the rename request, or `None` when there is nothing to send.
#[must_use]
pub fn rename_patch(current: &User, requested: &str) -> Option<UserPatch> {
    let name = requested.trim();
    if name.is_empty() || name == current.name {
        return None;
    }
    Some(UserPatch {
        name: Some(name.to_string()),
        ..UserPatch::default()
    })
}

pub async fn rename(
    backend: Arc<dyn GalleryBackend>,
    id: RecordId,
    patch: UserPatch,
) -> BackendResult<User> {
    backend.update_user(&id, patch).await
}

/// Uploads a new avatar picked from disk.
pub async fn change_avatar(
    backend: Arc<dyn GalleryBackend>,
    id: RecordId,
    file: PathBuf,
) -> BackendResult<User> {
    let upload = Upload::read(&file).await?;
    backend.upload_avatar(&id, upload).await
}

// =============================================================================
// Files
// =============================================================================

/// Grid thumbnail for `photo`.
#[must_use]
pub fn thumbnail_url(backend: &dyn GalleryBackend, photo: &Photo) -> String {
    backend.file_url(photo, &photo.image, Some(Thumb::width(DEFAULT_THUMB_WIDTH)))
}

/// Original file for `photo`, shown in the lightbox and downloaded.
#[must_use]
pub fn original_url(backend: &dyn GalleryBackend, photo: &Photo) -> String {
    backend.file_url(photo, &photo.image, None)
}

/// Small avatar thumbnail, if the user has one.
#[must_use]
pub fn avatar_url(backend: &dyn GalleryBackend, user: &User) -> Option<String> {
    user.avatar
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| backend.file_url(user, name, Some(Thumb::width(AVATAR_THUMB_WIDTH))))
}

/// Fetches the bytes behind a file URL.
pub async fn fetch_image(backend: Arc<dyn GalleryBackend>, url: String) -> BackendResult<Vec<u8>> {
    backend.fetch_file(&url).await
}

/// Downloads a file to `destination` and returns the written path.
pub async fn download(
    backend: Arc<dyn GalleryBackend>,
    url: String,
    destination: PathBuf,
) -> BackendResult<PathBuf> {
    let bytes = backend.fetch_file(&url).await?;
    tokio::fs::write(&destination, bytes)
        .await
        .map_err(|err| BackendError::File(format!("{}: {err}", destination.display())))?;
    tracing::info!(path = %destination.display(), "download saved");
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake::FakeBackend;
    use crate::domain::gallery::types::fixtures::{admin, photo, user};
    use crate::domain::gallery::Filter;
    use secrecy::ExposeSecret;

    fn shared(fake: &Arc<FakeBackend>) -> Arc<dyn GalleryBackend> {
        Arc::clone(fake) as Arc<dyn GalleryBackend>
    }

    #[tokio::test]
    async fn login_trims_email_and_returns_session() {
        let fake = Arc::new(FakeBackend::with_account(user("ana"), "password1"));
        let session = login(
            shared(&fake),
            "  ana@example.com ".to_string(),
            SecretString::from("password1"),
        )
        .await
        .expect("login should succeed");
        assert_eq!(session.user.id, RecordId::new("ana"));
        assert!(fake.token().is_some());
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let fake = Arc::new(FakeBackend::with_account(user("ana"), "password1"));
        let result = login(
            shared(&fake),
            "ana@example.com".to_string(),
            SecretString::from("nope"),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn signup_creates_then_authenticates() {
        let fake = Arc::new(FakeBackend::default());
        let form = SignupForm {
            name: "  ".to_string(),
            email: "new@example.com".to_string(),
            password: SecretString::from("longenough"),
            password_confirm: SecretString::from("longenough"),
        };
        let session = signup(shared(&fake), form).await.expect("signup");
        assert_eq!(session.user.email, "new@example.com");
        let created = fake.created_users();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, None);
    }

    #[tokio::test]
    async fn signup_with_short_password_fails() {
        let fake = Arc::new(FakeBackend::default());
        let form = SignupForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: SecretString::from("short"),
            password_confirm: SecretString::from("short"),
        };
        assert!(signup(shared(&fake), form).await.is_err());
    }

    #[tokio::test]
    async fn restore_session_clears_token_on_failure() {
        let fake = Arc::new(FakeBackend::default());
        let result = restore_session(
            shared(&fake),
            SecretString::from("stale"),
            RecordId::new("ghost"),
        )
        .await;
        assert!(result.is_err());
        assert!(fake.token().is_none());
    }

    #[tokio::test]
    async fn restore_session_keeps_token_on_success() {
        let fake = Arc::new(FakeBackend::with_account(user("ana"), "pw"));
        let session = restore_session(
            shared(&fake),
            SecretString::from("tok"),
            RecordId::new("ana"),
        )
        .await
        .expect("restore");
        assert_eq!(session.token.expose_secret(), "tok");
        assert_eq!(fake.token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn load_users_restricts_regular_viewers_and_includes_self() {
        let fake = Arc::new(FakeBackend::default());
        fake.set_users(vec![user("bob")]);
        let me = user("ana");

        let users = load_users(shared(&fake), me.clone(), 100).await.expect("users");
        assert_eq!(users[0].id, me.id);
        assert_eq!(users.len(), 2);

        let query = fake.last_user_query().expect("query recorded");
        assert_eq!(query.per_page, 100);
        assert_eq!(query.filter, Some(Filter::eq_bool("public", true)));
    }

    #[tokio::test]
    async fn load_photos_sends_sort_expand_and_scope_filter() {
        let fake = Arc::new(FakeBackend::default());
        fake.set_photos(vec![photo("p1", "ana")]);

        let photos = load_photos(shared(&fake), admin("root"), ViewScope::All, 50)
            .await
            .expect("photos");
        assert_eq!(photos.len(), 1);

        let query = fake.last_photo_query().expect("query recorded");
        assert_eq!(query.sort.as_deref(), Some(PHOTO_SORT));
        assert_eq!(query.expand.as_deref(), Some(PHOTO_EXPAND));
        assert_eq!(query.per_page, 50);
        assert_eq!(query.filter, None);
    }

    #[tokio::test]
    async fn upload_counts_unreadable_files_as_failures() {
        let fake = Arc::new(FakeBackend::default());
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("beach.jpg");
        std::fs::write(&good, b"fake jpeg").expect("write");
        let missing = dir.path().join("missing.jpg");

        let outcome = upload_photos(shared(&fake), RecordId::new("ana"), vec![good, missing]).await;
        assert_eq!(outcome.uploaded.len(), 1);
        assert_eq!(outcome.uploaded[0].owner, RecordId::new("ana"));
        assert_eq!(outcome.failed, 1);
        assert!(outcome.has_failures());
    }

    #[tokio::test]
    async fn upload_rejected_by_backend_creates_nothing() {
        let fake = Arc::new(FakeBackend::default());
        fake.fail_writes(true);
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("beach.jpg");
        std::fs::write(&file, b"fake jpeg").expect("write");

        let outcome = upload_photos(shared(&fake), RecordId::new("ana"), vec![file]).await;
        assert!(outcome.uploaded.is_empty());
        assert_eq!(outcome.failed, 1);
    }

    #[tokio::test]
    async fn delete_photo_removes_from_backend() {
        let fake = Arc::new(FakeBackend::default());
        fake.set_photos(vec![photo("p1", "ana"), photo("p2", "ana")]);
        let id = delete_photo(shared(&fake), RecordId::new("p1"))
            .await
            .expect("delete");
        assert_eq!(id, RecordId::new("p1"));
        assert_eq!(fake.photo_ids(), vec![RecordId::new("p2")]);
    }

    #[test]
    fn rename_patch_skips_blank_and_unchanged() {
        let me = user("ana");
        assert_eq!(rename_patch(&me, "   "), None);
        assert_eq!(rename_patch(&me, " ANA "), None);
        assert_eq!(
            rename_patch(&me, " Ana Maria "),
            Some(UserPatch {
                name: Some("Ana Maria".to_string()),
                public: None
            })
        );
    }

    #[tokio::test]
    async fn download_writes_fetched_bytes() {
        let fake = Arc::new(FakeBackend::default());
        fake.set_file("http://pb/api/files/x/p1/p1.jpg", b"jpeg bytes".to_vec());
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("p1.jpg");

        let written = download(
            shared(&fake),
            "http://pb/api/files/x/p1/p1.jpg".to_string(),
            dest.clone(),
        )
        .await
        .expect("download");
        assert_eq!(written, dest);
        assert_eq!(std::fs::read(&dest).expect("read"), b"jpeg bytes");
    }

    #[test]
    fn file_urls_request_the_right_thumbs() {
        let fake = FakeBackend::default();
        let p = photo("p1", "ana");
        assert_eq!(
            thumbnail_url(&fake, &p),
            "http://fake/api/files/pbc_photos/p1/p1.jpg?thumb=480x0"
        );
        assert_eq!(
            original_url(&fake, &p),
            "http://fake/api/files/pbc_photos/p1/p1.jpg"
        );

        let mut ana = user("ana");
        assert_eq!(avatar_url(&fake, &ana), None);
        ana.avatar = Some("face.png".to_string());
        assert_eq!(
            avatar_url(&fake, &ana).as_deref(),
            Some("http://fake/api/files/_pb_users_auth_/ana/face.png?thumb=100x0")
        );
    }
}
