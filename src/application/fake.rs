// SPDX-License-Identifier: MPL-2.0
//! In-memory [`GalleryBackend`] for tests.

use crate::application::port::{
    BackendError, BackendFuture, GalleryBackend, ListQuery, NewUser, Page, Session, Thumb,
    Upload, UserPatch,
};
use crate::domain::gallery::{CollectionRef, FileOwner, Photo, RecordId, User};
use chrono::Utc;
use futures_util::FutureExt;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<(User, String)>,
    users: Vec<User>,
    photos: Vec<Photo>,
    files: HashMap<String, Vec<u8>>,
    created_users: Vec<CreatedUser>,
    token: Option<String>,
    last_user_query: Option<ListQuery>,
    last_photo_query: Option<ListQuery>,
    fail_writes: bool,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

impl FakeBackend {
    pub fn with_account(user: User, password: &str) -> Self {
        let fake = Self::default();
        fake.lock().accounts.push((user, password.to_string()));
        fake
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("fake backend poisoned")
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn created_users(&self) -> Vec<CreatedUser> {
        self.lock().created_users.clone()
    }

    pub fn set_users(&self, users: Vec<User>) {
        self.lock().users = users;
    }

    pub fn set_photos(&self, photos: Vec<Photo>) {
        self.lock().photos = photos;
    }

    pub fn set_file(&self, url: &str, bytes: Vec<u8>) {
        self.lock().files.insert(url.to_string(), bytes);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn photo_ids(&self) -> Vec<RecordId> {
        self.lock().photos.iter().map(|p| p.id.clone()).collect()
    }

    pub fn last_user_query(&self) -> Option<ListQuery> {
        self.lock().last_user_query.clone()
    }

    pub fn last_photo_query(&self) -> Option<ListQuery> {
        self.lock().last_photo_query.clone()
    }

    fn rejected() -> BackendError {
        BackendError::from_status(400, "Failed to update record.")
    }

    fn find_user<'a>(inner: &'a mut Inner, id: &RecordId) -> Option<&'a mut User> {
        if let Some(index) = inner.users.iter().position(|u| &u.id == id) {
            return inner.users.get_mut(index);
        }
        inner
            .accounts
            .iter_mut()
            .map(|(user, _)| user)
            .find(|u| &u.id == id)
    }
}

fn done<T: Send + 'static>(result: Result<T, BackendError>) -> BackendFuture<T> {
    async move { result }.boxed()
}

impl GalleryBackend for FakeBackend {
    fn authenticate(&self, email: &str, password: &SecretString) -> BackendFuture<Session> {
        let mut inner = self.lock();
        let found = inner
            .accounts
            .iter()
            .find(|(user, pw)| user.email == email && pw == password.expose_secret())
            .map(|(user, _)| user.clone());
        let result = match found {
            Some(user) => {
                let token = format!("token-{}", user.id);
                inner.token = Some(token.clone());
                Ok(Session {
                    token: SecretString::from(token),
                    user,
                })
            }
            None => Err(BackendError::from_status(400, "Failed to authenticate.")),
        };
        done(result)
    }

    fn set_token(&self, token: Option<SecretString>) {
        self.lock().token = token.map(|t| t.expose_secret().to_string());
    }

    fn create_user(&self, new_user: NewUser) -> BackendFuture<User> {
        let mut inner = self.lock();
        let password = new_user.password.expose_secret().to_string();
        if password.len() < 8 || password != new_user.password_confirm.expose_secret() {
            return done(Err(BackendError::from_status(400, "Failed to create record.")));
        }
        inner.next_id += 1;
        let user = User {
            id: RecordId::new(format!("u{}", inner.next_id)),
            collection: CollectionRef::new("_pb_users_auth_", "users"),
            email: new_user.email.clone(),
            name: new_user.name.clone().unwrap_or_default(),
            avatar: None,
            verified: false,
            public: false,
            title: None,
        };
        inner.created_users.push(CreatedUser {
            email: new_user.email,
            name: new_user.name,
        });
        inner.accounts.push((user.clone(), password));
        done(Ok(user))
    }

    fn get_user(&self, id: &RecordId) -> BackendFuture<User> {
        let mut inner = self.lock();
        let result = Self::find_user(&mut inner, id)
            .map(|u| u.clone())
            .ok_or(BackendError::NotFound);
        done(result)
    }

    fn list_users(&self, query: ListQuery) -> BackendFuture<Page<User>> {
        let mut inner = self.lock();
        let page = Page {
            items: inner.users.clone(),
            page: query.page,
            per_page: query.per_page,
            total_items: inner.users.len() as u32,
        };
        inner.last_user_query = Some(query);
        done(Ok(page))
    }

    fn list_photos(&self, query: ListQuery) -> BackendFuture<Page<Photo>> {
        let mut inner = self.lock();
        let page = Page {
            items: inner.photos.clone(),
            page: query.page,
            per_page: query.per_page,
            total_items: inner.photos.len() as u32,
        };
        inner.last_photo_query = Some(query);
        done(Ok(page))
    }

    fn create_photo(&self, owner: &RecordId, upload: Upload) -> BackendFuture<Photo> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return done(Err(Self::rejected()));
        }
        inner.next_id += 1;
        let photo = Photo {
            id: RecordId::new(format!("p{}", inner.next_id)),
            collection: CollectionRef::new("pbc_photos", "photos"),
            image: upload.file_name,
            owner: owner.clone(),
            owner_name: None,
            created: Utc::now(),
        };
        inner.photos.insert(0, photo.clone());
        done(Ok(photo))
    }

    fn delete_photo(&self, id: &RecordId) -> BackendFuture<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return done(Err(Self::rejected()));
        }
        let before = inner.photos.len();
        inner.photos.retain(|p| &p.id != id);
        let result = if inner.photos.len() < before {
            Ok(())
        } else {
            Err(BackendError::NotFound)
        };
        done(result)
    }

    fn update_user(&self, id: &RecordId, patch: UserPatch) -> BackendFuture<User> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return done(Err(Self::rejected()));
        }
        let result = match Self::find_user(&mut inner, id) {
            Some(user) => {
                if let Some(name) = patch.name {
                    user.name = name;
                }
                if let Some(public) = patch.public {
                    user.public = public;
                }
                Ok(user.clone())
            }
            None => Err(BackendError::NotFound),
        };
        done(result)
    }

    fn upload_avatar(&self, id: &RecordId, upload: Upload) -> BackendFuture<User> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return done(Err(Self::rejected()));
        }
        let result = match Self::find_user(&mut inner, id) {
            Some(user) => {
                user.avatar = Some(upload.file_name);
                Ok(user.clone())
            }
            None => Err(BackendError::NotFound),
        };
        done(result)
    }

    fn file_url(&self, owner: &dyn FileOwner, filename: &str, thumb: Option<Thumb>) -> String {
        let base = format!(
            "http://fake/api/files/{}/{}/{}",
            owner.collection().path_segment(),
            owner.record_id(),
            filename
        );
        match thumb {
            Some(thumb) => format!("{base}?thumb={thumb}"),
            None => base,
        }
    }

    fn fetch_file(&self, url: &str) -> BackendFuture<Vec<u8>> {
        let result = self
            .lock()
            .files
            .get(url)
            .cloned()
            .ok_or(BackendError::NotFound);
        done(result)
    }
}
