// SPDX-License-Identifier: MPL-2.0
use chrono::{TimeZone, Utc};
use iced_folio::app::persisted_state::{AppState, StoredScope, StoredSession};
use iced_folio::application::gallery as service;
use iced_folio::config::{self, Config};
use iced_folio::domain::gallery::{CollectionRef, Photo, RecordId, ViewScope};
use iced_folio::domain::lightbox::Direction;
use iced_folio::i18n::fluent::I18n;
use iced_folio::infrastructure::PocketBase;
use iced_folio::ui::lightbox::{self, Effect};
use secrecy::{ExposeSecret, SecretString};
use tempfile::tempdir;

fn photo(id: &str, owner: &str) -> Photo {
    Photo {
        id: RecordId::new(id),
        collection: CollectionRef::new("pbc_photos", "photos"),
        image: format!("{id}.jpg"),
        owner: RecordId::new(owner),
        owner_name: None,
        created: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

fn photos(count: usize) -> Vec<Photo> {
    (0..count).map(|i| photo(&format!("p{i}"), "ana")).collect()
}

#[test]
fn test_language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let temp_config_file_path = dir.path().join("settings.toml");

    let mut initial_config = Config::default();
    initial_config.general.language = Some("en-US".to_string());
    config::save_to_path(&initial_config, &temp_config_file_path)
        .expect("Failed to write initial config file");

    let loaded_initial_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load initial config from path");
    let i18n_en = I18n::new(None, &loaded_initial_config);
    assert_eq!(i18n_en.current_locale().to_string(), "en-US");

    let mut french_config = loaded_initial_config.clone();
    french_config.general.language = Some("fr".to_string());
    config::save_to_path(&french_config, &temp_config_file_path)
        .expect("Failed to write french config file");

    let loaded_french_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load french config from path");
    let i18n_fr = I18n::new(None, &loaded_french_config);
    assert_eq!(i18n_fr.current_locale().to_string(), "fr");

    // The command line wins over the saved language
    let i18n_cli = I18n::new(Some("en-US".to_string()), &loaded_french_config);
    assert_eq!(i18n_cli.current_locale().to_string(), "en-US");

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn server_override_survives_config_round_trip() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut config = Config::default();
    config.server.url = Some("https://photos.example.org/".to_string());
    config::save_to_path(&config, &path).expect("Failed to write config");

    let loaded = config::load_from_path(&path).expect("Failed to load config");
    assert_eq!(loaded, config);
    assert!(PocketBase::new(&loaded.server.base_url()).is_ok());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[general]\nlanguage = \"fr\"\n").expect("Failed to write config");

    let loaded = config::load_from_path(&path).expect("Failed to load config");
    assert_eq!(loaded.general.language.as_deref(), Some("fr"));
    assert_eq!(loaded.lightbox, Config::default().lightbox);
    assert_eq!(loaded.grid, Config::default().grid);
}

#[test]
fn session_and_scope_survive_restart() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let base = Some(dir.path().to_path_buf());

    let mut state = AppState::default();
    state.session = Some(StoredSession::new(
        &SecretString::from("tok-123".to_string()),
        &RecordId::new("ana"),
    ));
    state.last_scope = Some(StoredScope::from(&ViewScope::User(RecordId::new("bob"))));
    assert_eq!(state.save_to(base.clone()), None);

    let (mut restored, warning) = AppState::load_from(base.clone());
    assert_eq!(warning, None);
    let session = restored.session.clone().expect("session should be restored");
    assert_eq!(session.token().expose_secret(), "tok-123");
    assert_eq!(session.user_id(), RecordId::new("ana"));
    let scope = restored.last_scope.clone().map(ViewScope::from);
    assert_eq!(scope, Some(ViewScope::User(RecordId::new("bob"))));

    restored.clear_session();
    assert_eq!(restored.save_to(base.clone()), None);
    let (after_logout, _) = AppState::load_from(base);
    assert!(after_logout.session.is_none());
}

#[test]
fn corrupted_state_file_starts_fresh_with_warning() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(dir.path().join("state.cbor"), [0xff, 0xfe, 0x00]).expect("write");

    let (state, warning) = AppState::load_from(Some(dir.path().to_path_buf()));
    assert_eq!(state, AppState::default());
    assert!(warning.is_some());
}

#[test]
fn stored_session_debug_hides_token() {
    let session = StoredSession::new(
        &SecretString::from("very-secret".to_string()),
        &RecordId::new("ana"),
    );
    assert!(!format!("{session:?}").contains("very-secret"));
}

#[test]
fn file_urls_point_at_backend() {
    let backend = PocketBase::new("http://127.0.0.1:8090").expect("valid URL");
    let p = photo("p1", "ana");
    assert_eq!(
        service::original_url(&backend, &p),
        "http://127.0.0.1:8090/api/files/pbc_photos/p1/p1.jpg"
    );
    assert!(service::thumbnail_url(&backend, &p).starts_with(&service::original_url(&backend, &p)));
    assert!(service::thumbnail_url(&backend, &p).contains("thumb="));
}

#[test]
fn lightbox_walks_the_sequence_and_wraps() {
    let photos = photos(3);
    let mut state = lightbox::State::default();

    let effect = state.open(&photos, &photos[2].id, Direction::Still, 1600.0);
    assert!(matches!(effect, Effect::Opened { enter_fullscreen: false, .. }));
    assert_eq!(state.current_index(&photos), Some(2));

    let effect = state.advance(&photos, Direction::Forward);
    assert!(matches!(effect, Effect::Moved(ref id) if *id == photos[0].id));
    assert_eq!(state.direction(), Direction::Forward);

    let _ = state.advance(&photos, Direction::Backward);
    assert_eq!(state.current_index(&photos), Some(2));
    assert_eq!(state.direction(), Direction::Backward);
}

#[test]
fn lightbox_requests_fullscreen_on_narrow_viewports() {
    let photos = photos(2);
    let mut state = lightbox::State::default();
    let effect = state.open(&photos, &photos[0].id, Direction::Still, 400.0);
    assert!(matches!(effect, Effect::Opened { enter_fullscreen: true, .. }));

    let (effect, _) = state.close();
    assert!(matches!(effect, Effect::Closing { exit_fullscreen: true }));
}

#[test]
fn reopening_during_close_cancels_the_pending_clear() {
    let photos = photos(4);
    let mut state = lightbox::State::default();
    let _ = state.open(&photos, &photos[1].id, Direction::Still, 1600.0);

    let _ = state.close();
    assert!(state.is_closing());
    let stale = state.close_generation();

    // Closing freezes navigation until the selection clears
    assert!(matches!(state.advance(&photos, Direction::Forward), Effect::None));

    let _ = state.open(&photos, &photos[3].id, Direction::Still, 1600.0);
    assert!(!state.clear_selection(stale));
    assert_eq!(state.selected(), Some(&photos[3].id));

    let _ = state.close();
    assert!(state.clear_selection(state.close_generation()));
    assert!(!state.is_open());
    assert_eq!(state.direction(), Direction::Still);
}

#[test]
fn lightbox_closes_when_its_photo_is_deleted() {
    let mut photos = photos(3);
    let mut state = lightbox::State::default();
    let _ = state.open(&photos, &photos[1].id, Direction::Still, 1600.0);

    photos.remove(1);
    let (effect, _) = state.sync(&photos);
    assert!(matches!(effect, Effect::Closing { .. }));
    assert!(state.is_closing());
    assert_eq!(state.current_index(&photos), None);
}

#[test]
fn lightbox_ignores_unknown_photo() {
    let photos = photos(2);
    let mut state = lightbox::State::default();
    let effect = state.open(&photos, &RecordId::new("missing"), Direction::Still, 1600.0);
    assert!(matches!(effect, Effect::None));
    assert!(!state.is_open());
}
