// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the screens.
//!
//! The `App` struct wires together the backend client, localization, the
//! auth and gallery screens and the lightbox, and translates their effects
//! into side effects such as file dialogs, downloads or session persistence.

pub mod paths;
pub mod persisted_state;
mod message;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::application::gallery as service;
use crate::application::port::GalleryBackend;
use crate::config::{self, Config, DEFAULT_IMAGE_CACHE_BYTES, DEFAULT_THUMBNAIL_CACHE_ENTRIES};
use crate::error::Result;
use crate::i18n::fluent::I18n;
use crate::infrastructure::PocketBase;
use crate::media::{ImageCache, ImageRequests};
use crate::ui::notifications::{self, Notification};
use crate::ui::theming::ThemeMode;
use crate::ui::{auth, gallery, lightbox};
use iced::{window, Element, Size, Subscription, Task, Theme};
use persisted_state::AppState;
use std::fmt;
use std::sync::Arc;

/// Root Iced application state that bridges UI components, localization, and
/// persisted preferences.
pub struct App {
    pub i18n: I18n,
    config: Config,
    backend: Arc<dyn GalleryBackend>,
    screen: Screen,
    auth: auth::State,
    /// Present while signed in.
    gallery: Option<gallery::State>,
    lightbox: lightbox::State,
    images: ImageCache,
    image_requests: ImageRequests,
    theme_mode: ThemeMode,
    fullscreen: bool,
    window_id: Option<window::Id>,
    window_size: Size,
    /// Persisted application state (session, last scope, dialog directories).
    app_state: AppState,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("signed_in", &self.gallery.is_some())
            .field("lightbox_open", &self.lightbox.is_open())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const WINDOW_DEFAULT_WIDTH: u32 = 1024;
pub const MIN_WINDOW_HEIGHT: u32 = 480;
pub const MIN_WINDOW_WIDTH: u32 = 360;

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32)),
        ..window::Settings::default()
    }
}

/// Everything `App::new` needs, prepared before the event loop starts.
struct Boot {
    flags: Flags,
    config: Config,
    config_warning: Option<String>,
    backend: Arc<dyn GalleryBackend>,
}

/// Entry point used by `main.rs` to launch the Iced application loop.
///
/// Fails before opening a window when the server URL is unusable.
pub fn run(flags: Flags) -> Result<()> {
    use std::cell::RefCell;

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

    let (mut config, config_warning) = config::load();
    if let Some(server) = &flags.server {
        config.server.url = Some(server.clone());
    }
    let base_url = config.server.base_url();
    let backend: Arc<dyn GalleryBackend> = Arc::new(PocketBase::new(&base_url)?);
    tracing::info!(server = %base_url, "using backend");

    // Wrap the boot data in RefCell<Option<_>> to satisfy the Fn bound
    // while only consuming it once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(Boot {
        flags,
        config,
        config_warning,
        backend,
    }));
    let boot = move || {
        let boot = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(boot)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()?;
    Ok(())
}

impl App {
    /// Initializes application state and, when a session was stored, starts
    /// checking it against the backend.
    fn new(boot: Boot) -> (Self, Task<Message>) {
        let Boot {
            flags,
            config,
            config_warning,
            backend,
        } = boot;

        let i18n = I18n::new(flags.lang.clone(), &config);
        let (app_state, state_warning) = AppState::load();

        let mut app = App {
            i18n,
            theme_mode: config.general.theme_mode,
            lightbox: lightbox::State::new(lightbox::Settings::from(&config.lightbox)),
            config,
            backend,
            screen: Screen::Auth,
            auth: auth::State::new(),
            gallery: None,
            images: ImageCache::new(DEFAULT_THUMBNAIL_CACHE_ENTRIES, DEFAULT_IMAGE_CACHE_BYTES),
            image_requests: ImageRequests::new(),
            fullscreen: false,
            window_id: None,
            window_size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
            app_state,
            notifications: notifications::Manager::new(),
        };

        // Show warnings for config/state loading issues
        if let Some(key) = config_warning {
            app.notifications.push(Notification::warning(key));
        }
        if let Some(key) = state_warning {
            app.notifications.push(Notification::warning(key));
        }

        let task = match &app.app_state.session {
            Some(stored) => {
                app.screen = Screen::Restoring;
                Task::perform(
                    service::restore_session(
                        Arc::clone(&app.backend),
                        stored.token(),
                        stored.user_id(),
                    ),
                    Message::SessionRestored,
                )
            }
            None => Task::none(),
        };

        (app, task)
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match &self.gallery {
            Some(gallery) if self.screen == Screen::Gallery => {
                let title = gallery.scope().title(gallery.viewer(), gallery.users());
                let scope = gallery::header::title_text(&self.i18n, &title);
                format!("{scope} - {app_name}")
            }
            _ => app_name,
        }
    }

    fn theme(&self) -> Theme {
        self.theme_mode.theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        let window_sub = subscription::create_window_subscription();
        let tick_sub =
            subscription::create_tick_subscription(self.notifications.has_notifications());
        let lightbox_sub = subscription::create_lightbox_subscription(&self.lightbox);

        Subscription::batch([window_sub, tick_sub, lightbox_sub])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            backend: &self.backend,
            config: &self.config,
            screen: &mut self.screen,
            auth: &mut self.auth,
            gallery: &mut self.gallery,
            lightbox: &mut self.lightbox,
            images: &mut self.images,
            image_requests: &mut self.image_requests,
            persisted: &mut self.app_state,
            notifications: &mut self.notifications,
            fullscreen: &mut self.fullscreen,
            window_id: &mut self.window_id,
            window_size: &mut self.window_size,
        };

        match message {
            Message::Auth(auth_message) => update::handle_auth_message(&mut ctx, auth_message),
            Message::Gallery(gallery_message) => {
                update::handle_gallery_message(&mut ctx, gallery_message)
            }
            Message::Lightbox(lightbox_message) => {
                update::handle_lightbox_message(&mut ctx, lightbox_message)
            }
            Message::Notification(notification_message) => {
                ctx.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::SessionRestored(result) => update::handle_session_restored(&mut ctx, result),
            Message::ImageFetched { url, result } => {
                update::handle_image_fetched(&mut ctx, url, result)
            }
            Message::PhotosPicked(files) => update::handle_photos_picked(&mut ctx, files),
            Message::AvatarPicked(path) => update::handle_avatar_picked(&mut ctx, path),
            Message::DownloadTarget { photo, path } => {
                update::handle_download_target(&mut ctx, photo, path)
            }
            Message::DownloadFinished(result) => update::handle_download_finished(&mut ctx, result),
            Message::Window { id, event } => update::handle_window_event(&mut ctx, id, event),
            Message::Tick(now) => update::handle_tick(&mut ctx, now),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: self.screen,
            auth: &self.auth,
            gallery: self.gallery.as_ref(),
            lightbox: &self.lightbox,
            backend: self.backend.as_ref(),
            images: &self.images,
            min_column_width: self.config.grid.min_column_width(),
            notifications: &self.notifications,
        })
    }
}
