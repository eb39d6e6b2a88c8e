// SPDX-License-Identifier: MPL-2.0
//! Sign-in and sign-up screen.
//!
//! A single card that switches between the two forms. Failures are shown
//! inline under the fields; a successful answer hands the session to the
//! application, which switches to the gallery.

use crate::application::gallery::{self, SignupForm};
use crate::application::port::{BackendResult, GalleryBackend, Session};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::styles;
use iced::alignment::Horizontal;
use iced::widget::{button, text, text_input, Column, Container};
use iced::{Element, Length, Task};
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Clone)]
pub enum Message {
    SwitchMode,
    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    ConfirmChanged(String),
    Submit,
    Finished(BackendResult<Session>),
}

#[derive(Debug, Clone)]
pub enum Effect {
    None,
    SignedIn(Session),
}

#[derive(Clone, Default)]
pub struct State {
    mode: Mode,
    name: String,
    email: String,
    password: String,
    password_confirm: String,
    is_submitting: bool,
    error_key: Option<&'static str>,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("is_submitting", &self.is_submitting)
            .field("error_key", &self.error_key)
            .finish_non_exhaustive()
    }
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub fn error_key(&self) -> Option<&'static str> {
        self.error_key
    }

    /// Whether the form has enough input to send.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        if self.is_submitting || self.email.trim().is_empty() || self.password.is_empty() {
            return false;
        }
        match self.mode {
            Mode::Login => true,
            Mode::Signup => !self.password_confirm.is_empty(),
        }
    }

    pub fn handle(
        &mut self,
        message: Message,
        backend: &Arc<dyn GalleryBackend>,
    ) -> (Effect, Task<Message>) {
        match message {
            Message::SwitchMode => {
                if !self.is_submitting {
                    self.mode = match self.mode {
                        Mode::Login => Mode::Signup,
                        Mode::Signup => Mode::Login,
                    };
                    self.error_key = None;
                    self.password.clear();
                    self.password_confirm.clear();
                }
                (Effect::None, Task::none())
            }
            Message::NameChanged(value) => {
                self.name = value;
                (Effect::None, Task::none())
            }
            Message::EmailChanged(value) => {
                self.email = value;
                (Effect::None, Task::none())
            }
            Message::PasswordChanged(value) => {
                self.password = value;
                (Effect::None, Task::none())
            }
            Message::ConfirmChanged(value) => {
                self.password_confirm = value;
                (Effect::None, Task::none())
            }
            Message::Submit => {
                if !self.can_submit() {
                    return (Effect::None, Task::none());
                }
                self.is_submitting = true;
                self.error_key = None;
                let backend = Arc::clone(backend);
                let task = match self.mode {
                    Mode::Login => Task::perform(
                        gallery::login(
                            backend,
                            self.email.clone(),
                            SecretString::from(self.password.clone()),
                        ),
                        Message::Finished,
                    ),
                    Mode::Signup => Task::perform(
                        gallery::signup(
                            backend,
                            SignupForm {
                                name: self.name.clone(),
                                email: self.email.clone(),
                                password: SecretString::from(self.password.clone()),
                                password_confirm: SecretString::from(
                                    self.password_confirm.clone(),
                                ),
                            },
                        ),
                        Message::Finished,
                    ),
                };
                (Effect::None, task)
            }
            Message::Finished(result) => {
                self.is_submitting = false;
                match result {
                    Ok(session) => {
                        self.password.clear();
                        self.password_confirm.clear();
                        (Effect::SignedIn(session), Task::none())
                    }
                    Err(err) => {
                        tracing::warn!(%err, mode = ?self.mode, "authentication failed");
                        self.error_key = Some(match self.mode {
                            Mode::Login => "auth-login-failed",
                            Mode::Signup => "auth-signup-failed",
                        });
                        (Effect::None, Task::none())
                    }
                }
            }
        }
    }

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let (title, submit_key, switch_key) = match self.mode {
            Mode::Login => ("auth-login-title", "auth-login-submit", "auth-switch-to-signup"),
            Mode::Signup => ("auth-signup-title", "auth-signup-submit", "auth-switch-to-login"),
        };

        let mut form = Column::new()
            .spacing(spacing::SM)
            .push(text(i18n.tr("window-title")).size(typography::TITLE_LG))
            .push(text(i18n.tr(title)).size(typography::TITLE_MD));

        if self.mode == Mode::Signup {
            form = form.push(field(&i18n.tr("auth-name"), &self.name, Message::NameChanged));
        }
        form = form
            .push(field(&i18n.tr("auth-email"), &self.email, Message::EmailChanged))
            .push(
                field(&i18n.tr("auth-password"), &self.password, Message::PasswordChanged)
                    .secure(true),
            );
        if self.mode == Mode::Signup {
            form = form.push(
                field(
                    &i18n.tr("auth-password-confirm"),
                    &self.password_confirm,
                    Message::ConfirmChanged,
                )
                .secure(true),
            );
        }

        if let Some(key) = self.error_key {
            form = form.push(
                text(i18n.tr(key))
                    .size(typography::BODY_SM)
                    .color(palette::ERROR_500),
            );
        }

        let submit_label = if self.is_submitting {
            i18n.tr("auth-submitting")
        } else {
            i18n.tr(submit_key)
        };
        form = form
            .push(
                button(
                    Container::new(text(submit_label).size(typography::BODY))
                        .width(Length::Fill)
                        .align_x(Horizontal::Center),
                )
                .width(Length::Fill)
                .padding([spacing::XS, spacing::MD])
                .style(styles::button_primary)
                .on_press_maybe(self.can_submit().then_some(Message::Submit)),
            )
            .push(
                button(text(i18n.tr(switch_key)).size(typography::BODY_SM))
                    .style(styles::button::bare)
                    .on_press_maybe((!self.is_submitting).then_some(Message::SwitchMode)),
            );

        let card = Container::new(form)
            .width(Length::Fixed(sizing::AUTH_CARD_WIDTH))
            .padding(spacing::LG)
            .style(styles::container::panel);

        Container::new(card).center(Length::Fill).into()
    }
}

fn field<'a>(
    placeholder: &str,
    value: &str,
    on_input: fn(String) -> Message,
) -> text_input::TextInput<'a, Message> {
    text_input(placeholder, value)
        .on_input(on_input)
        .on_submit(Message::Submit)
        .padding(spacing::XS)
        .size(typography::BODY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake::FakeBackend;
    use crate::application::port::BackendError;
    use crate::domain::gallery::types::fixtures::user;

    fn backend() -> Arc<dyn GalleryBackend> {
        Arc::new(FakeBackend::with_account(user("ana"), "correct horse"))
    }

    fn filled(mode: Mode) -> State {
        State {
            mode,
            email: "ana@example.com".into(),
            password: "correct horse".into(),
            password_confirm: "correct horse".into(),
            ..State::default()
        }
    }

    #[test]
    fn empty_form_cannot_submit() {
        let mut state = State::new();
        assert!(!state.can_submit());
        let (effect, _) = state.handle(Message::Submit, &backend());
        assert!(matches!(effect, Effect::None));
        assert!(!state.is_submitting());
    }

    #[test]
    fn signup_needs_confirmation() {
        let mut state = filled(Mode::Signup);
        state.password_confirm.clear();
        assert!(!state.can_submit());
    }

    #[test]
    fn submit_marks_form_busy() {
        let mut state = filled(Mode::Login);
        let _ = state.handle(Message::Submit, &backend());
        assert!(state.is_submitting());
        assert!(!state.can_submit());
    }

    #[test]
    fn failed_login_shows_error_and_keeps_mode() {
        let mut state = filled(Mode::Login);
        state.is_submitting = true;
        let (effect, _) = state.handle(Message::Finished(Err(BackendError::Unauthorized)), &backend());
        assert!(matches!(effect, Effect::None));
        assert_eq!(state.error_key(), Some("auth-login-failed"));
        assert!(!state.is_submitting());
    }

    #[test]
    fn failed_signup_uses_signup_error() {
        let mut state = filled(Mode::Signup);
        let _ = state.handle(
            Message::Finished(Err(BackendError::from_status(400, "bad"))),
            &backend(),
        );
        assert_eq!(state.error_key(), Some("auth-signup-failed"));
    }

    #[test]
    fn success_hands_over_session_and_forgets_password() {
        let mut state = filled(Mode::Login);
        let session = Session {
            token: SecretString::from("t".to_string()),
            user: user("ana"),
        };
        let (effect, _) = state.handle(Message::Finished(Ok(session)), &backend());
        assert!(matches!(effect, Effect::SignedIn(ref s) if s.user.id.as_str() == "ana"));
        assert!(state.password.is_empty());
    }

    #[test]
    fn switching_mode_clears_error_and_passwords() {
        let mut state = filled(Mode::Login);
        state.error_key = Some("auth-login-failed");
        let _ = state.handle(Message::SwitchMode, &backend());
        assert_eq!(state.mode(), Mode::Signup);
        assert_eq!(state.error_key(), None);
        assert!(state.password.is_empty());
        assert_eq!(state.email, "ana@example.com");
    }

    #[test]
    fn debug_output_hides_password() {
        let state = filled(Mode::Login);
        assert!(!format!("{state:?}").contains("correct horse"));
    }
}
