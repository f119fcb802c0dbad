#[cfg(target_family = "wasm")]
use gloo_storage::{LocalStorage, Storage};

use crate::models::{Credentials, Session};

#[cfg_attr(not(target_family = "wasm"), allow(dead_code))]
const STORAGE_KEY_SESSION: &str = "cardstack_session";

/// Which backend call the sign-in panel makes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign in",
            AuthMode::SignUp => "Create account",
        }
    }
}

/// Sign-in panel state
#[derive(Clone, Debug, PartialEq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub busy: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::SignIn,
            email: String::new(),
            password: String::new(),
            error: None,
            busy: false,
        }
    }
}

impl AuthForm {
    /// Start a submission, returning what to send
    ///
    /// Returns `None` while a request is already in flight or when a field is
    /// empty (the error is set on the form in that case).
    pub fn begin(&mut self) -> Option<(AuthMode, Credentials)> {
        if self.busy {
            return None;
        }

        let email = self.email.trim().to_string();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some("Email and password required".to_string());
            return None;
        }

        self.busy = true;
        self.error = None;
        Some((
            self.mode,
            Credentials {
                email,
                password: self.password.clone(),
            },
        ))
    }

    pub fn fail(&mut self, message: String) {
        self.busy = false;
        self.error = Some(message);
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.error = None;
    }
}

/// Load the session saved by a previous page load
pub fn load_session() -> Option<Session> {
    #[cfg(target_family = "wasm")]
    {
        match LocalStorage::get::<Session>(STORAGE_KEY_SESSION) {
            Ok(session) => {
                log::info!("Restored session for {}", session.user.email);
                return Some(session);
            }
            Err(_) => log::info!("No stored session"),
        }
    }

    None
}

#[cfg_attr(not(target_family = "wasm"), allow(unused_variables))]
pub fn save_session(session: &Session) {
    #[cfg(target_family = "wasm")]
    {
        if let Err(e) = LocalStorage::set(STORAGE_KEY_SESSION, session) {
            log::warn!("Failed to persist session: {}", e);
        }
    }
}

pub fn clear_session() {
    #[cfg(target_family = "wasm")]
    {
        LocalStorage::delete(STORAGE_KEY_SESSION);
    }
    log::info!("Session cleared");
}
