//! App state - pure data structure with no I/O logic

use chrono::{DateTime, Local};

use crate::messages::render::Alert;
use crate::messages::ui_events::{LoginField, Screen};
use crate::messages::RenderState;
use crate::models::{Credentials, MessageStore};

/// Which auth call is waiting for an answer
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PendingAuth {
    Login(u64),
    Register(u64),
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub screen: Screen,
    pub backend_url: String,

    // Login form
    pub credentials: Credentials,
    pub login_field: LoginField,
    pub cursor_position: usize,
    pub pending_auth: Option<PendingAuth>,
    pub next_request_id: u64,

    // Chat
    pub store: MessageStore,
    pub poll_session: Option<u64>,
    pub next_session_id: u64,
    pub scroll_from_bottom: u16,
    pub last_snapshot_at: Option<DateTime<Local>>,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_BACKEND_URL)
    }
}

impl AppState {
    pub fn new(backend_url: impl Into<String>) -> Self {
        AppState {
            screen: Screen::Login,
            backend_url: backend_url.into(),
            credentials: Credentials::default(),
            login_field: LoginField::Email,
            cursor_position: 0,
            pending_auth: None,
            next_request_id: 1,
            store: MessageStore::new(),
            poll_session: None,
            next_session_id: 1,
            scroll_from_bottom: 0,
            last_snapshot_at: None,
            alert: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn next_session(&mut self) -> u64 {
        let session = self.next_session_id;
        self.next_session_id += 1;
        session
    }

    pub fn is_submitting(&self) -> bool {
        self.pending_auth.is_some()
    }

    /// Get the focused login field content
    pub fn current_input(&self) -> &str {
        match self.login_field {
            LoginField::Email => &self.credentials.email,
            LoginField::Password => &self.credentials.password,
        }
    }

    pub fn current_input_mut(&mut self) -> &mut String {
        match self.login_field {
            LoginField::Email => &mut self.credentials.email,
            LoginField::Password => &mut self.credentials.password,
        }
    }

    /// Cursor as a character column, the stored position is a byte offset
    pub fn cursor_column(&self) -> usize {
        self.current_input()
            .get(..self.cursor_position)
            .map(|before| before.chars().count())
            .unwrap_or(0)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            backend_url: self.backend_url.clone(),
            email: self.credentials.email.clone(),
            password_len: self.credentials.password.chars().count(),
            login_field: self.login_field,
            cursor_position: self.cursor_column(),
            is_submitting: self.is_submitting(),
            messages: self.store.messages().to_vec(),
            scroll_from_bottom: self.scroll_from_bottom,
            last_updated: self
                .last_snapshot_at
                .map(|at| at.format("%H:%M:%S").to_string()),
            alert: self.alert.clone(),
            show_help: self.show_help,
        }
    }
}
