//! Command handlers - state transitions for UI events and network responses
//!
//! Transitions that need the network return the `NetworkCommand` to send;
//! the actor does the sending.

use crate::app::state::{AppState, PendingAuth};
use crate::constants::{CONNECTION_ERROR_MESSAGE, CONNECTION_ERROR_TITLE};
use crate::messages::render::Alert;
use crate::messages::ui_events::{LoginField, Screen};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{AuthResult, Message};
use crate::network::AuthError;

impl AppState {
    // ========================
    // Login form editing
    // ========================

    pub fn next_field(&mut self) {
        self.login_field = self.login_field.next();
        self.cursor_position = self.current_input().len();
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.is_submitting() {
            return;
        }
        let cursor_pos = self.cursor_position;
        let input = self.current_input_mut();
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 && !self.is_submitting() {
            let cursor_pos = self.cursor_position;
            let input = self.current_input_mut();
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Auth
    // ========================

    /// One attempt at a time; credentials go out exactly as typed
    pub fn submit_login(&mut self) -> Option<NetworkCommand> {
        if self.screen != Screen::Login || self.is_submitting() {
            return None;
        }
        let id = self.next_id();
        self.pending_auth = Some(PendingAuth::Login(id));
        Some(NetworkCommand::Login {
            id,
            credentials: self.credentials.clone(),
        })
    }

    pub fn submit_register(&mut self) -> Option<NetworkCommand> {
        if self.screen != Screen::Login || self.is_submitting() {
            return None;
        }
        let id = self.next_id();
        self.pending_auth = Some(PendingAuth::Register(id));
        Some(NetworkCommand::Register {
            id,
            credentials: self.credentials.clone(),
        })
    }

    fn finish_login(&mut self, result: Result<AuthResult, AuthError>) -> Option<NetworkCommand> {
        match result {
            Ok(AuthResult { success: true, .. }) => Some(self.enter_chat()),
            Ok(AuthResult { success: false, message }) => {
                self.alert = Some(Alert::new("Login Failed", message));
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login could not reach backend");
                self.alert = Some(Alert::new(CONNECTION_ERROR_TITLE, CONNECTION_ERROR_MESSAGE));
                None
            }
        }
    }

    fn finish_register(&mut self, result: Result<AuthResult, AuthError>) {
        self.alert = Some(match result {
            Ok(AuthResult { success: true, message }) => Alert::new("Account Created", message),
            Ok(AuthResult { success: false, message }) => Alert::new("Registration Failed", message),
            Err(e) => {
                tracing::warn!(error = %e, "Registration could not reach backend");
                Alert::new(CONNECTION_ERROR_TITLE, CONNECTION_ERROR_MESSAGE)
            }
        });
    }

    // ========================
    // Navigation
    // ========================

    /// Switch to the chat screen with a fresh poll session
    fn enter_chat(&mut self) -> NetworkCommand {
        let session = self.next_session();
        self.screen = Screen::Chat;
        self.credentials.password.clear();
        self.login_field = LoginField::Email;
        self.cursor_position = self.credentials.email.len();
        self.store.clear();
        self.scroll_from_bottom = 0;
        self.last_snapshot_at = None;
        self.poll_session = Some(session);
        tracing::info!(session, "Entered chat screen");
        NetworkCommand::StartPolling { session }
    }

    /// Leave the chat screen; the log is dropped with it
    pub fn logout(&mut self) -> Option<NetworkCommand> {
        if self.screen != Screen::Chat {
            return None;
        }
        self.screen = Screen::Login;
        self.store.clear();
        self.last_snapshot_at = None;
        self.scroll_from_bottom = 0;
        self.poll_session
            .take()
            .map(|session| NetworkCommand::StopPolling { session })
    }

    // ========================
    // Chat log
    // ========================

    /// Replace the log, unless the snapshot belongs to a session that has ended
    pub fn apply_snapshot(&mut self, session: u64, messages: Vec<Message>) -> bool {
        if self.screen != Screen::Chat || self.poll_session != Some(session) {
            tracing::debug!(session, "Dropping snapshot from inactive poll session");
            return false;
        }
        self.store.replace(messages);
        self.last_snapshot_at = Some(chrono::Local::now());
        true
    }

    pub fn scroll_up(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(1);
    }

    pub fn scroll_to_latest(&mut self) {
        self.scroll_from_bottom = 0;
    }

    // ========================
    // Popups
    // ========================

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Network responses
    // ========================

    /// Apply a network response, returning a follow-up command if one is needed
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::LoginCompleted { id, result } => {
                if self.pending_auth != Some(PendingAuth::Login(id)) {
                    tracing::debug!(id, "Ignoring stale login response");
                    return None;
                }
                self.pending_auth = None;
                self.finish_login(result)
            }
            NetworkResponse::RegisterCompleted { id, result } => {
                if self.pending_auth != Some(PendingAuth::Register(id)) {
                    tracing::debug!(id, "Ignoring stale register response");
                    return None;
                }
                self.pending_auth = None;
                self.finish_register(result);
                None
            }
            NetworkResponse::LogsSnapshot { session, messages } => {
                self.apply_snapshot(session, messages);
                None
            }
        }
    }
}
