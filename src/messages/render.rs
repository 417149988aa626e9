//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{LoginField, Screen};
use crate::models::Message;

/// A modal message box, dismissed by any key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Alert {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,
    pub backend_url: String,

    // Login form
    pub email: String,
    /// Only the length leaves the app layer
    pub password_len: usize,
    pub login_field: LoginField,
    /// Character column in the focused field
    pub cursor_position: usize,
    pub is_submitting: bool,

    // Chat log
    pub messages: Vec<Message>,
    /// Lines scrolled up from the newest message, 0 follows the tail
    pub scroll_from_bottom: u16,
    pub last_updated: Option<String>,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,
}
