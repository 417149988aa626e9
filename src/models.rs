use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::USER_SENDER;

/// A single chat log entry as returned by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub text: String,
}

impl Message {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Message {
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// Messages from the user are drawn on the right, everything else is the assistant
    pub fn is_from_user(&self) -> bool {
        self.sender == USER_SENDER
    }
}

/// Login form data. Never persisted.
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outcome of a login or register call as reported by the server
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Body of `GET /get-logs`
#[derive(Clone, Debug, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<Message>,
}

/// Body of `POST /start-jarvis`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StartResponse {
    #[serde(default)]
    pub message: String,
}

/// The chat log currently on screen.
///
/// Always equal to the last applied snapshot: no merging, no dedup, no sorting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole store with a fresh snapshot
    pub fn replace(&mut self, snapshot: Vec<Message>) {
        self.messages = snapshot;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
