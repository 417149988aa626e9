//! Network messages - communication between App and Network layers

use crate::models::{AuthResult, Credentials, Message};
use crate::network::AuthError;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Submit a login attempt
    Login {
        id: u64,
        credentials: Credentials,
    },
    /// Create an account
    Register {
        id: u64,
        credentials: Credentials,
    },
    /// Begin polling the chat log, replacing any running poller
    StartPolling {
        session: u64,
    },
    /// Stop the poller if it belongs to this session
    StopPolling {
        session: u64,
    },

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    LoginCompleted {
        id: u64,
        result: Result<AuthResult, AuthError>,
    },
    RegisterCompleted {
        id: u64,
        result: Result<AuthResult, AuthError>,
    },
    /// A full chat log snapshot from the poller of `session`
    LogsSnapshot {
        session: u64,
        messages: Vec<Message>,
    },
}
