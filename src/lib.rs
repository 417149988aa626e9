//! # Jarvis Console
//!
//! A terminal client for the Jarvis assistant backend.
//!
//! ## Features
//! - Login (and account registration) against the backend
//! - Fire-and-forget start signal after a successful login
//! - Live chat log, polled every two seconds, rendered as a conversation
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime): `AuthClient` and `LogPoller`

pub mod config;
pub mod constants;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use models::{AuthResult, Credentials, Message, MessageStore};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use messages::ui_events::Screen;
pub use network::{AuthClient, AuthError, Backend, BackendError, HttpBackend, LogPoller, NetworkActor, PollHandle};
