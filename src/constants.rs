//! Application constants
//!
//! Centralized location for endpoint paths and configuration defaults.

/// Default backend address
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Default interval between log polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Environment variable overriding the configured backend URL
pub const BACKEND_URL_ENV: &str = "JARVIS_BACKEND_URL";

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const START_PATH: &str = "/start-jarvis";
pub const LOGS_PATH: &str = "/get-logs";

/// Sender name the backend uses for messages typed/spoken by the user
pub const USER_SENDER: &str = "User";

/// Alert shown when the backend cannot be reached during login
pub const CONNECTION_ERROR_TITLE: &str = "Error";
pub const CONNECTION_ERROR_MESSAGE: &str = "Could not connect to backend";

/// Application name
pub const APP_NAME: &str = "Jarvis Console";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
