//! HTTP client wrapper - talks to the Jarvis backend over JSON

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{LOGIN_PATH, LOGS_PATH, REGISTER_PATH, START_PATH};
use crate::models::{AuthResult, Credentials, LogsResponse, Message, StartResponse};

/// Errors from a single backend call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Backend returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if e.is_connect() {
            BackendError::Connection(e.to_string())
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

/// The backend endpoints the client uses. `HttpBackend` is the real one.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResult, BackendError>;
    async fn register(&self, credentials: &Credentials) -> Result<AuthResult, BackendError>;
    async fn start_jarvis(&self) -> Result<StartResponse, BackendError>;
    async fn fetch_logs(&self) -> Result<Vec<Message>, BackendError>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_credentials(&self, path: &str, credentials: &Credentials) -> Result<AuthResult, BackendError> {
        let resp = self.client.post(self.url(path)).json(credentials).send().await?;
        decode_json(resp).await
    }
}

/// Decode a JSON body. The status code only matters when the body is not
/// the expected JSON, some endpoints report failures with a JSON body.
async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BackendError> {
    let status = resp.status();
    let body = resp.text().await?;
    parse_body(status, &body)
}

fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, BackendError> {
    match serde_json::from_str::<T>(body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(BackendError::Status(status.as_u16())),
        Err(e) => Err(BackendError::Decode(e.to_string())),
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResult, BackendError> {
        self.post_credentials(LOGIN_PATH, credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<AuthResult, BackendError> {
        self.post_credentials(REGISTER_PATH, credentials).await
    }

    async fn start_jarvis(&self) -> Result<StartResponse, BackendError> {
        let resp = self.client.post(self.url(START_PATH)).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        // The reply is informational only, tolerate anything that came back 2xx
        match parse_body::<StartResponse>(status, &body) {
            Err(BackendError::Decode(_)) => Ok(StartResponse::default()),
            other => other,
        }
    }

    async fn fetch_logs(&self) -> Result<Vec<Message>, BackendError> {
        let resp = self.client.get(self.url(LOGS_PATH)).send().await?;
        let parsed: LogsResponse = decode_json(resp).await?;
        Ok(parsed.logs)
    }
}

/// Create an HTTP client. No timeout unless one is configured.
pub fn create_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to default HTTP client");
        reqwest::Client::new()
    })
}
