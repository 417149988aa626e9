//! Login and registration against the backend

use std::sync::Arc;
use thiserror::Error;

use crate::models::{AuthResult, Credentials};
use crate::network::client::{Backend, BackendError};

/// A login attempt that never got a usable answer from the server.
///
/// A server-side rejection is not an error, it comes back as an
/// `AuthResult` with `success == false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("could not reach backend: {message}")]
    Transport { message: String },
}

impl From<BackendError> for AuthError {
    fn from(e: BackendError) -> Self {
        AuthError::Transport { message: e.to_string() }
    }
}

#[derive(Clone)]
pub struct AuthClient {
    backend: Arc<dyn Backend>,
}

impl AuthClient {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        AuthClient { backend }
    }

    /// Submit credentials. On success the start signal is sent in the
    /// background and its outcome only shows up in the log.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResult, AuthError> {
        tracing::info!(email = %credentials.email, "Submitting login");

        let result = self.backend.login(credentials).await.map_err(|e| {
            tracing::warn!(error = %e, "Login request failed");
            AuthError::from(e)
        })?;

        if result.success {
            tracing::info!(email = %credentials.email, "Login accepted");
            self.spawn_start_signal();
        } else {
            tracing::info!(message = %result.message, "Login rejected");
        }
        Ok(result)
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResult, AuthError> {
        tracing::info!(email = %credentials.email, "Submitting registration");

        let result = self.backend.register(credentials).await.map_err(|e| {
            tracing::warn!(error = %e, "Register request failed");
            AuthError::from(e)
        })?;

        tracing::info!(success = result.success, message = %result.message, "Registration answered");
        Ok(result)
    }

    fn spawn_start_signal(&self) {
        let backend = self.backend.clone();
        tokio::spawn(async move {
            match backend.start_jarvis().await {
                Ok(resp) => tracing::info!(message = %resp.message, "Start signal delivered"),
                Err(e) => tracing::warn!(error = %e, "Start signal failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fake::FakeBackend;
    use std::time::Duration;

    #[tokio::test]
    async fn test_login_success_sends_one_start_signal() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_login(Ok(AuthResult { success: true, message: String::new() }));
        let mut starts = backend.watch_starts();

        let auth = AuthClient::new(backend.clone());
        let result = auth.login(&Credentials::new("a@b.com", "x")).await.unwrap();
        assert!(result.success);

        tokio::time::timeout(Duration::from_secs(1), starts.recv())
            .await
            .expect("start signal not sent")
            .unwrap();
        tokio::task::yield_now().await;
        assert!(starts.try_recv().is_err());
        assert_eq!(backend.start_calls(), 1);
        assert_eq!(backend.last_credentials().unwrap().email, "a@b.com");
    }

    #[tokio::test]
    async fn test_login_rejected_surfaces_message_without_start() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_login(Ok(AuthResult { success: false, message: "Login failed".into() }));

        let auth = AuthClient::new(backend.clone());
        let result = auth.login(&Credentials::new("a@b.com", "wrong")).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Login failed");

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(backend.start_calls(), 0);
    }

    #[tokio::test]
    async fn test_login_transport_failure() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_login(Err(BackendError::Connection("refused".into())));

        let auth = AuthClient::new(backend.clone());
        let err = auth.login(&Credentials::default()).await.unwrap_err();
        assert!(matches!(err, AuthError::Transport { .. }));
        assert_eq!(backend.start_calls(), 0);
    }

    #[tokio::test]
    async fn test_start_failure_does_not_affect_login() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_login(Ok(AuthResult { success: true, message: "Login successful".into() }));
        backend.set_start(Err(BackendError::Status(500)));
        let mut starts = backend.watch_starts();

        let auth = AuthClient::new(backend.clone());
        let result = auth.login(&Credentials::new("a@b.com", "x")).await;
        assert_eq!(
            result,
            Ok(AuthResult { success: true, message: "Login successful".into() })
        );
        tokio::time::timeout(Duration::from_secs(1), starts.recv()).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_never_starts() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_register(Ok(AuthResult { success: true, message: "Account created successfully".into() }));

        let auth = AuthClient::new(backend.clone());
        let result = auth.register(&Credentials::new("new@b.com", "pw")).await.unwrap();
        assert!(result.success);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(backend.start_calls(), 0);
    }
}
