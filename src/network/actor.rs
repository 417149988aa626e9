//! Network actor - runs backend calls and the log poller in the Tokio runtime

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::auth::AuthClient;
use crate::network::client::Backend;
use crate::network::poller::{LogPoller, PollHandle};

/// The running poller and the session it was started for
struct ActivePoller {
    session: u64,
    handle: PollHandle,
}

/// Network actor that processes login and polling commands
pub struct NetworkActor {
    backend: Arc<dyn Backend>,
    auth: AuthClient,
    poll_interval: Duration,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
    poller: Option<ActivePoller>,
}

impl NetworkActor {
    pub fn new(
        backend: Arc<dyn Backend>,
        poll_interval: Duration,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            auth: AuthClient::new(backend.clone()),
            backend,
            poll_interval,
            response_tx,
            active_requests: JoinSet::new(),
            poller: None,
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Login { id, credentials }) => {
                            let auth = self.auth.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                let result = auth.login(&credentials).await;
                                tracing::info!(id, ok = result.is_ok(), "Login completed");
                                let _ = response_tx.send(NetworkResponse::LoginCompleted { id, result });
                            });
                        }

                        Some(NetworkCommand::Register { id, credentials }) => {
                            let auth = self.auth.clone();
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                let result = auth.register(&credentials).await;
                                tracing::info!(id, ok = result.is_ok(), "Registration completed");
                                let _ = response_tx.send(NetworkResponse::RegisterCompleted { id, result });
                            });
                        }

                        Some(NetworkCommand::StartPolling { session }) => {
                            self.start_polling(session);
                        }

                        Some(NetworkCommand::StopPolling { session }) => {
                            self.stop_polling(Some(session));
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.stop_polling(None);
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }

    fn start_polling(&mut self, session: u64) {
        self.stop_polling(None);

        let response_tx = self.response_tx.clone();
        let poller = LogPoller::new(self.backend.clone(), self.poll_interval);
        let handle = poller.start(move |messages| {
            let _ = response_tx.send(NetworkResponse::LogsSnapshot { session, messages });
        });

        tracing::info!(session, "Poll session started");
        self.poller = Some(ActivePoller { session, handle });
    }

    /// Stop the current poller. With `Some(session)` only a matching one is stopped.
    fn stop_polling(&mut self, session: Option<u64>) {
        let matches = match (&self.poller, session) {
            (Some(active), Some(session)) => active.session == session,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if matches {
            if let Some(mut active) = self.poller.take() {
                active.handle.stop();
                tracing::info!(session = active.session, "Poll session ended");
            }
        }
    }
}
