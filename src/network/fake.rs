//! Scriptable in-memory backend for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::models::{AuthResult, Credentials, Message, StartResponse};
use crate::network::client::{Backend, BackendError};

pub(crate) struct FakeBackend {
    login: Mutex<Result<AuthResult, BackendError>>,
    register: Mutex<Result<AuthResult, BackendError>>,
    start: Mutex<Result<StartResponse, BackendError>>,
    logs: Mutex<VecDeque<Result<Vec<Message>, BackendError>>>,
    fetch_delay: Mutex<Duration>,
    last_credentials: Mutex<Option<Credentials>>,
    start_watchers: Mutex<Vec<mpsc::UnboundedSender<()>>>,
    start_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend {
            login: Mutex::new(Ok(AuthResult::default())),
            register: Mutex::new(Ok(AuthResult::default())),
            start: Mutex::new(Ok(StartResponse { message: "Jarvis started".into() })),
            logs: Mutex::new(VecDeque::new()),
            fetch_delay: Mutex::new(Duration::ZERO),
            last_credentials: Mutex::new(None),
            start_watchers: Mutex::new(Vec::new()),
            start_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn set_login(&self, result: Result<AuthResult, BackendError>) {
        *self.login.lock().unwrap() = result;
    }

    pub fn set_register(&self, result: Result<AuthResult, BackendError>) {
        *self.register.lock().unwrap() = result;
    }

    pub fn set_start(&self, result: Result<StartResponse, BackendError>) {
        *self.start.lock().unwrap() = result;
    }

    /// Queue responses for successive log fetches
    pub fn push_logs(&self, result: Result<Vec<Message>, BackendError>) {
        self.logs.lock().unwrap().push_back(result);
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }

    /// Receives one `()` per start signal, whatever its outcome
    pub fn watch_starts(&self) -> mpsc::UnboundedReceiver<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.start_watchers.lock().unwrap().push(tx);
        rx
    }

    pub fn last_credentials(&self) -> Option<Credentials> {
        self.last_credentials.lock().unwrap().clone()
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResult, BackendError> {
        *self.last_credentials.lock().unwrap() = Some(credentials.clone());
        self.login.lock().unwrap().clone()
    }

    async fn register(&self, credentials: &Credentials) -> Result<AuthResult, BackendError> {
        *self.last_credentials.lock().unwrap() = Some(credentials.clone());
        self.register.lock().unwrap().clone()
    }

    async fn start_jarvis(&self) -> Result<StartResponse, BackendError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        for watcher in self.start_watchers.lock().unwrap().iter() {
            let _ = watcher.send(());
        }
        self.start.lock().unwrap().clone()
    }

    async fn fetch_logs(&self) -> Result<Vec<Message>, BackendError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let next = self.logs.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        next.unwrap_or_else(|| Err(BackendError::Connection("no scripted response".into())))
    }
}
