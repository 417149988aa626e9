//! Log poller - fetches the chat log on a fixed interval
//!
//! Each tick fetches in its own task. A tick that finds the previous fetch
//! still pending is skipped, so at most one request is ever outstanding.
//! Once `stop` returns, the snapshot callback is never called again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};

use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::models::Message;
use crate::network::client::Backend;

pub type SnapshotCallback = Box<dyn FnMut(Vec<Message>) + Send + 'static>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Stopped,
}

/// State shared between the handle, the timer task and fetch tasks
struct PollShared {
    /// `None` once stopped. Delivery holds this lock while calling back.
    on_snapshot: Mutex<Option<SnapshotCallback>>,
    in_flight: AtomicBool,
    fetch: Mutex<Option<AbortHandle>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PollShared {
    fn new(on_snapshot: SnapshotCallback) -> Self {
        PollShared {
            on_snapshot: Mutex::new(Some(on_snapshot)),
            in_flight: AtomicBool::new(false),
            fetch: Mutex::new(None),
        }
    }

    fn is_live(&self) -> bool {
        lock(&self.on_snapshot).is_some()
    }

    /// Hand a snapshot to the callback unless the poller was stopped meanwhile
    fn deliver(&self, logs: Vec<Message>) -> bool {
        let mut slot = lock(&self.on_snapshot);
        match slot.as_mut() {
            Some(callback) => {
                callback(logs);
                true
            }
            None => {
                tracing::debug!("Poller stopped, dropping late snapshot");
                false
            }
        }
    }

    fn try_begin_fetch(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn end_fetch(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    fn shutdown(&self) {
        if let Some(fetch) = lock(&self.fetch).take() {
            fetch.abort();
        }
        lock(&self.on_snapshot).take();
    }
}

pub struct LogPoller {
    backend: Arc<dyn Backend>,
    interval: Duration,
}

impl LogPoller {
    /// A zero interval would make the timer panic, it falls back to the default
    pub fn new(backend: Arc<dyn Backend>, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            tracing::warn!(
                default_ms = DEFAULT_POLL_INTERVAL_MS,
                "Zero poll interval, using default"
            );
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
        } else {
            interval
        };
        LogPoller { backend, interval }
    }

    /// A poller that has not been started yet is idle
    pub fn state(&self) -> PollState {
        PollState::Idle
    }

    /// Start polling. The first fetch happens one interval after start.
    pub fn start<F>(self, on_snapshot: F) -> PollHandle
    where
        F: FnMut(Vec<Message>) + Send + 'static,
    {
        let shared = Arc::new(PollShared::new(Box::new(on_snapshot)));
        let timer = tokio::spawn(run_timer(self.backend, self.interval, shared.clone()));
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Log polling started");

        PollHandle {
            shared,
            timer,
            state: PollState::Polling,
        }
    }
}

async fn run_timer(backend: Arc<dyn Backend>, interval: Duration, shared: Arc<PollShared>) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !shared.is_live() {
            break;
        }
        if !shared.try_begin_fetch() {
            tracing::debug!("Previous log fetch still pending, skipping tick");
            continue;
        }

        let backend = backend.clone();
        let task_shared = shared.clone();
        let fetch = tokio::spawn(async move {
            match backend.fetch_logs().await {
                Ok(logs) => {
                    tracing::trace!(count = logs.len(), "Log snapshot received");
                    task_shared.deliver(logs);
                }
                Err(e) => tracing::warn!(error = %e, "Log poll failed"),
            }
            task_shared.end_fetch();
        });
        *lock(&shared.fetch) = Some(fetch.abort_handle());
    }
}

/// Owns a running poller. Dropping the handle stops it.
pub struct PollHandle {
    shared: Arc<PollShared>,
    timer: JoinHandle<()>,
    state: PollState,
}

impl PollHandle {
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Stop polling. No snapshot is delivered after this returns, even one
    /// whose fetch was already in flight.
    pub fn stop(&mut self) {
        if self.state == PollState::Stopped {
            return;
        }
        self.timer.abort();
        self.shared.shutdown();
        self.state = PollState::Stopped;
        tracing::info!("Log polling stopped");
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::client::BackendError;
    use crate::network::fake::FakeBackend;

    const INTERVAL: Duration = Duration::from_millis(2000);

    fn collector() -> (Arc<Mutex<Vec<Vec<Message>>>>, impl FnMut(Vec<Message>) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |logs| sink.lock().unwrap().push(logs))
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_tick_replaces_with_latest_snapshot() {
        let backend = Arc::new(FakeBackend::new());
        let first = vec![Message::new("Jarvis", "online")];
        let second = vec![Message::new("User", "hi")];
        backend.push_logs(Ok(first.clone()));
        backend.push_logs(Ok(second.clone()));

        let (seen, on_snapshot) = collector();
        let poller = LogPoller::new(backend.clone(), INTERVAL);
        assert_eq!(poller.state(), PollState::Idle);
        let mut handle = poller.start(on_snapshot);
        assert_eq!(handle.state(), PollState::Polling);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.fetch_calls(), 0);
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(backend.fetch_calls(), 1);
        assert_eq!(seen.lock().unwrap().last(), Some(&first));

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(seen.lock().unwrap().last(), Some(&second));
        assert_eq!(seen.lock().unwrap().len(), 2);

        handle.stop();
        assert_eq!(handle.state(), PollState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_delivers_nothing_and_polling_continues() {
        let backend = Arc::new(FakeBackend::new());
        let first = vec![Message::new("User", "hi")];
        let third = vec![Message::new("User", "hi"), Message::new("Jarvis", "hello")];
        backend.push_logs(Ok(first.clone()));
        backend.push_logs(Err(BackendError::Decode("expected `logs`".into())));
        backend.push_logs(Ok(third.clone()));

        let (seen, on_snapshot) = collector();
        let _handle = LogPoller::new(backend.clone(), INTERVAL).start(on_snapshot);

        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::time::sleep(INTERVAL).await;
        tokio::time::sleep(INTERVAL).await;
        assert_eq!(*seen.lock().unwrap(), vec![first.clone()]);

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(*seen.lock().unwrap(), vec![first, third]);
        assert_eq!(backend.fetch_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_skips_ticks_instead_of_overlapping() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_fetch_delay(Duration::from_millis(5000));
        for _ in 0..4 {
            backend.push_logs(Ok(Vec::new()));
        }

        let (_seen, on_snapshot) = collector();
        let _handle = LogPoller::new(backend.clone(), INTERVAL).start(on_snapshot);

        // ticks at 2s, 4s, 6s, 8s; fetches start at 2s and 8s only
        tokio::time::sleep(Duration::from_millis(9000)).await;
        assert_eq!(backend.fetch_calls(), 2);
        assert_eq!(backend.max_in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_with_fetch_in_flight_delivers_nothing() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_fetch_delay(Duration::from_millis(500));
        backend.push_logs(Ok(vec![Message::new("User", "late")]));

        let (seen, on_snapshot) = collector();
        let mut handle = LogPoller::new(backend.clone(), INTERVAL).start(on_snapshot);

        tokio::time::sleep(INTERVAL + Duration::from_millis(100)).await;
        assert_eq!(backend.fetch_calls(), 1);
        handle.stop();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(backend.fetch_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let backend = Arc::new(FakeBackend::new());
        backend.push_logs(Ok(Vec::new()));

        let (_seen, on_snapshot) = collector();
        let handle = LogPoller::new(backend.clone(), INTERVAL).start(on_snapshot);
        tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(backend.fetch_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_falls_back_to_default() {
        let backend = Arc::new(FakeBackend::new());
        backend.push_logs(Ok(Vec::new()));

        let (_seen, on_snapshot) = collector();
        let _handle = LogPoller::new(backend.clone(), Duration::ZERO).start(on_snapshot);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.fetch_calls(), 0);
        tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)).await;
        assert_eq!(backend.fetch_calls(), 1);
    }

    #[test]
    fn test_late_delivery_after_shutdown_is_dropped() {
        let (seen, on_snapshot) = collector();
        let shared = PollShared::new(Box::new(on_snapshot));

        assert!(shared.deliver(vec![Message::new("Jarvis", "first")]));
        shared.shutdown();
        assert!(!shared.deliver(vec![Message::new("Jarvis", "late")]));
        assert!(!shared.is_live());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_in_flight_guard() {
        let (_seen, on_snapshot) = collector();
        let shared = PollShared::new(Box::new(on_snapshot));
        assert!(shared.try_begin_fetch());
        assert!(!shared.try_begin_fetch());
        shared.end_fetch();
        assert!(shared.try_begin_fetch());
    }
}
