//! Input debouncing for the location search.
//!
//! Each controller owns its debouncer, so dropping the controller also
//! drops the debouncer and cancels whatever was pending. Nothing can fire
//! against a screen that no longer exists.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// Quiet window before a pending search fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(1200);

/// Collapses a burst of inputs into a single deferred action carrying the
/// latest input. Scheduling a new action resets the deadline and cancels
/// the previous one.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, pending: None }
    }

    /// Schedule `action` to run once the window elapses with no newer call.
    pub fn call<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            time::sleep(window).await;
            action.await;
        }));
    }

    /// Drop the pending action without running it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Wait for the pending action to fire. No-op when nothing is pending.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take() {
            // Abort errors only occur for actions cancelled elsewhere.
            let _ = handle.await;
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::task::yield_now;
    use tokio::time::Instant;

    type Log = Arc<Mutex<Vec<(&'static str, Instant)>>>;

    fn record(log: &Log, value: &'static str) -> impl Future<Output = ()> + Send + 'static {
        let log = Arc::clone(log);
        async move {
            log.lock().expect("log mutex").push((value, Instant::now()));
        }
    }

    async fn settle() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_with_last_value_at_deadline() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(1200));

        // Inputs at t=0, t=500, t=900.
        debouncer.call(record(&log, "pa"));
        settle().await;
        time::advance(Duration::from_millis(500)).await;

        debouncer.call(record(&log, "par"));
        settle().await;
        time::advance(Duration::from_millis(400)).await;

        debouncer.call(record(&log, "paris"));
        settle().await;

        // Just before the deadline nothing has fired.
        time::advance(Duration::from_millis(1199)).await;
        settle().await;
        assert!(log.lock().expect("log mutex").is_empty());

        time::advance(Duration::from_millis(1)).await;
        settle().await;

        let fired = log.lock().expect("log mutex").clone();
        assert_eq!(fired.len(), 1);
        let (value, at) = fired[0];
        assert_eq!(value, "paris");
        // Deadline is 900ms (last input) + 1200ms window.
        assert_eq!(at.duration_since(start), Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_pending_action() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(1200));

        debouncer.call(record(&log, "query"));
        settle().await;
        debouncer.cancel();

        time::advance(Duration::from_millis(5000)).await;
        settle().await;
        assert!(log.lock().expect("log mutex").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_after_drop() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(1200));

        debouncer.call(record(&log, "query"));
        settle().await;
        drop(debouncer);

        time::advance(Duration::from_millis(5000)).await;
        settle().await;
        assert!(log.lock().expect("log mutex").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_waits_out_the_window() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(1200));

        debouncer.call(record(&log, "query"));
        debouncer.flush().await;

        let fired = log.lock().expect("log mutex").clone();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, "query");
    }
}
