//! Logging observer.
//!
//! Routes receiver notifications to `tracing`, with a rate meter so
//! progress lines carry throughput and an ETA instead of a bare count.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use dropslot_server::{ErrorKind, Observer};
use dropslot_transfer::RateMeter;

/// Minimum spacing between progress log lines.
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_millis(500);

pub struct LogObserver {
    inner: Mutex<ProgressState>,
}

struct ProgressState {
    meter: RateMeter,
    last_bytes: u64,
    last_logged: Option<Instant>,
}

impl LogObserver {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ProgressState {
                meter: RateMeter::default(),
                last_bytes: 0,
                last_logged: None,
            }),
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for LogObserver {
    fn on_status(&self, status: &str) {
        tracing::info!("{status}");
    }

    fn on_progress(&self, payload_bytes: u64, total_payload_bytes: u64) {
        let mut state = self.inner.lock().unwrap();

        // A new transfer restarts the count from zero.
        let delta = payload_bytes.saturating_sub(state.last_bytes);
        state.last_bytes = payload_bytes;
        state.meter.record(delta);

        let done = payload_bytes == total_payload_bytes;
        let now = Instant::now();
        if !done
            && state
                .last_logged
                .is_some_and(|t| now.duration_since(t) < PROGRESS_LOG_INTERVAL)
        {
            return;
        }
        state.last_logged = Some(now);

        let rate = state.meter.bytes_per_second() as u64;
        let remaining = total_payload_bytes.saturating_sub(payload_bytes);
        match state.meter.eta(remaining) {
            Some(eta) if !done => tracing::info!(
                received = payload_bytes,
                total = total_payload_bytes,
                rate_bytes_per_sec = rate,
                eta_secs = eta.as_secs(),
                "progress"
            ),
            _ => tracing::info!(
                received = payload_bytes,
                total = total_payload_bytes,
                rate_bytes_per_sec = rate,
                "progress"
            ),
        }

        if done {
            state.meter.reset();
            state.last_bytes = 0;
            state.last_logged = None;
        }
    }

    fn on_error(&self, kind: ErrorKind, detail: &str) {
        tracing::warn!(?kind, "transfer aborted: {detail}");

        let mut state = self.inner.lock().unwrap();
        state.meter.reset();
        state.last_bytes = 0;
        state.last_logged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_state_resets_after_completion() {
        let observer = LogObserver::new();

        observer.on_progress(0, 10);
        observer.on_progress(6, 10);
        observer.on_progress(10, 10);

        let state = observer.inner.lock().unwrap();
        assert_eq!(state.last_bytes, 0);
        assert!(state.last_logged.is_none());
    }

    #[test]
    fn error_resets_progress_state() {
        let observer = LogObserver::new();

        observer.on_progress(0, 10);
        observer.on_progress(4, 10);
        observer.on_error(ErrorKind::Transport, "connection reset");

        let state = observer.inner.lock().unwrap();
        assert_eq!(state.last_bytes, 0);
    }

    #[test]
    fn back_to_back_transfers_do_not_underflow() {
        let observer = LogObserver::new();

        observer.on_progress(0, 100);
        observer.on_progress(100, 100);
        // Next transfer starts small again.
        observer.on_progress(0, 5);
        observer.on_progress(5, 5);
    }
}
