//! Progress and status reporting.
//!
//! The receiver pushes lifecycle notifications to an [`Observer`] instead
//! of owning any display of its own; hosts wire up whatever surface they
//! have (log lines, a progress bar, a GUI).

/// Classification of a failed transfer, for reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed transfer stream.
    Protocol,
    /// The destination file could not be opened or written.
    Io,
    /// The connection or listener failed underneath the transfer.
    Transport,
}

/// Receives transfer lifecycle notifications.
///
/// Purely informational: no method returns a value, and default
/// implementations do nothing, so hosts override only what they display.
/// Events arrive from the receive task one at a time, in order.
pub trait Observer: Send + Sync + 'static {
    /// Human-readable state changes ("listening", "connection accepted", ...).
    fn on_status(&self, _status: &str) {}

    /// Payload progress. `total_payload_bytes` is the header's declared
    /// payload size; header and file name bytes are not counted.
    fn on_progress(&self, _payload_bytes: u64, _total_payload_bytes: u64) {}

    /// A transfer was aborted. The service keeps accepting.
    fn on_error(&self, _kind: ErrorKind, _detail: &str) {}
}

/// Observer that discards every notification.
pub struct NullObserver;

impl Observer for NullObserver {}
