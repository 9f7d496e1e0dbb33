//! Single-slot TCP receive service.
//!
//! Accepts one connection at a time, drives the incoming byte stream
//! through the protocol state machine, and writes the payload to the
//! output directory. Progress and errors surface through the [`Observer`]
//! trait; no per-transfer failure takes the service down.

mod client;
mod connection;
mod observer;
mod server;

pub use client::send_file;
pub use connection::{ActiveTransfer, TransferSummary};
pub use observer::{ErrorKind, NullObserver, Observer};
pub use server::{Receiver, ReceiverConfig};

/// TCP read/write buffer size (64 KB).
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Errors that abort a single transfer.
#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    #[error("protocol error: {0}")]
    Protocol(#[from] dropslot_protocol::ProtocolError),

    #[error("storage error: {0}")]
    Sink(#[from] dropslot_transfer::SinkError),

    #[error("transport error: {0}")]
    Transport(#[source] std::io::Error),

    #[error("shutting down")]
    Cancelled,
}

impl ReceiveError {
    /// Maps the error onto the observer-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReceiveError::Protocol(_) => ErrorKind::Protocol,
            ReceiveError::Sink(_) => ErrorKind::Io,
            ReceiveError::Transport(_) | ReceiveError::Cancelled => ErrorKind::Transport,
        }
    }
}
