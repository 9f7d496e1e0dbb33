//! Durable storage for received payloads.
//!
//! [`FileSink`] is the write side of one transfer: opened once the file
//! name is known, fed sequential payload chunks, and guaranteed to release
//! the file handle on every exit path. [`RateMeter`] supplies throughput
//! figures for whatever progress surface the host wires up.

mod progress;
mod sink;

pub use progress::RateMeter;
pub use sink::FileSink;

use std::path::PathBuf;

/// Errors produced by the storage sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("sink for {path} is already closed")]
    Closed { path: PathBuf },
}
