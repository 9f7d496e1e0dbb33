//! Wire format and receive state machine for single-file transfers.
//!
//! A transfer is one header + file name + payload exchange over one TCP
//! connection. The sender writes a fixed 16-byte header, the file name,
//! and the raw payload, then closes. See [`wire`] for the byte layout and
//! [`parser`] for the fragmentation-tolerant receive side.

pub mod parser;
pub mod wire;

pub use parser::{ParseEvent, Phase, TransferParser};
pub use wire::{HEADER_LEN, MAX_FILE_NAME_LEN, TransferHeader, encode_transfer};

/// Errors produced while parsing an incoming transfer stream.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("header declares a zero-length file name")]
    EmptyFileName,

    #[error("file name length {0} exceeds the {MAX_FILE_NAME_LEN}-byte limit")]
    FileNameTooLong(u64),

    #[error("file name is not valid UTF-8: {0}")]
    InvalidFileName(#[from] std::string::FromUtf8Error),

    #[error("{0} bytes received past the end of the transfer")]
    TrailingBytes(usize),

    #[error("parser already failed")]
    AlreadyFailed,
}
