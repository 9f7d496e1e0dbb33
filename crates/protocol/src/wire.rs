//! Byte layout of a transfer stream.
//!
//! # Wire format
//!
//! ```text
//! [8 bytes BE: total_payload_bytes]
//! [8 bytes BE: file_name_len]
//! [file_name_len bytes: file name, UTF-8]
//! [total_payload_bytes bytes: raw payload]
//! ```
//!
//! All integers are big-endian. One transfer per connection; the sender
//! closes the stream after the last payload byte.

/// Fixed header size: total_payload_bytes(8) + file_name_len(8).
pub const HEADER_LEN: usize = 16;

/// Upper bound on the declared file name length.
///
/// Keeps a hostile header from making the receiver buffer an arbitrarily
/// large name before the payload phase begins.
pub const MAX_FILE_NAME_LEN: u64 = 4096;

/// The fixed-width record at the start of every transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferHeader {
    /// Payload size in bytes.
    pub total_payload_bytes: u64,
    /// File name length in bytes. Zero is malformed.
    pub file_name_len: u64,
}

impl TransferHeader {
    /// Decodes the header from its 16-byte wire form.
    pub fn decode(buf: &[u8; HEADER_LEN]) -> Self {
        let mut total = [0u8; 8];
        let mut name_len = [0u8; 8];
        total.copy_from_slice(&buf[..8]);
        name_len.copy_from_slice(&buf[8..]);
        Self {
            total_payload_bytes: u64::from_be_bytes(total),
            file_name_len: u64::from_be_bytes(name_len),
        }
    }

    /// Encodes the header into its 16-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[..8].copy_from_slice(&self.total_payload_bytes.to_be_bytes());
        buf[8..].copy_from_slice(&self.file_name_len.to_be_bytes());
        buf
    }

    /// Total stream length of the transfer this header describes.
    pub fn stream_len(&self) -> u64 {
        HEADER_LEN as u64 + self.file_name_len + self.total_payload_bytes
    }
}

/// Builds the complete stream image for one transfer.
///
/// Sender-side counterpart of the parser, and the fixture builder used by
/// tests. Length limits are enforced by the receiver, not here.
pub fn encode_transfer(file_name: &str, payload: &[u8]) -> Vec<u8> {
    let name = file_name.as_bytes();
    let header = TransferHeader {
        total_payload_bytes: payload.len() as u64,
        file_name_len: name.len() as u64,
    };

    let mut buf = Vec::with_capacity(HEADER_LEN + name.len() + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(name);
    buf.extend_from_slice(payload);
    buf
}
