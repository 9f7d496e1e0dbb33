//! Sender side of the transfer protocol.
//!
//! Streams one file to a listening receiver: header, file name, payload,
//! then closes the connection. Useful for smoke-testing a receiver and as
//! the wire format's reference sender.

use std::io;
use std::net::SocketAddr;
use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info};

use dropslot_protocol::TransferHeader;

use crate::BUFFER_SIZE;

/// Sends the file at `path` to the receiver at `addr`.
///
/// The name on the wire is the path's final component. Returns the number
/// of payload bytes sent.
pub async fn send_file(addr: SocketAddr, path: &Path) -> io::Result<u64> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no usable file name"))?;

    let metadata = tokio::fs::metadata(path).await?;
    let header = TransferHeader {
        total_payload_bytes: metadata.len(),
        file_name_len: file_name.len() as u64,
    };

    let stream = TcpStream::connect(addr).await?;
    info!(%addr, file = file_name, bytes = metadata.len(), "sending file");
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, stream);

    writer.write_all(&header.encode()).await?;
    writer.write_all(file_name.as_bytes()).await?;

    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = vec![0u8; BUFFER_SIZE];
    let mut remaining = metadata.len();

    // Send exactly the declared byte count, even if the file grows or
    // shrinks underneath us.
    while remaining > 0 {
        let to_read = (remaining as usize).min(buf.len());
        let n = file.read(&mut buf[..to_read]).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "local file shrank while sending",
            ));
        }
        writer.write_all(&buf[..n]).await?;
        remaining -= n as u64;
    }

    writer.flush().await?;
    // Half-close so the receiver sees a clean end of stream.
    writer.into_inner().shutdown().await?;

    debug!(sent = metadata.len(), "file sent");
    Ok(metadata.len())
}
