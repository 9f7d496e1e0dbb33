//! Accept loop.
//!
//! Binds a TCP listener and serves transfers one at a time: the loop does
//! not return to `accept` until the in-flight transfer has completed or
//! failed, so a second sender waits in the OS backlog instead of
//! interleaving with the active one.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::connection::{ActiveTransfer, TransferSummary};
use crate::observer::{ErrorKind, Observer};
use crate::{BUFFER_SIZE, ReceiveError};

/// Receiver configuration.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Address to bind (port 0 = OS-assigned).
    pub bind_addr: SocketAddr,
    /// Directory receiving completed (and partial) files.
    pub output_dir: PathBuf,
}

/// Single-slot receive service.
///
/// Explicitly constructed and parameterizable: hosts may run several
/// instances side by side, each with its own port, output directory, and
/// observer.
pub struct Receiver<O: Observer> {
    config: ReceiverConfig,
    observer: Arc<O>,
    cancel: CancellationToken,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl<O: Observer> Receiver<O> {
    pub fn new(config: ReceiverConfig, observer: O, cancel: CancellationToken) -> Arc<Self> {
        Arc::new(Self {
            config,
            observer: Arc::new(observer),
            cancel,
            local_addr: Mutex::new(None),
        })
    }

    /// Local address once [`run`](Self::run) has bound the socket.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().await
    }

    /// Signals the accept loop to stop.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Binds the listener and serves transfers until cancelled.
    ///
    /// Per-transfer errors are reported to the observer and logged; the
    /// loop then re-arms and accepts the next connection. Only binding
    /// failures and cancellation end the loop.
    pub async fn run(self: &Arc<Self>) -> Result<(), ReceiveError> {
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(ReceiveError::Transport)?;
        let local_addr = listener.local_addr().map_err(ReceiveError::Transport)?;
        *self.local_addr.lock().await = Some(local_addr);
        info!(%local_addr, "receiver listening");
        self.observer.on_status("listening");

        loop {
            let (stream, peer_addr) = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("receiver shutting down");
                    return Ok(());
                }
                result = listener.accept() => match result {
                    Ok(pair) => pair,
                    Err(e) => {
                        // Listener-level failure: surface it, keep serving.
                        warn!("accept error: {e}");
                        self.observer.on_error(ErrorKind::Transport, &e.to_string());
                        continue;
                    }
                },
            };

            info!(%peer_addr, "connection accepted");
            self.observer.on_status("connection accepted");

            match self.receive_one(stream).await {
                Ok(summary) => {
                    info!(
                        file = %summary.file_name,
                        bytes = summary.payload_bytes,
                        "transfer complete"
                    );
                    self.observer.on_status(&format!(
                        "received {} ({} bytes)",
                        summary.file_name, summary.payload_bytes
                    ));
                }
                Err(ReceiveError::Cancelled) => {
                    info!("receiver shutting down mid-transfer");
                    return Ok(());
                }
                Err(e) => {
                    warn!(%peer_addr, "transfer aborted: {e}");
                    self.observer.on_error(e.kind(), &e.to_string());
                    self.observer.on_status("ready");
                }
            }
        }
    }

    /// Runs one connection to completion or failure.
    ///
    /// Drains whatever the socket has on each wakeup and feeds it through
    /// the state machine in one pass. There is deliberately no read
    /// timeout: a stalled peer parks the transfer until the connection
    /// drops.
    async fn receive_one(&self, mut stream: TcpStream) -> Result<TransferSummary, ReceiveError> {
        let mut transfer = ActiveTransfer::new(&self.config.output_dir, self.observer.as_ref());
        let mut buf = vec![0u8; BUFFER_SIZE];

        loop {
            let n = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(ReceiveError::Cancelled),
                result = stream.read(&mut buf) => result.map_err(ReceiveError::Transport)?,
            };

            if n == 0 {
                // Peer closed before the declared byte count arrived.
                return Err(ReceiveError::Transport(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed mid-transfer",
                )));
            }

            if let Some(summary) = transfer.accept_bytes(&buf[..n])? {
                // One transfer per connection; close it and re-arm.
                let _ = stream.shutdown().await;
                return Ok(summary);
            }
        }
    }
}
