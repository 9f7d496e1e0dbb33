//! Dropslot daemon entry point.

mod config;
mod observer;

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use dropslot_server::{Receiver, ReceiverConfig};

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting dropslot daemon"
    );

    // Load configuration.
    let config = match config::Config::load() {
        Ok(c) => {
            tracing::info!(name = %c.name, "configuration loaded");
            c
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            config::Config::default()
        }
    };

    // Operator input is validated before the receiver ever runs.
    let bind_addr = config.bind_addr()?;
    config.ensure_output_dir()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config, bind_addr))?;

    tracing::info!("daemon shut down cleanly");
    Ok(())
}

async fn run(config: config::Config, bind_addr: SocketAddr) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // Ctrl-C triggers a graceful stop between events.
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            signal_cancel.cancel();
        }
    });

    let receiver = Receiver::new(
        ReceiverConfig {
            bind_addr,
            output_dir: config.output_dir.clone(),
        },
        observer::LogObserver::new(),
        cancel,
    );

    receiver.run().await?;
    Ok(())
}
