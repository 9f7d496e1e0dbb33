//! Receiver configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/dropslot/daemon.toml`
//! - Windows: `%APPDATA%/dropslot/daemon.toml`

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Display name of this receiver (hostname by default).
    #[serde(default = "default_name")]
    pub name: String,

    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port to listen on (0 = OS-assigned).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory receiving incoming files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "Dropslot".into())
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    4520
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("received")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            listen_addr: default_listen_addr(),
            port: default_port(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Validates the operator-supplied address and port.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen_addr {:?}", self.listen_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Makes sure the output directory exists before the receiver runs.
    pub fn ensure_output_dir(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("cannot create output_dir {}", self.output_dir.display())
        })
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("dropslot")
            .join("daemon.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("dropslot").join("daemon.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/dropslot/daemon.toml"))
    }
}
