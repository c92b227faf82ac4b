//! Server configuration from the environment.

use inkshare_core::MAX_SNAPSHOT_BYTES;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Extra room for the schema and envelope around a maximal snapshot.
const ENVELOPE_SLACK_BYTES: usize = 64 * 1024;

/// Default ceiling for a single uploaded asset.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,
    /// Directory for uploaded assets. `None` uses the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// URL prefix uploaded assets are served under.
    pub public_url: String,
    /// Largest accepted room/snapshot request body.
    pub max_body_bytes: usize,
    /// Largest accepted asset upload.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let addr = SocketAddr::from(([0, 0, 0, 0], 3030));
        Self {
            addr,
            data_dir: None,
            public_url: format!("http://localhost:{}/uploads", addr.port()),
            max_body_bytes: MAX_SNAPSHOT_BYTES + ENVELOPE_SLACK_BYTES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read `INKSHARE_ADDR`, `INKSHARE_DATA_DIR`, `INKSHARE_PUBLIC_URL`,
    /// `INKSHARE_MAX_BODY_BYTES` and `INKSHARE_MAX_UPLOAD_BYTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("INKSHARE_ADDR") {
            config.addr = parse_var("INKSHARE_ADDR", addr)?;
            config.public_url = format!("http://localhost:{}/uploads", config.addr.port());
        }
        if let Some(dir) = lookup("INKSHARE_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup("INKSHARE_PUBLIC_URL") {
            config.public_url = url;
        }
        if let Some(max) = lookup("INKSHARE_MAX_BODY_BYTES") {
            config.max_body_bytes = parse_var("INKSHARE_MAX_BODY_BYTES", max)?;
        }
        if let Some(max) = lookup("INKSHARE_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_var("INKSHARE_MAX_UPLOAD_BYTES", max)?;
        }
        Ok(config)
    }
}

fn parse_var<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        name,
        reason: e.to_string(),
        value,
    })
}
