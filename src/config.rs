//! Configuration types.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./students.db";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the database file. Parent directories are created on open.
    pub db_path: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
        }
    }
}

impl AppConfig {
    /// Read configuration from `GRADEBOOK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("GRADEBOOK_DB_PATH")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let host_raw = lookup("GRADEBOOK_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host_raw
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "GRADEBOOK_HOST".to_string(),
                message: format!("{host_raw:?}: {e}"),
            })?;

        let port = match lookup("GRADEBOOK_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "GRADEBOOK_PORT".to_string(),
                    message: format!("{raw:?}: {e}"),
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            db_path,
            bind_addr: SocketAddr::new(host, port),
        })
    }
}
