// Client configuration.
// Reads the server address and offline store location from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::default_store_path;
use crate::error::{Result, WebberError};

pub const SERVER_VAR: &str = "WEBBER_SERVER";
pub const CACHE_FILE_VAR: &str = "WEBBER_CACHE_FILE";
pub const TIMEOUT_VAR: &str = "WEBBER_TIMEOUT_SECS";

/// Settings for a production [`crate::Webber`] client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebberConfig {
    /// Base address every path is appended to, without a trailing slash.
    pub server: String,
    /// Location of the persistent offline store.
    pub store_path: PathBuf,
    /// Request timeout. Requests wait indefinitely when unset.
    pub timeout: Option<Duration>,
}

impl WebberConfig {
    pub fn new(server: impl Into<String>, store_path: impl Into<PathBuf>) -> Self {
        Self {
            server: server.into(),
            store_path: store_path.into(),
            timeout: None,
        }
    }

    /// Load from `WEBBER_SERVER`, `WEBBER_CACHE_FILE`, and `WEBBER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `var` to resolve each variable name.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server = var(SERVER_VAR).ok_or(WebberError::MissingServer)?;

        let store_path = match var(CACHE_FILE_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_store_path()
                .ok_or_else(|| WebberError::Other("Could not determine cache directory".into()))?,
        };

        let timeout = var(TIMEOUT_VAR)
            .map(|secs| {
                secs.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    WebberError::Other(format!("Invalid {} '{}': {}", TIMEOUT_VAR, secs, e))
                })
            })
            .transpose()?;

        Ok(Self {
            server,
            store_path,
            timeout,
        })
    }
}
