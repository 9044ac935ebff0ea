//! Runtime configuration from flags, environment, and `.env`.
//!
//! Every flag has an environment fallback so the binary can run unattended:
//!
//! - `--endpoint` / `ESTATE_ANALYZE_URL`: analysis endpoint (hosted analyzer
//!   by default)
//! - `--connect-timeout-secs` / `ESTATE_CONNECT_TIMEOUT_SECS`: default 10
//! - `--export-dir` / `ESTATE_EXPORT_DIR`: where CSV exports go, default `.`

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_ENDPOINT: &str = "https://real-estate-analyzer-9ir8.onrender.com/api/analyze/";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("connect timeout must be at least one second")]
    ZeroConnectTimeout,
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "estate-chat", about = "Ask questions about real-estate localities")]
pub struct Config {
    #[arg(long, env = "ESTATE_ANALYZE_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, env = "ESTATE_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,

    #[arg(long, env = "ESTATE_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,
}

impl Config {
    /// Parse process arguments after loading `.env` (if any) into the
    /// environment, then validate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value parses but is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check values clap cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] for non-http(s) or
    /// unparseable endpoints and [`ConfigError::ZeroConnectTimeout`] for a
    /// zero connect timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint { url: self.endpoint.clone(), reason: e.to_string() })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                url: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroConnectTimeout);
        }
        Ok(())
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
