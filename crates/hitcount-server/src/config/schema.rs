use std::net::SocketAddr;
use std::time::Duration;

use hitcount_core::error::{HitCountError, Result};
use hitcount_core::retry::RetryPolicy;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub retry: RetrySection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
            retry: RetrySection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HitCountError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.store.validate()?;
        self.retry.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            HitCountError::Config(format!("server.listen `{}` is not a socket address: {e}", self.listen))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:5000".into()
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub db: i64,

    #[serde(default = "default_key")]
    pub key: String,

    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_timeout_ms")]
    pub socket_timeout_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
            key: default_key(),
            connect_timeout_ms: default_timeout_ms(),
            socket_timeout_ms: default_timeout_ms(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(HitCountError::Config("store.host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(HitCountError::Config("store.port must not be 0".into()));
        }
        if self.db < 0 {
            return Err(HitCountError::Config("store.db must not be negative".into()));
        }
        if self.key.is_empty() {
            return Err(HitCountError::Config("store.key must not be empty".into()));
        }
        if !(1..=60000).contains(&self.connect_timeout_ms) {
            return Err(HitCountError::Config(
                "store.connect_timeout_ms must be between 1 and 60000".into(),
            ));
        }
        if !(1..=60000).contains(&self.socket_timeout_ms) {
            return Err(HitCountError::Config(
                "store.socket_timeout_ms must be between 1 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }
}

fn default_host() -> String {
    "redis".into()
}
fn default_port() -> u16 {
    6379
}
fn default_key() -> String {
    "hits".into()
}
fn default_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetrySection {
    pub fn validate(&self) -> Result<()> {
        if self.retries > 100 {
            return Err(HitCountError::Config("retry.retries must be at most 100".into()));
        }
        if self.backoff_ms > 60000 {
            return Err(HitCountError::Config("retry.backoff_ms must be at most 60000".into()));
        }
        Ok(())
    }

    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_millis(self.backoff_ms))
    }
}

fn default_retries() -> u32 {
    hitcount_core::retry::DEFAULT_RETRIES
}
fn default_backoff_ms() -> u64 {
    hitcount_core::retry::DEFAULT_BACKOFF.as_millis() as u64
}
