//! Server config loader (strict YAML file, then environment overrides).

pub mod schema;

use std::fs;

use hitcount_core::error::{HitCountError, Result};

pub use schema::{RetrySection, ServerConfig, ServerSection, StoreSection};

pub const ENV_CONFIG: &str = "HITCOUNT_CONFIG";
pub const ENV_LISTEN: &str = "HITCOUNT_LISTEN";
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";

/// Load the process configuration once at startup.
pub fn load() -> Result<ServerConfig> {
    load_with(|k| std::env::var(k).ok())
}

/// Same as [`load`], reading variables through `env` instead of the process
/// environment.
pub fn load_with<F>(env: F) -> Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let cfg = match env(ENV_CONFIG) {
        Some(path) => {
            tracing::info!(%path, "loading config file");
            read_file(&path)?
        }
        None => ServerConfig::default(),
    };
    let cfg = apply_env(cfg, env)?;
    cfg.validate()?;
    Ok(cfg)
}

fn read_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| HitCountError::Config(format!("read config `{path}` failed: {e}")))?;
    parse(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg = parse(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse(s: &str) -> Result<ServerConfig> {
    serde_yaml::from_str(s).map_err(|e| HitCountError::Config(format!("invalid yaml: {e}")))
}

/// Overlay environment variables on top of `cfg`. Unset variables leave the
/// file (or default) value in place.
pub fn apply_env<F>(mut cfg: ServerConfig, env: F) -> Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = env(ENV_REDIS_HOST) {
        cfg.store.host = host;
    }
    if let Some(port) = env(ENV_REDIS_PORT) {
        cfg.store.port = port.trim().parse().map_err(|e| {
            HitCountError::Config(format!("{ENV_REDIS_PORT}=`{port}` is not a valid port: {e}"))
        })?;
    }
    if let Some(listen) = env(ENV_LISTEN) {
        cfg.server.listen = listen;
    }
    Ok(cfg)
}
