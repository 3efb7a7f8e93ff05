//! Server settings, with defaults and environment overrides.

use std::path::PathBuf;
use std::time::Duration;

/// Everything needed to stand up a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address. Env: `WORDFORGE_BIND`. Default `0.0.0.0:1337`.
    pub bind_addr: String,
    /// The single browser origin allowed to connect, or `None` for any.
    /// Env: `ORIGIN_URL`.
    pub allowed_origin: Option<String>,
    /// Dictionary, one word per line. Env: `WORDFORGE_WORDS`.
    /// Default `words.txt`.
    pub words_path: PathBuf,
    /// Idle time before a game is evicted.
    /// Env: `WORDFORGE_SESSION_TTL_SECS`. Default 5 s.
    pub session_ttl: Duration,
    /// Time between eviction sweeps.
    /// Env: `WORDFORGE_SWEEP_INTERVAL_SECS`. Default 15 min.
    pub sweep_interval: Duration,
    /// A connection that sends nothing for this long is closed.
    /// Env: `WORDFORGE_IDLE_TIMEOUT_SECS`. Default 60 s.
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:1337".to_string(),
            allowed_origin: None,
            words_path: PathBuf::from("words.txt"),
            session_ttl: Duration::from_secs(5),
            sweep_interval: Duration::from_secs(15 * 60),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

/// A setting was present but unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl ServerConfig {
    /// Defaults overridden by whatever is set in the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("WORDFORGE_BIND") {
            config.bind_addr = addr;
        }
        if let Some(origin) = get("ORIGIN_URL") {
            config.allowed_origin = Some(origin);
        }
        if let Some(path) = get("WORDFORGE_WORDS") {
            config.words_path = PathBuf::from(path);
        }
        if let Some(value) = get("WORDFORGE_SESSION_TTL_SECS") {
            config.session_ttl = parse_secs("WORDFORGE_SESSION_TTL_SECS", value)?;
        }
        if let Some(value) = get("WORDFORGE_SWEEP_INTERVAL_SECS") {
            config.sweep_interval = parse_secs("WORDFORGE_SWEEP_INTERVAL_SECS", value)?;
        }
        if let Some(value) = get("WORDFORGE_IDLE_TIMEOUT_SECS") {
            config.idle_timeout = parse_secs("WORDFORGE_IDLE_TIMEOUT_SECS", value)?;
        }

        Ok(config)
    }
}

fn parse_secs(key: &'static str, value: String) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::Invalid { key, value })
}
