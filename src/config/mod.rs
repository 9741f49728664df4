use serde::Deserialize;
use std::{env, fs, path::Path};
use thiserror::Error;

/// Queue construction settings.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct QueueSettings {
    /// Serialize enqueues against each other and dequeues against each other.
    pub thread_safe: bool,
}

/// Workload knobs for the `obsq-demo` driver.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DemoSettings {
    pub producers: usize,
    pub items_per_producer: usize,
    pub consumers: usize,
    /// Consumers peek before every N-th dequeue; 0 disables peeking.
    pub peek_every: usize,
    /// Sleep between operations, in milliseconds.
    pub pause_ms: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            producers: 2,
            items_per_producer: 50,
            consumers: 2,
            peek_every: 5,
            pause_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub queue: QueueSettings,
    pub demo: DemoSettings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config parse error: {0}")]
    Parse(String),
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let raw: String = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&raw)?;
    Ok(config)
}

impl Config {
    /// Load configuration from an optional file path and environment variables.
    ///
    /// The path comes from `path`, falling back to `OBSQ_CONFIG`; with neither
    /// set, defaults are used. `OBSQ_THREAD_SAFE` overrides the file value.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let effective_path = path
            .map(str::to_owned)
            .or_else(|| env::var("OBSQ_CONFIG").ok());

        let mut config = match effective_path {
            Some(p) => load_config(p)?,
            None => Config::default(),
        };

        if let Ok(v) = env::var("OBSQ_THREAD_SAFE") {
            config.queue.thread_safe = parse_bool("OBSQ_THREAD_SAFE", &v)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Parse(format!(
            "{key}: expected a boolean, got {other:?}"
        ))),
    }
}
