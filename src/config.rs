//! Server configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file,
//! then `WARDEN_*` environment variables, then command-line flags. Each
//! layer is an [`Overrides`] value; [`Config::from_overrides`] validates
//! the merged result, falling back to the default for any out-of-range
//! number.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ROOT: &str = "./public";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_INDEX: &str = "index.html";
pub const DEFAULT_MAX_LINE_LEN: usize = crate::http::parser::MAX_LINE_LEN;

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "WARDEN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{var} must be an integer, got {value:?}")]
    Env { var: &'static str, value: String },
}

/// One layer of optional settings.
///
/// Numbers are signed so that out-of-range input (`port: -1`) reaches
/// validation instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub workers: Option<i64>,
    pub queue_capacity: Option<i64>,
    pub index: Option<String>,
    pub max_line_len: Option<i64>,
}

impl Overrides {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Read the `WARDEN_*` variables. Unset variables are left empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            root: std::env::var_os("WARDEN_ROOT").map(PathBuf::from),
            host: std::env::var("WARDEN_HOST").ok(),
            port: env_int("WARDEN_PORT")?,
            workers: env_int("WARDEN_WORKERS")?,
            queue_capacity: env_int("WARDEN_QUEUE")?,
            index: std::env::var("WARDEN_INDEX").ok(),
            max_line_len: env_int("WARDEN_MAX_LINE")?,
        })
    }

    /// Layer `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: Overrides) -> Self {
        Self {
            root: other.root.or(self.root),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            workers: other.workers.or(self.workers),
            queue_capacity: other.queue_capacity.or(self.queue_capacity),
            index: other.index.or(self.index),
            max_line_len: other.max_line_len.or(self.max_line_len),
        }
    }
}

fn env_int(var: &'static str) -> Result<Option<i64>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
        Err(_) => Ok(None),
    }
}

/// Validated server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory files are served from (canonicalized at startup)
    pub root: PathBuf,
    pub host: String,
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Accepted connections that may wait for a worker
    pub queue_capacity: usize,
    /// Document served for `/`
    pub index: String,
    /// Longest accepted request or header line
    pub max_line_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            index: DEFAULT_INDEX.to_string(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl Config {
    /// Defaults, then the config file (`config_file`, or `WARDEN_CONFIG`
    /// when none is given), then the environment, then `cli`.
    pub fn load_with(config_file: Option<&Path>, cli: Overrides) -> Result<Self, ConfigError> {
        let file = match config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        {
            Some(path) => Overrides::from_file(&path)?,
            None => Overrides::default(),
        };

        let merged = file.merge(Overrides::from_env()?).merge(cli);
        Ok(Self::from_overrides(merged))
    }

    /// Apply overrides to the defaults, replacing invalid values.
    pub fn from_overrides(o: Overrides) -> Self {
        let defaults = Self::default();

        let index = match o.index {
            Some(index) if !index.trim().is_empty() => index,
            Some(_) => {
                tracing::warn!(default = DEFAULT_INDEX, "Empty index document, using default");
                defaults.index
            }
            None => defaults.index,
        };

        Self {
            root: o.root.unwrap_or(defaults.root),
            host: o.host.unwrap_or(defaults.host),
            port: o.port.map_or(defaults.port, |port| {
                match u16::try_from(port) {
                    Ok(port) if port > 0 => port,
                    _ => {
                        tracing::warn!(port, default = DEFAULT_PORT, "Invalid port, using default");
                        DEFAULT_PORT
                    }
                }
            }),
            workers: positive("workers", o.workers, DEFAULT_WORKERS),
            queue_capacity: positive("queue_capacity", o.queue_capacity, DEFAULT_QUEUE_CAPACITY),
            index,
            max_line_len: positive("max_line_len", o.max_line_len, DEFAULT_MAX_LINE_LEN),
        }
    }

    /// `host:port` string handed to the listener.
    pub fn listen_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn positive(name: &'static str, value: Option<i64>, default: usize) -> usize {
    match value {
        None => default,
        Some(v) if v > 0 => usize::try_from(v).unwrap_or(default),
        Some(v) => {
            tracing::warn!(setting = name, value = v, default, "Value must be positive, using default");
            default
        }
    }
}
