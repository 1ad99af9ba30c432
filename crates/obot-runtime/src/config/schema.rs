//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use obot_framework::RouterOptions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
///
/// ```toml
/// [router]
/// prefix = "ob"
///
/// [logging]
/// level = "debug"
///
/// [adapters.console]
/// user = "alice"
///
/// [actions.nasa]
/// api_key = "DEMO_KEY"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ObotConfig {
    /// Command grammar settings.
    pub router: RouterOptions,

    /// Dispatch loop settings.
    pub runtime: RuntimeConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Per-adapter sections, keyed by adapter name.
    pub adapters: HashMap<String, serde_json::Value>,

    /// Per-action sections, keyed by action name.
    pub actions: HashMap<String, serde_json::Value>,
}

impl ObotConfig {
    /// Deserializes the `adapters.<name>` section, or returns `T::default()`
    /// when it is absent.
    pub fn adapter_config<T>(&self, name: &str) -> ConfigResult<T>
    where
        T: DeserializeOwned + Default,
    {
        section(&self.adapters, "adapters", name)
    }

    /// Deserializes the `actions.<name>` section, or returns `T::default()`
    /// when it is absent.
    pub fn action_config<T>(&self, name: &str) -> ConfigResult<T>
    where
        T: DeserializeOwned + Default,
    {
        section(&self.actions, "actions", name)
    }
}

fn section<T>(map: &HashMap<String, serde_json::Value>, table: &str, name: &str) -> ConfigResult<T>
where
    T: DeserializeOwned + Default,
{
    match map.get(name) {
        Some(value) => T::deserialize(value)
            .map_err(|e| ConfigError::section(format!("{table}.{name}"), e)),
        None => Ok(T::default()),
    }
}

/// Dispatch loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Capacity of the adapter's inbound message channel.
    pub inbound_buffer: usize,

    /// How long shutdown waits for in-flight dispatches, in milliseconds.
    pub shutdown_grace_ms: u64,
}

impl RuntimeConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inbound_buffer: 64,
            shutdown_grace_ms: 5000,
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to compact otherwise.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level; `RUST_LOG` takes precedence when set.
    pub level: LogLevel,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file, required when `output = "file"`.
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `obot_framework = "debug"`.
    pub filters: HashMap<String, LogLevel>,

    pub span_events: SpanEventConfig,

    /// Include thread ids in log lines.
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    pub file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            filters: HashMap::new(),
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
        }
    }
}
