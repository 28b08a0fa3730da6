//! Logging setup for applications embedding crossgate.
//!
//! The library crates only emit `tracing` events; nothing is printed until a
//! subscriber is installed. [`init_logging`] installs one built from a
//! [`LogConfig`]:
//!
//! | Field | Effect |
//! |-------|--------|
//! | `level` | Minimum level, overridden by `RUST_LOG` when set |
//! | `format` | `pretty` for terminals, `json` for log collectors |
//! | `file_path` | Also write to a daily-rotated file in that directory |
//! | `include_target` | Print the emitting module path |
//! | `include_timestamps` | Prefix events with a timestamp |
//!
//! # Example
//!
//! ```no_run
//! use crossgate::logging::{init_logging, LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! let _guard = init_logging(&config).expect("logging");
//! tracing::info!(chain = "ETH", "ready");
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt as subscriber_fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name prefix of rotated log files.
pub const LOG_FILE_PREFIX: &str = "crossgate.log";

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log directory could not be created.
    #[error("failed to create log directory '{path}': {source}")]
    FileCreation {
        /// Directory that was requested.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber is already installed.
    #[error("failed to initialize subscriber: {0}")]
    SubscriberInit(String),

    /// The level or filter directive is malformed.
    #[error("invalid log configuration: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// Levels and formats
// ============================================================================

/// Minimum severity to record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-field encoding detail.
    Trace,
    /// Builder decisions such as tip clamping.
    Debug,
    /// Pipeline progress.
    #[default]
    Info,
    /// Fallbacks and rejected inputs.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(LogError::InvalidConfig(format!("unknown log level '{other}'"))),
        }
    }
}

/// Output format of the console and file layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Returns the configuration name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(LogError::InvalidConfig(format!("unknown log format '{other}'"))),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Subscriber settings, the `[logging]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Directory for rotated log files, console only when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    /// Print the emitting module path.
    pub include_target: bool,
    /// Prefix events with a timestamp.
    pub include_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            file_path: None,
            include_target: true,
            include_timestamps: true,
        }
    }
}

impl LogConfig {
    /// Builds the level filter, preferring `RUST_LOG` when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`] if the fallback directive is rejected.
    pub fn env_filter(&self) -> Result<EnvFilter, LogError> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.level.as_str()))
            .map_err(|e| LogError::InvalidConfig(e.to_string()))
    }
}

/// Keeps the background file writer alive.
///
/// Dropping the guard flushes buffered file output.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    guard: Option<WorkerGuard>,
}

impl LogGuard {
    /// Returns `true` if events are also written to a file.
    #[must_use]
    pub const fn writes_file(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogGuard")
            .field("writes_file", &self.writes_file())
            .finish()
    }
}

// ============================================================================
// Initialization
// ============================================================================

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer(config: &LogConfig) -> BoxedLayer {
    let layer = subscriber_fmt::layer().with_target(config.include_target);
    match (config.format, config.include_timestamps) {
        (LogFormat::Pretty, true) => layer.pretty().boxed(),
        (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
        (LogFormat::Json, true) => layer.json().boxed(),
        (LogFormat::Json, false) => layer.json().without_time().boxed(),
    }
}

fn file_layer(
    config: &LogConfig,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> BoxedLayer {
    let layer = subscriber_fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(config.include_target);
    match config.format {
        LogFormat::Pretty => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// - [`LogError::InvalidConfig`] for a malformed filter
/// - [`LogError::FileCreation`] if the log directory cannot be created
/// - [`LogError::SubscriberInit`] if a subscriber is already installed
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = config.env_filter()?;
    let mut layers: Vec<BoxedLayer> = vec![console_layer(config)];

    let guard = match &config.file_path {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LogError::FileCreation {
                path: dir.display().to_string(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(file_layer(config, writer));
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    Ok(LogGuard { guard })
}
