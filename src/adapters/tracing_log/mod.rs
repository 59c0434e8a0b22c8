// Tracing log adapter - Structured logging using tracing crate

use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;

/// Log level accepted by `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter used when `RUST_LOG` is unset: our crate at `level`, everything
/// else at warn so HTTP internals stay quiet
fn default_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(format!("warn,skipcut={}", level))
}

/// Build the filter, `RUST_LOG` winning over the flag
pub fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level))
}

/// Install the global subscriber.
///
/// A second call is harmless: the subscriber already in place is kept.
pub fn init_tracing(level: &str, json: bool) -> Result<(), DomainError> {
    let level = LogLevel::parse(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(level <= LogLevel::Debug);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }
    Ok(())
}
