//! Logging configuration for txnkit
//!
//! The coordinator emits `tracing` events at each propagation decision and
//! completion. This module configures a global subscriber for applications
//! that do not bring their own.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a daily-rotated file
    File(std::path::PathBuf),
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter, overridable via `RUST_LOG`
    pub level: String,
    /// Output destination
    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
        }
    }
}

impl LogConfig {
    /// Config with info level and stdout output
    pub fn info() -> Self {
        Self::default()
    }

    /// Config with debug level, which includes every propagation decision
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            ..Default::default()
        }
    }

    /// Set the log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Send output to a daily-rotated file instead of stdout
    pub fn with_file<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Initialize global logging with this configuration.
    ///
    /// For file output, returns a guard that must be kept alive; dropping it
    /// shuts down the background log writer.
    pub fn init(self) -> Option<WorkerGuard> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .expect("Invalid log level");

        match self.output {
            LogOutput::Stdout => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().compact())
                    .init();
                None
            }
            LogOutput::File(path) => {
                let file_appender = tracing_appender::rolling::daily(
                    path.parent().unwrap_or_else(|| std::path::Path::new(".")),
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("txnkit.log"),
                );
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_writer(non_blocking).compact())
                    .init();
                Some(guard)
            }
        }
    }
}
