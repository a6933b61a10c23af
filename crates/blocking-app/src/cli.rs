//! Command-line flags for the console host.

use std::path::PathBuf;

use blocking_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig};
use clap::{Parser, ValueEnum};

/// Default location of the preference file.
pub const DEFAULT_PREFS_PATH: &str = "blocking-prefs.json";

/// Flags accepted by the `blocking-console` binary.
#[derive(Debug, Parser)]
#[command(
    name = "blocking-console",
    about = "Headless SMS blocking settings screen driven by line commands"
)]
pub struct Cli {
    /// JSON file holding the blocking preferences.
    #[arg(long, env = "BLOCKING_PREFS", default_value = DEFAULT_PREFS_PATH)]
    pub prefs: PathBuf,
    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "BLOCKING_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
    /// Log output format; defaults to pretty in debug builds and JSON otherwise.
    #[arg(long, value_enum, env = "BLOCKING_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,
}

/// Log formats selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

impl Cli {
    /// Logging configuration derived from the flags.
    #[must_use]
    pub fn logging(&self) -> LoggingConfig<'_> {
        LoggingConfig {
            level: &self.log_level,
            format: self.log_format.map_or_else(LogFormat::infer, LogFormat::from),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
