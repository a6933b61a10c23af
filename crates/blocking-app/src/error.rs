//! # Design
//!
//! - Centralize console host errors for bootstrap and the command loop.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Command parse failures are reported to the operator, not propagated.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Preference store or file operations failed.
    #[error("preference operation failed")]
    Prefs {
        /// Operation identifier.
        operation: &'static str,
        /// Source preference error.
        source: blocking_prefs::PrefsError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: blocking_telemetry::TelemetryError,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Optional path involved in the failure.
        path: Option<PathBuf>,
        /// Source IO error.
        source: io::Error,
    },
    /// The settings synchronizer stopped before the console did.
    #[error("settings synchronizer stopped")]
    SynchronizerStopped {
        /// Operation identifier.
        operation: &'static str,
    },
}

impl AppError {
    pub(crate) const fn prefs(operation: &'static str, source: blocking_prefs::PrefsError) -> Self {
        Self::Prefs { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: blocking_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }
}

/// Reasons a console line could not be turned into a command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a known command.
    #[error("unknown command")]
    Unknown {
        /// Word that was not recognised.
        value: String,
    },
    /// The option index was not a non-negative integer.
    #[error("invalid option index")]
    InvalidIndex {
        /// Command the index was given to.
        command: &'static str,
        /// Raw argument.
        value: String,
    },
    /// The command takes fewer arguments than were given.
    #[error("unexpected argument")]
    UnexpectedArgument {
        /// Command that received the argument.
        command: &'static str,
        /// First surplus argument.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocking_prefs::PrefKey;

    #[test]
    fn app_error_helpers_build_variants() {
        let prefs = AppError::prefs(
            "preference_file.load",
            blocking_prefs::PrefsError::TypeMismatch {
                key: PrefKey::Drop,
                expected: blocking_prefs::PrefKind::Bool,
                found: blocking_prefs::PrefKind::Int,
            },
        );
        assert!(matches!(
            prefs,
            AppError::Prefs {
                operation: "preference_file.load",
                ..
            }
        ));

        let telemetry = AppError::telemetry(
            "telemetry.init",
            blocking_telemetry::TelemetryError::UnknownFormat {
                value: "xml".to_string(),
            },
        );
        assert_eq!(telemetry.to_string(), "telemetry operation failed");
    }
}
