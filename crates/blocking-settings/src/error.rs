//! Error types for the settings synchronizer.

use blocking_prefs::{PrefKey, PrefsError};
use thiserror::Error;

/// Primary error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A tuning table was constructed without options.
    #[error("tuning table is empty")]
    EmptyTable {
        /// Name of the offending table.
        table: &'static str,
    },
    /// A table was supplied in the slot of another threshold.
    #[error("tuning table in wrong slot")]
    MisplacedTable {
        /// Slot the table was passed for.
        slot: &'static str,
        /// Threshold the table actually configures.
        table: &'static str,
    },
    /// A stored or selected index does not address an option of its table.
    #[error("tuning index out of range")]
    IndexOutOfRange {
        /// Name of the table that was indexed.
        table: &'static str,
        /// Offending index.
        index: i64,
        /// Number of options in the table.
        len: usize,
    },
    /// A change arrived for a key the settings screen does not observe.
    #[error("preference key is not observed")]
    UnobservedKey {
        /// Key that produced the change.
        key: PrefKey,
    },
    /// Preference store operation failed.
    #[error("preference operation failed")]
    Prefs {
        /// Operation identifier.
        operation: &'static str,
        /// Source preference error.
        source: PrefsError,
    },
}

impl SettingsError {
    pub(crate) const fn prefs(operation: &'static str, source: PrefsError) -> Self {
        Self::Prefs { operation, source }
    }
}

/// Convenience alias for settings results.
pub type SettingsResult<T> = Result<T, SettingsError>;
