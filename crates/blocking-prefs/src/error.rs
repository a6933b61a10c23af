//! Error types for preference operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{PrefKey, PrefKind};

/// Primary error type for preference operations.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// A value of the wrong kind was read from or written to a key.
    #[error("preference type mismatch")]
    TypeMismatch {
        /// Key involved in the operation.
        key: PrefKey,
        /// Kind declared by the key.
        expected: PrefKind,
        /// Kind of the offending value.
        found: PrefKind,
    },
    /// File system operation failed.
    #[error("preference file operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Preference file contents could not be parsed.
    #[error("invalid preference file")]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// Preference snapshot could not be encoded.
    #[error("failed to encode preference file")]
    Encode {
        /// Source serde error.
        source: serde_json::Error,
    },
}

/// Convenience alias for preference results.
pub type PrefsResult<T> = Result<T, PrefsError>;
