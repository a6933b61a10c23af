//! JSON preference file used to persist the store between runs.
//!
//! # Design
//! - A missing file means "first run" and yields defaults.
//! - Malformed documents, unknown keys, and kind mismatches are errors.
//! - Saves go through a sibling temp file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PrefsError, PrefsResult};
use crate::model::{PrefKey, PrefValue};
use crate::store::MemoryPreferences;

/// On-disk preference document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferenceFile {
    /// When the document was written.
    pub saved_at: DateTime<Utc>,
    /// Stored values keyed by preference name.
    pub values: BTreeMap<PrefKey, PrefValue>,
}

impl PreferenceFile {
    /// Capture the current contents of `store`.
    #[must_use]
    pub fn capture(store: &MemoryPreferences) -> Self {
        Self {
            saved_at: Utc::now(),
            values: store.snapshot(),
        }
    }

    /// Load a store from `path`, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid preference
    /// document, or holds a value of the wrong kind.
    pub fn load(path: &Path) -> PrefsResult<MemoryPreferences> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "preference file absent; using defaults");
                return Ok(MemoryPreferences::new());
            }
            Err(source) => {
                return Err(PrefsError::Io {
                    operation: "preference_file.read",
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let document: Self = serde_json::from_str(&raw).map_err(|source| PrefsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            saved_at = %document.saved_at,
            entries = document.values.len(),
            "preference file loaded"
        );
        MemoryPreferences::with_values(document.values)
    }

    /// Persist the current contents of `store` to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    pub fn save(path: &Path, store: &MemoryPreferences) -> PrefsResult<()> {
        let document = Self::capture(store);
        let encoded = serde_json::to_string_pretty(&document)
            .map_err(|source| PrefsError::Encode { source })?;

        let staging = staging_path(path);
        fs::write(&staging, encoded).map_err(|source| PrefsError::Io {
            operation: "preference_file.write",
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, path).map_err(|source| PrefsError::Io {
            operation: "preference_file.rename",
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "preference file saved");
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
