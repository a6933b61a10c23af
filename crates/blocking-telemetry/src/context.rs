//! Span tagging the console host's own log lines with the preference file
//! and build version. Spawned tasks do not inherit it.

use std::path::Path;

use tracing::span::EnteredSpan;

use crate::init::build_version;

/// Keeps the `host` span entered until dropped.
#[derive(Debug)]
pub struct HostSpanGuard {
    _span: EnteredSpan,
}

impl HostSpanGuard {
    /// Enter a span naming the host, the preference file it serves, and the
    /// build version.
    #[must_use]
    pub fn enter(host: &'static str, prefs: &Path) -> Self {
        let span = tracing::info_span!(
            "host",
            host,
            prefs = %prefs.display(),
            version = %build_version(),
        );
        Self {
            _span: span.entered(),
        }
    }
}
