//! Fixtures and polling helpers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use blocking_prefs::{MemoryPreferences, PrefKey, PrefValue};
use blocking_settings::{SynchronizerDeps, TuningKind, TuningTable, TuningTables};
use tokio::time::{Instant, sleep};

use crate::mocks::{CallLog, CountingBlockingClient, CountingSpamReset};

/// Default deadline for [`wait_until`] in integration suites.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Small tables with distinct labels and values per threshold.
///
/// # Panics
///
/// Never; every table literal is non-empty and passed in its own slot.
#[must_use]
pub fn small_tables() -> TuningTables {
    let build = |kind, pairs: &[(&str, i64)]| {
        TuningTable::from_pairs(kind, pairs.iter().copied()).expect("fixture tables are non-empty")
    };
    TuningTables::new(
        build(TuningKind::QueueSize, &[("10", 10), ("20", 20)]),
        build(
            TuningKind::ReceiveWindow,
            &[("1 minute", 60_000), ("5 minutes", 300_000)],
        ),
        build(
            TuningKind::PauseTime,
            &[("1 hour", 3_600_000), ("1 day", 86_400_000), ("1 week", 604_800_000)],
        ),
    )
    .expect("fixture tables sit in their own slots")
}

/// Store seeded with `values`.
///
/// # Panics
///
/// Panics if a value does not match its key's kind.
#[must_use]
pub fn seeded_store(values: &[(PrefKey, PrefValue)]) -> MemoryPreferences {
    MemoryPreferences::with_values(values.iter().copied()).expect("fixture values match kinds")
}

/// Collaborators wired to a shared call log.
pub struct Harness {
    /// Store under test.
    pub prefs: MemoryPreferences,
    /// Records `open_settings` calls.
    pub blocking_client: Arc<CountingBlockingClient>,
    /// Records `reset_block` calls.
    pub spam_filter: Arc<CountingSpamReset>,
    /// Ordered log shared by both collaborators.
    pub log: CallLog,
}

impl Harness {
    /// Build collaborators around `prefs`.
    #[must_use]
    pub fn new(prefs: MemoryPreferences) -> Self {
        let log = CallLog::default();
        Self {
            blocking_client: Arc::new(CountingBlockingClient::new(log.clone())),
            spam_filter: Arc::new(CountingSpamReset::watching(log.clone(), prefs.clone())),
            prefs,
            log,
        }
    }

    /// Synchronizer dependencies using [`small_tables`].
    #[must_use]
    pub fn deps(&self) -> SynchronizerDeps {
        SynchronizerDeps::new(
            Arc::new(self.prefs.clone()),
            self.blocking_client.clone(),
            self.spam_filter.clone(),
        )
        .with_tables(small_tables())
    }
}

/// Poll `predicate` until it holds or `timeout` elapses; returns the final verdict.
pub async fn wait_until<F>(timeout: Duration, mut predicate: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Let spawned tasks drain their queues before asserting on an absence.
pub async fn settle() {
    sleep(Duration::from_millis(50)).await;
}

/// Run `future` with [`WAIT_TIMEOUT`], panicking if it does not finish.
///
/// # Panics
///
/// Panics when the deadline passes first.
pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(WAIT_TIMEOUT, future)
        .await
        .expect("operation timed out")
}
