//! Subscription lifecycle for the settings screen.
//!
//! # Design
//! - `start` subscribes to every observed key before spawning, so the
//!   replayed values reflect the store at attach time.
//! - One Tokio task merges the preference streams and the surface's events
//!   and handles them one at a time; pending changes win over events.
//! - `flush` is answered only once nothing is pending, so callers can wait
//!   for earlier events and the writes they caused.
//! - The handle aborts the task on `stop` and on drop, which drops every
//!   stream and with it every subscription.

use std::sync::Arc;

use blocking_prefs::{PrefKey, PreferenceStore, PreferenceStream};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::{StreamExt, StreamMap};
use tracing::{debug, error, info};

use crate::events::SettingsEvent;
use crate::manager::{ManagerLabeler, default_labeler};
use crate::session::SettingsSession;
use crate::state::DisplayState;
use crate::surface::{BlockingClient, PresentationSurface, SpamFilterReset};
use crate::tuning::TuningTables;

/// Keys the settings screen derives its state from.
pub const OBSERVED_KEYS: [PrefKey; 6] = [
    PrefKey::BlockingManager,
    PrefKey::Drop,
    PrefKey::SpamSwitch,
    PrefKey::QueueSize,
    PrefKey::ReceiveWindow,
    PrefKey::PauseTime,
];

/// Collaborators and configuration supplied at construction.
#[derive(Clone)]
pub struct SynchronizerDeps {
    /// Shared preference store.
    pub prefs: Arc<dyn PreferenceStore>,
    /// Fixed option tables for the spam filter thresholds.
    pub tables: Arc<TuningTables>,
    /// Label resolution for blocking backends.
    pub labeler: ManagerLabeler,
    /// External blocking backend.
    pub blocking_client: Arc<dyn BlockingClient>,
    /// Spam detection reset hook.
    pub spam_filter: Arc<dyn SpamFilterReset>,
}

impl SynchronizerDeps {
    /// Dependencies using the standard tables and English labels.
    #[must_use]
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        blocking_client: Arc<dyn BlockingClient>,
        spam_filter: Arc<dyn SpamFilterReset>,
    ) -> Self {
        Self {
            prefs,
            tables: Arc::new(TuningTables::standard()),
            labeler: default_labeler(),
            blocking_client,
            spam_filter,
        }
    }

    /// Replace the tuning tables.
    #[must_use]
    pub fn with_tables(mut self, tables: TuningTables) -> Self {
        self.tables = Arc::new(tables);
        self
    }

    /// Replace the manager labeler.
    #[must_use]
    pub fn with_labeler(mut self, labeler: ManagerLabeler) -> Self {
        self.labeler = labeler;
        self
    }
}

/// Entry point that attaches the settings logic to a presentation surface.
pub struct SettingsSynchronizer {
    deps: SynchronizerDeps,
}

impl SettingsSynchronizer {
    /// Construct a synchronizer from its collaborators.
    #[must_use]
    pub const fn new(deps: SynchronizerDeps) -> Self {
        Self { deps }
    }

    /// Subscribe to the observed keys and start routing `events` from `surface`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn start(
        &self,
        surface: Arc<dyn PresentationSurface>,
        events: mpsc::Receiver<SettingsEvent>,
    ) -> SyncHandle {
        let mut changes = StreamMap::with_capacity(OBSERVED_KEYS.len());
        for key in OBSERVED_KEYS {
            changes.insert(key, self.deps.prefs.observe(key));
        }

        let session = SettingsSession::new(&self.deps, surface);
        let (state_tx, state_rx) = watch::channel(session.state().clone());
        let (flush_tx, flush_rx) = mpsc::channel(1);
        let task = tokio::spawn(run_session(session, changes, events, flush_rx, state_tx));
        info!(keys = OBSERVED_KEYS.len(), "blocking settings synchronizer started");

        SyncHandle {
            task,
            state: state_rx,
            flushes: flush_tx,
        }
    }
}

async fn run_session(
    mut session: SettingsSession,
    mut changes: StreamMap<PrefKey, PreferenceStream>,
    mut events: mpsc::Receiver<SettingsEvent>,
    mut flushes: mpsc::Receiver<oneshot::Sender<()>>,
    state: watch::Sender<DisplayState>,
) {
    let mut events_open = true;
    loop {
        tokio::select! {
            biased;
            Some((key, value)) = changes.next() => {
                if let Err(err) = session.apply_change(key, value) {
                    error!(key = %key, value = %value, error = ?err, "preference change rejected");
                    continue;
                }
                state.send_replace(session.state().clone());
            }
            event = events.recv(), if events_open => match event {
                Some(event) => {
                    if let Err(err) = session.handle_event(event) {
                        error!(event = event.kind(), error = ?err, "settings event failed");
                    }
                }
                None => {
                    debug!("settings event stream closed");
                    events_open = false;
                }
            },
            Some(ack) = flushes.recv() => {
                let _ = ack.send(());
            }
            else => break,
        }
    }
    debug!("blocking settings synchronizer exhausted its inputs");
}

/// Running synchronizer; stopping or dropping it releases every subscription.
pub struct SyncHandle {
    task: JoinHandle<()>,
    state: watch::Receiver<DisplayState>,
    flushes: mpsc::Sender<oneshot::Sender<()>>,
}

impl SyncHandle {
    /// Latest state pushed to the surface.
    #[must_use]
    pub fn state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Receiver that changes whenever the surface is re-rendered.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<DisplayState> {
        self.state.clone()
    }

    /// Whether the background task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Wait until every event sent before this call, and every preference
    /// change it caused, has been handled.
    ///
    /// Returns `false` when the background task is gone.
    pub async fn flush(&self) -> bool {
        let (ack, done) = oneshot::channel();
        if self.flushes.send(ack).await.is_err() {
            return false;
        }
        done.await.is_ok()
    }

    /// Stop the synchronizer and wait until its subscriptions are released.
    pub async fn stop(mut self) {
        self.task.abort();
        if let Err(err) = (&mut self.task).await {
            if !err.is_cancelled() {
                error!(error = %err, "blocking settings synchronizer task failed");
            }
        }
        info!("blocking settings synchronizer stopped");
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
