//! Recording presentation surface and counting collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use blocking_prefs::{MemoryPreferences, PrefKey, PreferenceStoreExt};
use blocking_settings::{
    BlockingClient, DialogKind, DisplayState, NavTarget, PresentationSurface, SpamFilterReset,
};

/// A single call observed by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `render` with the given state.
    Render(DisplayState),
    /// `show_dialog` with the given kind.
    Dialog(DialogKind),
    /// `navigate_to` with the given target.
    Navigate(NavTarget),
}

/// Surface that records every call in order.
#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    /// Fresh recorder behind an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.lock().clone()
    }

    /// Most recent rendered state.
    #[must_use]
    pub fn last_render(&self) -> Option<DisplayState> {
        self.lock().iter().rev().find_map(|call| match call {
            SurfaceCall::Render(state) => Some(state.clone()),
            _ => None,
        })
    }

    /// Number of `render` calls.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Render(_)))
            .count()
    }

    /// Dialog requests in order.
    #[must_use]
    pub fn dialogs(&self) -> Vec<DialogKind> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Dialog(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Navigation requests in order.
    #[must_use]
    pub fn navigations(&self) -> Vec<NavTarget> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Navigate(target) => Some(*target),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SurfaceCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, call: SurfaceCall) {
        self.lock().push(call);
    }
}

impl PresentationSurface for RecordingSurface {
    fn render(&self, state: &DisplayState) {
        self.push(SurfaceCall::Render(state.clone()));
    }

    fn show_dialog(&self, kind: DialogKind) {
        self.push(SurfaceCall::Dialog(kind));
    }

    fn navigate_to(&self, target: NavTarget) {
        self.push(SurfaceCall::Navigate(target));
    }
}

/// Ordered log of external collaborator calls.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<&'static str>>>,
}

impl CallLog {
    /// Append `entry`.
    pub fn record(&self, entry: &'static str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Entries in call order.
    #[must_use]
    pub fn entries(&self) -> Vec<&'static str> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Blocking client that counts `open_settings` calls.
pub struct CountingBlockingClient {
    calls: AtomicUsize,
    log: CallLog,
}

impl CountingBlockingClient {
    /// Client writing to `log`.
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            log,
        }
    }

    /// Number of `open_settings` calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BlockingClient for CountingBlockingClient {
    fn open_settings(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.record("open_settings");
    }
}

/// Spam reset hook that counts `reset_block` calls.
///
/// When built with [`CountingSpamReset::watching`], it also records the spam
/// switch value seen at the moment of each reset.
pub struct CountingSpamReset {
    calls: AtomicUsize,
    log: CallLog,
    probe: Option<MemoryPreferences>,
    switch_at_reset: Mutex<Vec<bool>>,
}

impl CountingSpamReset {
    /// Hook writing to `log`.
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            log,
            probe: None,
            switch_at_reset: Mutex::new(Vec::new()),
        }
    }

    /// Hook writing to `log` that samples the spam switch in `prefs` on every reset.
    #[must_use]
    pub fn watching(log: CallLog, prefs: MemoryPreferences) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            log,
            probe: Some(prefs),
            switch_at_reset: Mutex::new(Vec::new()),
        }
    }

    /// Number of `reset_block` calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Spam switch values sampled at each reset.
    #[must_use]
    pub fn switch_at_reset(&self) -> Vec<bool> {
        self.switch_at_reset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SpamFilterReset for CountingSpamReset {
    fn reset_block(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.record("reset_block");
        if let Some(enabled) = self
            .probe
            .as_ref()
            .and_then(|prefs| prefs.get_bool(PrefKey::SpamSwitch).ok())
        {
            self.switch_at_reset
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(enabled);
        }
    }
}
