//! State derivation and event routing for one attached surface.
//!
//! # Design
//! - A session owns the latest `DisplayState` and pushes a full copy to the
//!   surface after every applied change.
//! - Tuning changes write the resolved value into a separate key, so the
//!   write is never observed as a new index.
//! - Events read preferences directly; the display state is output only.

use std::sync::Arc;

use blocking_prefs::{PrefKey, PrefValue, PreferenceStore, PreferenceStoreExt, PrefsError};
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};
use crate::events::SettingsEvent;
use crate::manager::{ManagerKind, ManagerLabeler};
use crate::state::{DisplayState, TuningSelection};
use crate::surface::{BlockingClient, NavTarget, PresentationSurface, SpamFilterReset};
use crate::synchronizer::SynchronizerDeps;
use crate::tuning::{TuningKind, TuningTables};

/// Settings screen logic bound to a single presentation surface.
pub struct SettingsSession {
    prefs: Arc<dyn PreferenceStore>,
    tables: Arc<TuningTables>,
    labeler: ManagerLabeler,
    blocking_client: Arc<dyn BlockingClient>,
    spam_filter: Arc<dyn SpamFilterReset>,
    surface: Arc<dyn PresentationSurface>,
    state: DisplayState,
}

impl SettingsSession {
    /// Bind `surface` to the collaborators in `deps`.
    #[must_use]
    pub fn new(deps: &SynchronizerDeps, surface: Arc<dyn PresentationSurface>) -> Self {
        let state = DisplayState::initial(&deps.tables, &deps.labeler);
        Self {
            prefs: Arc::clone(&deps.prefs),
            tables: Arc::clone(&deps.tables),
            labeler: Arc::clone(&deps.labeler),
            blocking_client: Arc::clone(&deps.blocking_client),
            spam_filter: Arc::clone(&deps.spam_filter),
            surface,
            state,
        }
    }

    /// Latest derived state.
    #[must_use]
    pub const fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Fold a value emitted for `key` into the display state and render it.
    ///
    /// # Errors
    ///
    /// Returns an error when the value has the wrong kind, when a tuning
    /// index does not address its table, when `key` is not one of the
    /// observed keys, or when the derived value cannot be written. The state
    /// is left untouched and nothing is rendered in those cases.
    pub fn apply_change(&mut self, key: PrefKey, value: PrefValue) -> SettingsResult<()> {
        match key {
            PrefKey::BlockingManager => {
                let kind = ManagerKind::from_code(expect_int(key, value)?);
                self.state.blocking_manager_label = (self.labeler)(kind);
            }
            PrefKey::Drop => self.state.drop_enabled = expect_bool(key, value)?,
            PrefKey::SpamSwitch => self.state.spam_filter_enabled = expect_bool(key, value)?,
            PrefKey::QueueSize | PrefKey::ReceiveWindow | PrefKey::PauseTime => {
                let kind =
                    TuningKind::from_index_key(key).ok_or(SettingsError::UnobservedKey { key })?;
                self.apply_tuning(kind, expect_int(key, value)?)?;
            }
            PrefKey::QueueSizeValue | PrefKey::ReceiveWindowValue | PrefKey::PauseTimeValue => {
                return Err(SettingsError::UnobservedKey { key });
            }
        }
        debug!(key = %key, value = %value, "preference change applied");
        self.surface.render(&self.state);
        Ok(())
    }

    fn apply_tuning(&mut self, kind: TuningKind, index: i64) -> SettingsResult<()> {
        let (selected_index, option) = self.tables.get(kind).option(index)?;
        let stored_value = option.stored_value;
        let selection = TuningSelection {
            summary_label: option.label.clone(),
            selected_index,
        };
        self.prefs
            .set_int(kind.value_key(), stored_value)
            .map_err(|err| SettingsError::prefs("tuning.write_value", err))?;
        *self.state.tuning_mut(kind) = selection;
        debug!(
            table = kind.name(),
            index = selected_index,
            stored_value,
            "tuning value resolved"
        );
        Ok(())
    }

    /// Route a user action to preference writes, dialogs, or navigation.
    ///
    /// # Errors
    ///
    /// Returns an error when a preference cannot be read or written, or when
    /// a selected index does not address its table (nothing is written then).
    pub fn handle_event(&self, event: SettingsEvent) -> SettingsResult<()> {
        debug!(event = event.kind(), "settings event received");
        match event {
            SettingsEvent::ManagerRowClicked => {
                self.surface.navigate_to(NavTarget::ManagerChooser);
            }
            SettingsEvent::NumbersRowClicked => self.open_blocked_numbers()?,
            SettingsEvent::MessagesRowClicked => {
                self.surface.navigate_to(NavTarget::MessagesScreen);
            }
            SettingsEvent::DropRowClicked => {
                self.prefs
                    .toggle(PrefKey::Drop)
                    .map_err(|err| SettingsError::prefs("drop.toggle", err))?;
            }
            SettingsEvent::SpamSwitchClicked => self.toggle_spam_filter()?,
            SettingsEvent::QueueSizeRowClicked => self.open_dialog(TuningKind::QueueSize),
            SettingsEvent::ReceiveWindowRowClicked => self.open_dialog(TuningKind::ReceiveWindow),
            SettingsEvent::PauseTimeRowClicked => self.open_dialog(TuningKind::PauseTime),
            SettingsEvent::QueueSizeSelected(index) => self.select(TuningKind::QueueSize, index)?,
            SettingsEvent::ReceiveWindowSelected(index) => {
                self.select(TuningKind::ReceiveWindow, index)?;
            }
            SettingsEvent::PauseTimeSelected(index) => self.select(TuningKind::PauseTime, index)?,
        }
        Ok(())
    }

    fn open_blocked_numbers(&self) -> SettingsResult<()> {
        let code = self
            .prefs
            .get_int(PrefKey::BlockingManager)
            .map_err(|err| SettingsError::prefs("numbers.read_manager", err))?;
        if ManagerKind::from_code(code) == ManagerKind::Qksms {
            self.surface.navigate_to(NavTarget::NumbersScreen);
        } else {
            self.blocking_client.open_settings();
        }
        Ok(())
    }

    fn toggle_spam_filter(&self) -> SettingsResult<()> {
        let enabled = self
            .prefs
            .get_bool(PrefKey::SpamSwitch)
            .map_err(|err| SettingsError::prefs("spam_switch.read", err))?;
        if enabled {
            self.spam_filter.reset_block();
        }
        self.prefs
            .set_bool(PrefKey::SpamSwitch, !enabled)
            .map_err(|err| SettingsError::prefs("spam_switch.write", err))
    }

    fn open_dialog(&self, kind: TuningKind) {
        self.surface.show_dialog(kind.dialog());
    }

    fn select(&self, kind: TuningKind, index: usize) -> SettingsResult<()> {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        self.tables.get(kind).option(index)?;
        self.prefs
            .set_int(kind.index_key(), index)
            .map_err(|err| SettingsError::prefs("tuning.write_index", err))
    }
}

fn expect_int(key: PrefKey, value: PrefValue) -> SettingsResult<i64> {
    value.as_int().ok_or_else(|| {
        SettingsError::prefs(
            "apply_change",
            PrefsError::TypeMismatch {
                key,
                expected: key.kind(),
                found: value.kind(),
            },
        )
    })
}

fn expect_bool(key: PrefKey, value: PrefValue) -> SettingsResult<bool> {
    value.as_bool().ok_or_else(|| {
        SettingsError::prefs(
            "apply_change",
            PrefsError::TypeMismatch {
                key,
                expected: key.kind(),
                found: value.kind(),
            },
        )
    })
}
