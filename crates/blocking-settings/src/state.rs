//! Display state pushed to the presentation surface.

use serde::Serialize;

use crate::manager::{ManagerKind, ManagerLabeler};
use crate::tuning::{TuningKind, TuningTable, TuningTables};

/// Row summary and dialog selection for one tuning threshold.
///
/// `summary_label` is always the label of the option at `selected_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TuningSelection {
    /// Label of the selected option.
    pub summary_label: String,
    /// Position of the selected option in its table.
    pub selected_index: usize,
}

impl TuningSelection {
    fn first_of(table: &TuningTable) -> Self {
        Self {
            summary_label: table
                .options()
                .first()
                .map(|option| option.label.clone())
                .unwrap_or_default(),
            selected_index: 0,
        }
    }
}

/// Everything the settings screen renders, replaced wholesale on each change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    /// Label of the active blocking backend.
    pub blocking_manager_label: String,
    /// Whether blocked messages are dropped.
    pub drop_enabled: bool,
    /// Whether the spam filter is on.
    pub spam_filter_enabled: bool,
    /// Queue size selection.
    pub queue_size: TuningSelection,
    /// Receive window selection.
    pub receive_window: TuningSelection,
    /// Pause time selection.
    pub pause_time: TuningSelection,
}

impl DisplayState {
    /// State shown before any preference has been read: the built-in manager
    /// and the first option of every table.
    #[must_use]
    pub fn initial(tables: &TuningTables, labeler: &ManagerLabeler) -> Self {
        Self {
            blocking_manager_label: labeler(ManagerKind::Qksms),
            drop_enabled: false,
            spam_filter_enabled: false,
            queue_size: TuningSelection::first_of(tables.get(TuningKind::QueueSize)),
            receive_window: TuningSelection::first_of(tables.get(TuningKind::ReceiveWindow)),
            pause_time: TuningSelection::first_of(tables.get(TuningKind::PauseTime)),
        }
    }

    /// Selection for `kind`.
    #[must_use]
    pub const fn tuning(&self, kind: TuningKind) -> &TuningSelection {
        match kind {
            TuningKind::QueueSize => &self.queue_size,
            TuningKind::ReceiveWindow => &self.receive_window,
            TuningKind::PauseTime => &self.pause_time,
        }
    }

    pub(crate) const fn tuning_mut(&mut self, kind: TuningKind) -> &mut TuningSelection {
        match kind {
            TuningKind::QueueSize => &mut self.queue_size,
            TuningKind::ReceiveWindow => &mut self.receive_window,
            TuningKind::PauseTime => &mut self.pause_time,
        }
    }

    /// Blocked messages are only browsable when they are kept.
    #[must_use]
    pub const fn messages_row_enabled(&self) -> bool {
        !self.drop_enabled
    }

    /// Tuning rows are only editable while the spam filter is on.
    #[must_use]
    pub const fn tuning_rows_enabled(&self) -> bool {
        self.spam_filter_enabled
    }
}
