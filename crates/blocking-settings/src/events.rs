//! Events raised by the presentation surface.

use tokio::sync::mpsc;

use crate::tuning::TuningKind;

/// Buffered events between the surface and a running synchronizer.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// User actions routed by the settings session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    /// Blocking manager row tapped.
    ManagerRowClicked,
    /// Blocked numbers row tapped.
    NumbersRowClicked,
    /// Blocked messages row tapped.
    MessagesRowClicked,
    /// Drop switch row tapped.
    DropRowClicked,
    /// Spam filter switch tapped.
    SpamSwitchClicked,
    /// Queue size row tapped.
    QueueSizeRowClicked,
    /// Receive window row tapped.
    ReceiveWindowRowClicked,
    /// Pause time row tapped.
    PauseTimeRowClicked,
    /// Queue size option picked in its dialog.
    QueueSizeSelected(usize),
    /// Receive window option picked in its dialog.
    ReceiveWindowSelected(usize),
    /// Pause time option picked in its dialog.
    PauseTimeSelected(usize),
}

impl SettingsEvent {
    /// Machine-friendly discriminator for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ManagerRowClicked => "manager_row_clicked",
            Self::NumbersRowClicked => "numbers_row_clicked",
            Self::MessagesRowClicked => "messages_row_clicked",
            Self::DropRowClicked => "drop_row_clicked",
            Self::SpamSwitchClicked => "spam_switch_clicked",
            Self::QueueSizeRowClicked => "queue_size_row_clicked",
            Self::ReceiveWindowRowClicked => "receive_window_row_clicked",
            Self::PauseTimeRowClicked => "pause_time_row_clicked",
            Self::QueueSizeSelected(_) => "queue_size_selected",
            Self::ReceiveWindowSelected(_) => "receive_window_selected",
            Self::PauseTimeSelected(_) => "pause_time_selected",
        }
    }

    /// Row-click event that opens the dialog for `kind`.
    #[must_use]
    pub const fn row_clicked(kind: TuningKind) -> Self {
        match kind {
            TuningKind::QueueSize => Self::QueueSizeRowClicked,
            TuningKind::ReceiveWindow => Self::ReceiveWindowRowClicked,
            TuningKind::PauseTime => Self::PauseTimeRowClicked,
        }
    }

    /// Dialog selection event for `kind`.
    #[must_use]
    pub const fn selected(kind: TuningKind, index: usize) -> Self {
        match kind {
            TuningKind::QueueSize => Self::QueueSizeSelected(index),
            TuningKind::ReceiveWindow => Self::ReceiveWindowSelected(index),
            TuningKind::PauseTime => Self::PauseTimeSelected(index),
        }
    }
}

/// Channel the surface uses to feed events into a running synchronizer.
#[must_use]
pub fn event_channel() -> (mpsc::Sender<SettingsEvent>, mpsc::Receiver<SettingsEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}
