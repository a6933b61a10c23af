//! Contracts for the collaborators around the synchronizer.
//!
//! # Design
//! - The presentation surface only receives complete states and requests;
//!   it never reads preferences itself.
//! - External actions are injected as trait objects, not globals.


use crate::state::DisplayState;

/// Selection dialogs the surface can be asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    /// Queue size options.
    QueueSize,
    /// Receive window options.
    ReceiveWindow,
    /// Pause time options.
    PauseTime,
}

/// Destinations the surface can be asked to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavTarget {
    /// Blocking backend chooser.
    ManagerChooser,
    /// Built-in blocked numbers list.
    NumbersScreen,
    /// Blocked messages list.
    MessagesScreen,
    /// Configuration owned by an external blocking backend.
    ExternalBlockingSettings,
}

/// UI layer that renders the settings screen.
pub trait PresentationSurface: Send + Sync {
    /// Render `state`. Called after every change; must tolerate repeats.
    fn render(&self, state: &DisplayState);
    /// Show the selection dialog `kind`.
    fn show_dialog(&self, kind: DialogKind);
    /// Open `target`.
    fn navigate_to(&self, target: NavTarget);
}

/// Vendor-specific blocking backend.
pub trait BlockingClient: Send + Sync {
    /// Open the backend's own configuration, outside this screen's navigation.
    fn open_settings(&self);
}

/// Receiver-side spam detection.
pub trait SpamFilterReset: Send + Sync {
    /// Clear accumulated spam counters and active blocks.
    fn reset_block(&self);
}
