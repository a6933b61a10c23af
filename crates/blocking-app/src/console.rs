//! Console-backed presentation surface and collaborators.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use blocking_settings::{
    BlockingClient, DialogKind, DisplayState, NavTarget, PresentationSurface, SpamFilterReset,
    TuningKind,
};
use tracing::{info, warn};

/// Surface that prints every render, dialog, and navigation request as a line.
pub struct ConsoleSurface {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSurface {
    /// Surface writing to `out`.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Arc<Self> {
        Arc::new(Self {
            out: Mutex::new(out),
        })
    }

    /// Surface writing to standard output.
    #[must_use]
    pub fn stdout() -> Arc<Self> {
        Self::new(Box::new(io::stdout()))
    }

    /// Print one line of free text.
    pub fn print_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %err, "console write failed");
        }
    }

    /// Print `state` as a JSON document.
    pub fn print_state(&self, state: &DisplayState) {
        match serde_json::to_string_pretty(state) {
            Ok(document) => self.print_line(&document),
            Err(err) => warn!(error = %err, "display state could not be encoded"),
        }
    }
}

impl PresentationSurface for ConsoleSurface {
    fn render(&self, state: &DisplayState) {
        self.print_line(&format!("screen: {}", summarize(state)));
    }

    fn show_dialog(&self, kind: DialogKind) {
        self.print_line(&format!("dialog: {}", dialog_title(kind)));
    }

    fn navigate_to(&self, target: NavTarget) {
        self.print_line(&format!("navigate: {}", target_name(target)));
    }
}

/// One-line summary of the rows the screen shows.
#[must_use]
pub fn summarize(state: &DisplayState) -> String {
    let switch = |on: bool| if on { "on" } else { "off" };
    let mut summary = format!(
        "manager {} | messages{} | drop {} | spam filter {}",
        state.blocking_manager_label,
        if state.messages_row_enabled() {
            ""
        } else {
            " (disabled)"
        },
        switch(state.drop_enabled),
        switch(state.spam_filter_enabled),
    );
    for kind in TuningKind::ALL {
        let selection = state.tuning(kind);
        summary.push_str(&format!(
            " | {} {}{}",
            kind.name().replace('_', " "),
            selection.summary_label,
            if state.tuning_rows_enabled() {
                ""
            } else {
                " (disabled)"
            },
        ));
    }
    summary
}

const fn dialog_title(kind: DialogKind) -> &'static str {
    match kind {
        DialogKind::QueueSize => "queue size",
        DialogKind::ReceiveWindow => "receive window",
        DialogKind::PauseTime => "pause time",
    }
}

const fn target_name(target: NavTarget) -> &'static str {
    match target {
        NavTarget::ManagerChooser => "blocking manager chooser",
        NavTarget::NumbersScreen => "blocked numbers",
        NavTarget::MessagesScreen => "blocked messages",
        NavTarget::ExternalBlockingSettings => "external blocking app settings",
    }
}

/// Blocking backend that hands off to the external app's own settings.
pub struct ConsoleBlockingClient {
    surface: Arc<ConsoleSurface>,
}

impl ConsoleBlockingClient {
    /// Client reporting hand-offs through `surface`.
    #[must_use]
    pub const fn new(surface: Arc<ConsoleSurface>) -> Self {
        Self { surface }
    }
}

impl BlockingClient for ConsoleBlockingClient {
    fn open_settings(&self) {
        info!("handing off to external blocking settings");
        self.surface
            .navigate_to(NavTarget::ExternalBlockingSettings);
    }
}

/// Spam detection reset that only reports the reset.
pub struct ConsoleSpamReset {
    surface: Arc<ConsoleSurface>,
}

impl ConsoleSpamReset {
    /// Reset hook reporting through `surface`.
    #[must_use]
    pub const fn new(surface: Arc<ConsoleSurface>) -> Self {
        Self { surface }
    }
}

impl SpamFilterReset for ConsoleSpamReset {
    fn reset_block(&self) {
        info!("spam detection state reset");
        self.surface.print_line("spam filter: detection state reset");
    }
}
